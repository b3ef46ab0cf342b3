//! Planner configuration.
//!
//! Constructed by the host application (there are no config files in this
//! core); `Deserialize` is provided so a host that does load settings from
//! somewhere can feed them straight in.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::application::escalation::EscalationPolicy;

/// Configuration for the route planner.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    /// Instruction language tag sent to the directions service.
    #[serde(default = "default_language")]
    pub language: String,

    /// Whether to request turn-by-turn instructions.
    #[serde(default = "default_instructions")]
    pub instructions: bool,

    /// How the cutoff advances after a failed attempt.
    #[serde(default)]
    pub escalation_policy: EscalationPolicy,

    /// Pause between escalations, purely so the UI can show progress.
    /// Zero disables pacing; correctness never depends on it.
    #[serde(default)]
    pub escalation_delay_ms: u64,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_instructions() -> bool {
    true
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            instructions: default_instructions(),
            escalation_policy: EscalationPolicy::default(),
            escalation_delay_ms: 0,
        }
    }
}

impl PlannerConfig {
    /// Pacing delay between escalations, if any.
    pub fn escalation_delay(&self) -> Option<Duration> {
        if self.escalation_delay_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.escalation_delay_ms))
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.trim().is_empty() {
            return Err(ConfigError::MissingRequired("language"));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required configuration value: {0}")]
    MissingRequired(&'static str),
}
