//! Escalation state machine for the route planner.
//!
//! The original client retried through nested callbacks; here the retry loop
//! is an explicit bounded state machine so termination and cancellation are
//! checkable by tests. The cutoff sequence is non-decreasing and never passes
//! [`MAX_CUTOFF`].

use serde::{Deserialize, Serialize};

/// Highest cutoff ever requested. Conflict scores cannot exceed 5, so a
/// request at this cutoff avoids only the very worst zones.
pub const MAX_CUTOFF: u8 = 5;

/// How the cutoff advances after a failed attempt.
///
/// Both policies are deterministic; `Linear` matches the shipped client and
/// is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// Raise the cutoff by one per failure: 0, 1, 2, 3, 4, 5.
    #[default]
    Linear,
    /// Skip the least-restrictive band on the first failure: 0, 2, 3, 4, 5.
    SkipFirstBand,
}

impl EscalationPolicy {
    /// The cutoff to try after a failure at `current`.
    ///
    /// Callers must not ask past `MAX_CUTOFF`; the result is capped there
    /// regardless.
    pub fn next_cutoff(&self, current: u8) -> u8 {
        let next = match self {
            EscalationPolicy::Linear => current + 1,
            EscalationPolicy::SkipFirstBand if current == 0 => 2,
            EscalationPolicy::SkipFirstBand => current + 1,
        };
        next.min(MAX_CUTOFF)
    }
}

/// Planner state for one route-request chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationState {
    /// A request at this cutoff is being built or awaited.
    Requesting { cutoff: u8 },
    /// The previous attempt failed; the chain is relaxing to this cutoff.
    Escalating { next_cutoff: u8 },
    /// A route was found and decoded. Terminal.
    Succeeded,
    /// Every cutoff up to `MAX_CUTOFF` failed. Terminal.
    Exhausted,
}

impl EscalationState {
    /// Initial state of every chain.
    pub fn initial() -> Self {
        EscalationState::Requesting { cutoff: 0 }
    }

    /// State after a failed attempt at `cutoff`: escalate while below the
    /// bound, otherwise exhaust.
    pub fn after_failure(cutoff: u8, policy: EscalationPolicy) -> Self {
        if cutoff < MAX_CUTOFF {
            EscalationState::Escalating {
                next_cutoff: policy.next_cutoff(cutoff),
            }
        } else {
            EscalationState::Exhausted
        }
    }

    /// Terminal states end the chain.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EscalationState::Succeeded | EscalationState::Exhausted
        )
    }
}
