//! OpenRouteService adapter - implementation of DirectionsProvider against the
//! ORS `/v2/directions/{profile}` endpoint.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OrsConfig::new(api_key)
//!     .with_travel_profile("foot-walking")
//!     .with_base_url("https://api.openrouteservice.org");
//!
//! let provider = OpenRouteServiceProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::debug;

use crate::ports::{
    DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResponse, ProviderInfo,
};

/// Configuration for the OpenRouteService provider.
#[derive(Debug, Clone)]
pub struct OrsConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API.
    pub base_url: String,
    /// Travel profile path segment (pedestrian routing by default).
    pub travel_profile: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OrsConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openrouteservice.org".to_string(),
            travel_profile: "foot-walking".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the travel profile.
    pub fn with_travel_profile(mut self, profile: impl Into<String>) -> Self {
        self.travel_profile = profile.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenRouteService directions provider.
pub struct OpenRouteServiceProvider {
    config: OrsConfig,
    client: Client,
}

impl OpenRouteServiceProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: OrsConfig) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DirectionsError::unavailable(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Builds the directions endpoint URL.
    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}",
            self.config.base_url, self.config.travel_profile
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> DirectionsError {
        if err.is_timeout() {
            DirectionsError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else if err.is_connect() {
            DirectionsError::network(format!("connection failed: {err}"))
        } else {
            DirectionsError::network(err.to_string())
        }
    }
}

#[async_trait]
impl DirectionsProvider for OpenRouteServiceProvider {
    async fn fetch_route(
        &self,
        request: DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let url = self.directions_url();
        debug!(constrained = request.options.is_some(), %url, "sending directions request");

        let response = self
            .client
            .post(&url)
            .header("Accept", "*/*")
            .header("Authorization", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectionsError::Http {
                status: status.as_u16(),
            });
        }

        response
            .json::<DirectionsResponse>()
            .await
            .map_err(|e| DirectionsError::parse(e.to_string()))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openrouteservice", self.config.travel_profile.as_str())
    }
}
