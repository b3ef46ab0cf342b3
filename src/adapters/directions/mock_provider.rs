//! Mock directions provider for testing.
//!
//! Configurable to return scripted responses or errors in order, simulate
//! latency, and record every request for verification, so the planner's
//! escalation logic can be exercised without a live directions service.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResponse, ProviderInfo,
};

/// One scripted fetch outcome.
pub type MockOutcome = Result<DirectionsResponse, DirectionsError>;

/// Mock directions provider.
///
/// Outcomes are consumed in order; once the script runs dry every further
/// call fails with `Unavailable`. Clones share the same script and history.
#[derive(Debug, Clone, Default)]
pub struct MockDirectionsProvider {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    requests: Arc<Mutex<Vec<DirectionsRequest>>>,
    delay: Option<Duration>,
}

impl MockDirectionsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one outcome.
    pub fn with_outcome(self, outcome: MockOutcome) -> Self {
        self.outcomes.lock().unwrap().push_back(outcome);
        self
    }

    /// Queues several outcomes.
    pub fn with_outcomes(self, outcomes: impl IntoIterator<Item = MockOutcome>) -> Self {
        self.outcomes.lock().unwrap().extend(outcomes);
        self
    }

    /// Simulates latency before each outcome resolves.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request this provider has seen, in order.
    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionsProvider for MockDirectionsProvider {
    async fn fetch_route(
        &self,
        request: DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.requests.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            sleep(delay).await;
        }

        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(DirectionsError::unavailable("mock script exhausted")))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "foot-walking")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::{Point, RouteSummary};
    use crate::ports::RouteCandidate;

    fn request() -> DirectionsRequest {
        DirectionsRequest::between(Point::new(48.85, 2.35), Point::new(48.86, 2.34))
    }

    #[tokio::test]
    async fn outcomes_are_consumed_in_order() {
        let provider = MockDirectionsProvider::new()
            .with_outcome(Err(DirectionsError::Http { status: 500 }))
            .with_outcome(Ok(DirectionsResponse {
                routes: vec![RouteCandidate {
                    summary: RouteSummary {
                        distance: 10.0,
                        duration: 8.0,
                    },
                    geometry: String::new(),
                    segments: Vec::new(),
                }],
            }));

        assert!(provider.fetch_route(request()).await.is_err());
        assert_eq!(provider.fetch_route(request()).await.unwrap().routes.len(), 1);
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn exhausted_script_reports_unavailable() {
        let provider = MockDirectionsProvider::new();
        let err = provider.fetch_route(request()).await.unwrap_err();
        assert!(matches!(err, DirectionsError::Unavailable(_)));
    }
}
