//! Route Planner - drives the escalating-retry loop around the directions port.
//!
//! One call to [`RoutePlanner::plan_route`] is one request chain: it starts at
//! cutoff 0 with the heaviest avoidance set, and each failed attempt relaxes
//! the cutoff until the service finds a route or the cutoff bound is reached.
//! Starting a new chain supersedes any chain still in flight; a superseded
//! chain never reaches the observer again and resolves to
//! [`RouteError::Superseded`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::application::escalation::{EscalationState, MAX_CUTOFF};
use crate::config::PlannerConfig;
use crate::domain::conflict::avoidance_set;
use crate::domain::obstacle::ObstacleIndex;
use crate::domain::polyline::{self, PolylineError};
use crate::domain::profile::SharedProfile;
use crate::domain::route::{DecodedRoute, Point};
use crate::ports::{
    DirectionsError, DirectionsProvider, DirectionsRequest, NoOpRouteObserver, RouteObserver,
};

/// Why a single routing attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    /// The directions service errored.
    #[error(transparent)]
    Service(#[from] DirectionsError),

    /// The service answered but offered zero routes.
    #[error("directions service returned no routes")]
    NoRoute,
}

/// Terminal failure of a request chain.
///
/// Transient service errors never surface here; they escalate inside the
/// chain. Only the outcomes a user must be told about escape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// Every cutoff up to the bound failed: there is no walkable route even
    /// with avoidance fully relaxed.
    #[error("no route found after {attempts} attempts, even with all avoidance constraints relaxed")]
    Exhausted {
        /// Number of requests issued before giving up.
        attempts: u32,
        /// What the final attempt failed with.
        #[source]
        last_failure: AttemptFailure,
    },

    /// The service returned a route whose geometry could not be decoded.
    #[error("route geometry could not be decoded")]
    Geometry(#[from] PolylineError),

    /// A newer `plan_route` call replaced this chain before it finished.
    #[error("route request superseded by a newer request")]
    Superseded,
}

/// Preference-aware route planner.
///
/// Shares only the read-only obstacle index and the read-mostly sensitivity
/// profile between chains; both are snapshotted per attempt so an in-flight
/// request's outcome is reproducible even while the UI mutates ratings.
pub struct RoutePlanner {
    directions: Arc<dyn DirectionsProvider>,
    obstacles: Arc<ObstacleIndex>,
    profile: SharedProfile,
    observer: Arc<dyn RouteObserver>,
    config: PlannerConfig,
    /// Generation token: bumped by every new chain, checked after every await
    /// so stale chains cannot publish results.
    generation: AtomicU64,
}

impl RoutePlanner {
    /// Creates a planner with the default configuration and no observer.
    pub fn new(
        directions: Arc<dyn DirectionsProvider>,
        obstacles: Arc<ObstacleIndex>,
        profile: SharedProfile,
    ) -> Self {
        Self {
            directions,
            obstacles,
            profile,
            observer: Arc::new(NoOpRouteObserver),
            config: PlannerConfig::default(),
            generation: AtomicU64::new(0),
        }
    }

    /// Sets the progress observer.
    pub fn with_observer(mut self, observer: Arc<dyn RouteObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Sets the planner configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Plans a walking route between two points, escalating the avoidance
    /// cutoff on failure until a route is found or cutoff 5 has failed.
    pub async fn plan_route(
        &self,
        start: Point,
        end: Point,
    ) -> Result<DecodedRoute, RouteError> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = EscalationState::initial();
        let mut attempts: u32 = 0;

        loop {
            match state {
                EscalationState::Requesting { cutoff } => {
                    let request = self.build_request(start, end, cutoff);

                    if self.is_stale(token) {
                        return Err(RouteError::Superseded);
                    }
                    self.observer.on_attempt(cutoff);
                    attempts += 1;
                    debug!(cutoff, attempt = attempts, "requesting directions");

                    let outcome = self.directions.fetch_route(request).await;
                    if self.is_stale(token) {
                        return Err(RouteError::Superseded);
                    }

                    let failure = match outcome {
                        Ok(response) => match response.routes.into_iter().next() {
                            Some(candidate) => {
                                let points = polyline::decode(&candidate.geometry)?;
                                info!(
                                    cutoff,
                                    attempts,
                                    distance_m = candidate.summary.distance,
                                    "route found"
                                );
                                return Ok(DecodedRoute {
                                    points,
                                    summary: candidate.summary,
                                    segments: candidate.segments,
                                });
                            }
                            None => AttemptFailure::NoRoute,
                        },
                        Err(err) => AttemptFailure::Service(err),
                    };

                    debug!(cutoff, failure = %failure, "directions attempt failed");
                    if cutoff >= MAX_CUTOFF {
                        info!(attempts, "exhausted all avoidance relaxations");
                        return Err(RouteError::Exhausted {
                            attempts,
                            last_failure: failure,
                        });
                    }
                    state =
                        EscalationState::after_failure(cutoff, self.config.escalation_policy);
                }

                EscalationState::Escalating { next_cutoff } => {
                    if let Some(delay) = self.config.escalation_delay() {
                        sleep(delay).await;
                        if self.is_stale(token) {
                            return Err(RouteError::Superseded);
                        }
                    }
                    self.observer.on_escalation(next_cutoff);
                    state = EscalationState::Requesting {
                        cutoff: next_cutoff,
                    };
                }

                // Both terminal states return out of the Requesting arm.
                EscalationState::Succeeded | EscalationState::Exhausted => unreachable!(),
            }
        }
    }

    /// Builds one attempt's request from fresh profile and obstacle snapshots.
    fn build_request(&self, start: Point, end: Point, cutoff: u8) -> DirectionsRequest {
        let profile = self.profile.snapshot();
        let avoid = avoidance_set(&self.obstacles, &profile, cutoff);
        DirectionsRequest::between(start, end)
            .with_language(self.config.language.as_str())
            .with_instructions(self.config.instructions)
            .with_avoidance(avoid)
    }

    fn is_stale(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != token
    }
}
