//! Integration tests for the route planner.
//!
//! These tests verify the end-to-end flow:
//! 1. Obstacle index + sensitivity profile produce an avoidance set
//! 2. The planner escalates the cutoff across failed directions attempts
//! 3. Successful responses are decoded into map-displayable coordinates
//! 4. Superseded chains never publish their late results
//!
//! Uses scripted and gated in-memory providers; no network involved.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

use cozyroute::adapters::MockDirectionsProvider;
use cozyroute::application::{AttemptFailure, RouteError, RoutePlanner};
use cozyroute::domain::{
    Category, Geometry, ObstacleIndex, Point, Rating, SensitivityProfile, SharedProfile,
};
use cozyroute::ports::{
    DirectionsError, DirectionsProvider, DirectionsRequest, DirectionsResponse, ProviderInfo,
    RouteObserver,
};

// Reference polyline: (38.5, -120.2), (40.7, -120.95), (43.252, -126.453)
const REFERENCE_GEOMETRY: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

// =============================================================================
// Test Infrastructure
// =============================================================================

fn success_response() -> DirectionsResponse {
    serde_json::from_str(&format!(
        r#"{{
            "routes": [{{
                "summary": {{"distance": 1320.5, "duration": 951.0}},
                "geometry": "{REFERENCE_GEOMETRY}",
                "segments": [{{
                    "steps": [
                        {{"distance": 50.0, "instruction": "Head north"}},
                        {{"distance": 70.0, "instruction": "Turn left", "name": "Rue de Rivoli"}}
                    ]
                }}]
            }}]
        }}"#
    ))
    .expect("valid response fixture")
}

fn obstacle_index(entries: &[(&str, u8)]) -> ObstacleIndex {
    let features: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, (category, intensity))| {
            let offset = i as f64;
            format!(
                r#"{{
                    "type": "Feature",
                    "geometry": {{"type": "Polygon", "coordinates": [[
                        [{o}, {o}], [{o1}, {o}], [{o1}, {o1}], [{o}, {o1}], [{o}, {o}]
                    ]]}},
                    "properties": {{"class": "{category}-{intensity}"}}
                }}"#,
                o = offset,
                o1 = offset + 1.0,
            )
        })
        .collect();
    let geojson = format!(
        r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
        features.join(",")
    );
    ObstacleIndex::from_geojson(&geojson).expect("valid obstacle fixture")
}

fn start() -> Point {
    Point::new(48.8566, 2.3522)
}

fn end() -> Point {
    Point::new(48.8606, 2.3376)
}

fn avoided_polygon_count(request: &DirectionsRequest) -> usize {
    match &request.options {
        Some(options) => match &options.avoid_polygons {
            Geometry::MultiPolygon { coordinates } => coordinates.len(),
            Geometry::Polygon { .. } => 1,
        },
        None => 0,
    }
}

#[derive(Default)]
struct RecordingObserver {
    attempts: Mutex<Vec<u8>>,
    escalations: Mutex<Vec<u8>>,
}

impl RouteObserver for RecordingObserver {
    fn on_attempt(&self, cutoff: u8) {
        self.attempts.lock().unwrap().push(cutoff);
    }

    fn on_escalation(&self, next_cutoff: u8) {
        self.escalations.lock().unwrap().push(next_cutoff);
    }
}

/// Provider whose calls block until the test releases them one by one, giving
/// the tests precise control over what "in flight" means.
#[derive(Default)]
struct GatedProvider {
    pending: Mutex<Vec<Option<oneshot::Sender<Result<DirectionsResponse, DirectionsError>>>>>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl GatedProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().unwrap().clone()
    }

    async fn wait_for_requests(&self, count: usize) {
        while self.requests.lock().unwrap().len() < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Resolves the `index`-th call (in arrival order) with the outcome.
    fn release(&self, index: usize, outcome: Result<DirectionsResponse, DirectionsError>) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("call already released");
        let _ = sender.send(outcome);
    }
}

#[async_trait]
impl DirectionsProvider for GatedProvider {
    async fn fetch_route(
        &self,
        request: DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        let (tx, rx) = oneshot::channel();
        {
            self.pending.lock().unwrap().push(Some(tx));
            self.requests.lock().unwrap().push(request);
        }
        rx.await
            .unwrap_or_else(|_| Err(DirectionsError::unavailable("gate closed")))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("gated", "foot-walking")
    }
}

// =============================================================================
// Escalation end to end
// =============================================================================

#[tokio::test]
async fn avoidance_relaxes_monotonically_across_escalations() {
    // conflicts with every rating at 5: exactly the intensities 1..=5
    let index = obstacle_index(&[
        ("odor", 1),
        ("noise", 2),
        ("pollution", 3),
        ("traffic", 4),
        ("claustrophobia", 5),
    ]);
    let profile = SharedProfile::new({
        let mut p = SensitivityProfile::new();
        for category in Category::ALL {
            p.set_rating(category, Rating::MAX);
        }
        p
    });

    let provider = MockDirectionsProvider::new()
        .with_outcomes((0..5).map(|_| Err(DirectionsError::Http { status: 404 })))
        .with_outcome(Ok(success_response()));
    let planner = RoutePlanner::new(Arc::new(provider.clone()), Arc::new(index), profile);

    let route = planner.plan_route(start(), end()).await.unwrap();

    // cutoff 0 and 1 both admit all five obstacles; each step after that
    // drops exactly the band below the new cutoff
    let counts: Vec<usize> = provider.requests().iter().map(avoided_polygon_count).collect();
    assert_eq!(counts, [5, 5, 4, 3, 2, 1]);

    assert_eq!(route.points.len(), 3);
    assert!((route.points[2].lat - 43.252).abs() < 1e-9);
    assert!((route.points[2].lng - -126.453).abs() < 1e-9);
    assert_eq!(route.summary.distance, 1320.5);
    assert_eq!(route.steps().count(), 2);
}

#[tokio::test]
async fn always_failing_provider_exhausts_after_six_attempts() {
    let provider = MockDirectionsProvider::new()
        .with_outcomes((0..6).map(|_| Err(DirectionsError::network("unreachable"))));
    let observer = Arc::new(RecordingObserver::default());
    let planner = RoutePlanner::new(
        Arc::new(provider.clone()),
        Arc::new(ObstacleIndex::default()),
        SharedProfile::default(),
    )
    .with_observer(observer.clone());

    let err = planner.plan_route(start(), end()).await.unwrap_err();

    assert_eq!(provider.requests().len(), 6);
    assert_eq!(*observer.attempts.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert!(matches!(
        err,
        RouteError::Exhausted {
            attempts: 6,
            last_failure: AttemptFailure::Service(DirectionsError::Network(_)),
        }
    ));
}

#[tokio::test]
async fn exhaustion_reports_zero_routes_distinctly_from_transport_errors() {
    let provider = MockDirectionsProvider::new().with_outcomes(
        (0..6).map(|_| Ok(DirectionsResponse { routes: Vec::new() })),
    );
    let planner = RoutePlanner::new(
        Arc::new(provider),
        Arc::new(ObstacleIndex::default()),
        SharedProfile::default(),
    );

    let err = planner.plan_route(start(), end()).await.unwrap_err();

    assert!(matches!(
        err,
        RouteError::Exhausted {
            attempts: 6,
            last_failure: AttemptFailure::NoRoute,
        }
    ));
}

#[tokio::test]
async fn recovery_after_two_failures_stops_escalating() {
    let provider = MockDirectionsProvider::new()
        .with_outcome(Err(DirectionsError::Http { status: 502 }))
        .with_outcome(Ok(DirectionsResponse { routes: Vec::new() }))
        .with_outcome(Ok(success_response()));
    let observer = Arc::new(RecordingObserver::default());
    let planner = RoutePlanner::new(
        Arc::new(provider.clone()),
        Arc::new(ObstacleIndex::default()),
        SharedProfile::default(),
    )
    .with_observer(observer.clone());

    let route = planner.plan_route(start(), end()).await.unwrap();

    assert_eq!(route.points.len(), 3);
    assert_eq!(provider.requests().len(), 3);
    assert_eq!(*observer.attempts.lock().unwrap(), vec![0, 1, 2]);
    assert_eq!(*observer.escalations.lock().unwrap(), vec![1, 2]);
}

// =============================================================================
// Snapshot semantics
// =============================================================================

#[tokio::test]
async fn profile_mutation_during_flight_affects_only_the_next_attempt() {
    let index = obstacle_index(&[("noise", 5)]);
    let profile = SharedProfile::default();
    profile.set_rating(Category::Noise, Rating::MAX);

    let provider = GatedProvider::new();
    let planner = Arc::new(RoutePlanner::new(
        provider.clone(),
        Arc::new(index),
        profile.clone(),
    ));

    let chain = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan_route(start(), end()).await }
    });

    // first attempt is in flight with the noise-averse snapshot
    provider.wait_for_requests(1).await;
    profile.set_rating(Category::Noise, Rating::default());

    // fail it; the retry must snapshot the mutated profile
    provider.release(0, Err(DirectionsError::Http { status: 404 }));
    provider.wait_for_requests(2).await;
    provider.release(1, Ok(success_response()));

    chain.await.unwrap().unwrap();

    let requests = provider.requests();
    assert!(requests[0].options.is_some(), "in-flight attempt keeps its snapshot");
    assert!(requests[1].options.is_none(), "next attempt sees the new ratings");
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn new_chain_supersedes_an_escalating_one() {
    let provider = GatedProvider::new();
    let observer = Arc::new(RecordingObserver::default());
    let planner = Arc::new(
        RoutePlanner::new(
            provider.clone(),
            Arc::new(ObstacleIndex::default()),
            SharedProfile::default(),
        )
        .with_observer(observer.clone()),
    );

    // chain 1 blocks in flight at cutoff 0
    let first = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan_route(start(), end()).await }
    });
    provider.wait_for_requests(1).await;

    // chain 2 for a different pair claims the planner
    let second = tokio::spawn({
        let planner = planner.clone();
        async move {
            planner
                .plan_route(Point::new(45.75, 4.85), Point::new(45.76, 4.84))
                .await
        }
    });
    provider.wait_for_requests(2).await;

    // chain 1's late success must not become anyone's displayed route
    provider.release(0, Ok(success_response()));
    let first_result = first.await.unwrap();
    assert_eq!(first_result.unwrap_err(), RouteError::Superseded);

    provider.release(1, Ok(success_response()));
    let route = second.await.unwrap().unwrap();
    assert_eq!(route.points.len(), 3);

    // the superseded chain produced no notifications after chain 2 started:
    // both recorded attempts are the two chains' initial cutoff-0 requests
    assert_eq!(*observer.attempts.lock().unwrap(), vec![0, 0]);
    assert!(observer.escalations.lock().unwrap().is_empty());

    // chain 2's request really was for the second pair
    let requests = provider.requests();
    assert_eq!(requests[1].coordinates, [[4.85, 45.75], [4.84, 45.76]]);
}

#[tokio::test]
async fn superseded_chain_is_cancelled_even_when_its_attempt_fails() {
    let provider = GatedProvider::new();
    let planner = Arc::new(RoutePlanner::new(
        provider.clone(),
        Arc::new(ObstacleIndex::default()),
        SharedProfile::default(),
    ));

    let first = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan_route(start(), end()).await }
    });
    provider.wait_for_requests(1).await;

    let second = tokio::spawn({
        let planner = planner.clone();
        async move { planner.plan_route(start(), end()).await }
    });
    provider.wait_for_requests(2).await;

    // a failure would normally escalate; a superseded chain must not retry
    provider.release(0, Err(DirectionsError::network("late failure")));
    assert_eq!(first.await.unwrap().unwrap_err(), RouteError::Superseded);

    provider.release(1, Ok(success_response()));
    assert!(second.await.unwrap().is_ok());

    // no third request: the superseded chain never escalated
    assert_eq!(provider.requests().len(), 2);
}
