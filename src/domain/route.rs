//! Route output types handed to the display collaborator.

use serde::{Deserialize, Serialize};

/// A geographic point, latitude first (map convention).
///
/// The directions API speaks `[longitude, latitude]`; conversions between the
/// two axis orders are explicit so the swap can never happen by accident.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the point in the API's `[longitude, latitude]` order.
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Builds a point from an API-ordered `[longitude, latitude]` pair.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[1],
            lng: pair[0],
        }
    }
}

/// Route totals reported by the directions service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Total distance in meters.
    pub distance: f64,
    /// Total duration in seconds.
    pub duration: f64,
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStep {
    /// Step distance in meters.
    pub distance: f64,
    /// Human-readable instruction.
    pub instruction: String,
    /// Street name, when the service knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A leg of the route, grouping its steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    #[serde(default)]
    pub steps: Vec<RouteStep>,
}

/// A successfully planned route: decoded geometry plus the service metadata.
///
/// Produced once per successful request; the display collaborator owns it
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRoute {
    /// Ordered path points, latitude first.
    pub points: Vec<Point>,
    pub summary: RouteSummary,
    pub segments: Vec<RouteSegment>,
}

impl DecodedRoute {
    /// Iterates every step across all segments, in travel order.
    pub fn steps(&self) -> impl Iterator<Item = &RouteStep> {
        self.segments.iter().flat_map(|segment| segment.steps.iter())
    }
}
