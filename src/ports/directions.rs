//! Directions Port - Interface for the external walking-directions service.
//!
//! The planner never talks HTTP directly; it is handed an implementation of
//! [`DirectionsProvider`] so the escalation logic can be unit-tested without a
//! live network dependency.
//!
//! # Axis order
//!
//! The wire format is `[longitude, latitude]` throughout, the opposite of the
//! latitude-first [`Point`](crate::domain::Point) convention. The swap happens
//! exactly once, inside [`DirectionsRequest::between`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::obstacle::Geometry;
use crate::domain::route::{Point, RouteSegment, RouteSummary};

/// Port for fetching walking directions from an external service.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Requests directions for one start/end pair.
    ///
    /// A response with zero routes is a valid response; deciding whether that
    /// constitutes failure is the caller's business.
    async fn fetch_route(
        &self,
        request: DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError>;

    /// Describes the backing service, for logs.
    fn provider_info(&self) -> ProviderInfo;
}

/// Request body for one directions attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsRequest {
    /// Start and end as `[longitude, latitude]` pairs.
    pub coordinates: [[f64; 2]; 2],
    /// Instruction language tag.
    pub language: String,
    /// Whether to request turn-by-turn instructions.
    pub instructions: bool,
    /// Present only when at least one obstacle qualifies for avoidance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DirectionsOptions>,
}

/// Optional request parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsOptions {
    /// MultiPolygon the service must route around.
    pub avoid_polygons: Geometry,
}

impl DirectionsRequest {
    /// Builds a request between two latitude-first points, swapping into the
    /// API's longitude-first order.
    pub fn between(start: Point, end: Point) -> Self {
        Self {
            coordinates: [start.to_lng_lat(), end.to_lng_lat()],
            language: "en".to_string(),
            instructions: true,
            options: None,
        }
    }

    /// Sets the instruction language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Toggles turn-by-turn instructions.
    pub fn with_instructions(mut self, instructions: bool) -> Self {
        self.instructions = instructions;
        self
    }

    /// Attaches an avoidance set when one exists.
    pub fn with_avoidance(mut self, avoid: Option<Geometry>) -> Self {
        self.options = avoid.map(|avoid_polygons| DirectionsOptions { avoid_polygons });
        self
    }
}

/// Parsed response from the directions service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

/// One route alternative as returned by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteCandidate {
    pub summary: RouteSummary,
    /// Delta-encoded path geometry.
    pub geometry: String,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
}

/// Backing service description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Service name (e.g. "openrouteservice").
    pub name: String,
    /// Travel profile (e.g. "foot-walking").
    pub travel_profile: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, travel_profile: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            travel_profile: travel_profile.into(),
        }
    }
}

/// Directions service errors.
///
/// Every variant is treated the same way by the planner: the attempt failed
/// and the avoidance cutoff escalates. The taxonomy exists for logging and for
/// the terminal `Exhausted` error to carry a meaningful cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectionsError {
    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with a non-2xx status.
    #[error("directions service returned HTTP {status}")]
    Http {
        /// Status code.
        status: u16,
    },

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Service is unavailable.
    #[error("directions service unavailable: {0}")]
    Unavailable(String),
}

impl DirectionsError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
