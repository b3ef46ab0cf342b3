//! Domain layer: pure types and pure functions of the route-planning core.

pub mod category;
pub mod conflict;
pub mod errors;
pub mod obstacle;
pub mod polyline;
pub mod profile;
pub mod route;

pub use category::Category;
pub use conflict::{avoidance_set, conflict_score};
pub use errors::ValidationError;
pub use obstacle::{Geometry, ObstacleFeature, ObstacleIndex, ObstacleLoadError};
pub use polyline::PolylineError;
pub use profile::{Rating, SensitivityProfile, SharedProfile};
pub use route::{DecodedRoute, Point, RouteSegment, RouteStep, RouteSummary};
