//! Application layer - the route-planning orchestrator.

pub mod escalation;
pub mod planner;

pub use escalation::{EscalationPolicy, EscalationState, MAX_CUTOFF};
pub use planner::{AttemptFailure, RouteError, RoutePlanner};
