//! Route Observer Port - progress notifications for the UI layer.
//!
//! The planner tells its observer which cutoff each attempt runs at and when
//! constraints are being relaxed, so the user can be shown "dropping minor
//! discomfort zones..." style messages. Notifications are best-effort and not
//! part of the correctness contract; a headless embedding uses
//! [`NoOpRouteObserver`].

/// Receives per-attempt progress from the route planner.
pub trait RouteObserver: Send + Sync {
    /// A request is about to be issued at the given cutoff.
    fn on_attempt(&self, cutoff: u8);

    /// The previous attempt failed; avoidance is being relaxed to this cutoff.
    fn on_escalation(&self, next_cutoff: u8);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpRouteObserver;

impl RouteObserver for NoOpRouteObserver {
    fn on_attempt(&self, _cutoff: u8) {}
    fn on_escalation(&self, _next_cutoff: u8) {}
}
