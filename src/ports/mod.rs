//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! planning core and the outside world. The directions service and the UI
//! progress display are injected through these traits.

pub mod directions;
pub mod observer;

pub use directions::{
    DirectionsError, DirectionsOptions, DirectionsProvider, DirectionsRequest,
    DirectionsResponse, ProviderInfo, RouteCandidate,
};
pub use observer::{NoOpRouteObserver, RouteObserver};
