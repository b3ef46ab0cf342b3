//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the planning core to external systems: the real
//! OpenRouteService HTTP client and a scripted mock for tests.

pub mod directions;

pub use directions::{MockDirectionsProvider, OpenRouteServiceProvider, OrsConfig};
