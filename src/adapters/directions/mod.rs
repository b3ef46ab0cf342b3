//! Directions service adapters.

pub mod mock_provider;
pub mod open_route_service;

pub use mock_provider::{MockDirectionsProvider, MockOutcome};
pub use open_route_service::{OpenRouteServiceProvider, OrsConfig};
