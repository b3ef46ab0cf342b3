//! CozyRoute - Preference-Aware Pedestrian Route Planning
//!
//! Given a start point, an end point, and a per-category discomfort profile,
//! this crate computes which obstacle polygons to avoid, drives an external
//! walking-directions API with a bounded escalating-retry loop that relaxes
//! avoidance when no route exists, and decodes the service's delta-encoded
//! path geometry into map-displayable coordinates.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
