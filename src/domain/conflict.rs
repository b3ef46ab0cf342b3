//! Conflict scorer: turns the obstacle index and a sensitivity profile into
//! the polygon set a routing request should avoid.
//!
//! A pure function of its inputs (the original client read these from page
//! globals; here they are explicit parameters so scoring is deterministic and
//! testable).

use super::obstacle::{Geometry, ObstacleIndex, PolygonRings};
use super::profile::{Rating, SensitivityProfile};

/// Conflict between one obstacle and the user's profile.
///
/// `intensity * (rating / 5)`, ranging over [0, 5]. A rating of 0 always
/// yields 0, and a rating of 5 passes the intensity through unchanged.
pub fn conflict_score(intensity: Rating, rating: Rating) -> f64 {
    f64::from(intensity.value()) * (f64::from(rating.value()) / 5.0)
}

/// Computes the avoidance set at the given cutoff.
///
/// Every feature whose conflict score is at least `cutoff` contributes its
/// polygons, in index order. Categories rated 0 never contribute. Returns
/// `None` when nothing qualifies so the caller can issue an unconstrained
/// request.
///
/// Raising the cutoff can only shrink or preserve the qualifying set.
pub fn avoidance_set(
    index: &ObstacleIndex,
    profile: &SensitivityProfile,
    cutoff: u8,
) -> Option<Geometry> {
    let polygons = qualifying_polygons(index, profile, cutoff);
    if polygons.is_empty() {
        None
    } else {
        Some(Geometry::MultiPolygon {
            coordinates: polygons,
        })
    }
}

/// The qualifying polygons at a cutoff, before MultiPolygon assembly.
pub fn qualifying_polygons(
    index: &ObstacleIndex,
    profile: &SensitivityProfile,
    cutoff: u8,
) -> Vec<PolygonRings> {
    let mut polygons = Vec::new();
    for feature in index.features() {
        let rating = profile.rating(feature.category());
        if rating.is_zero() {
            continue;
        }
        if conflict_score(feature.intensity(), rating) >= f64::from(cutoff) {
            polygons.extend(feature.polygons().iter().cloned());
        }
    }
    polygons
}
