//! Geotagged obstacle index.
//!
//! Obstacles are GeoJSON (Multi)Polygon features labelled `<category>-<intensity>`
//! (for example `noise-4`). The index is loaded once per session and never
//! mutated afterwards; features that do not match the label grammar, name an
//! unknown category, carry an out-of-range intensity, or have a non-polygon
//! geometry are skipped with a warning rather than failing the load.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::profile::Rating;
use super::Category;

/// A `[longitude, latitude]` pair, GeoJSON axis order.
pub type Position = [f64; 2];

/// A closed linear ring of positions.
pub type LinearRing = Vec<Position>;

/// One polygon: an exterior ring followed by any interior rings.
pub type PolygonRings = Vec<LinearRing>;

/// GeoJSON geometry restricted to the shapes obstacles can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: PolygonRings },
    MultiPolygon { coordinates: Vec<PolygonRings> },
}

impl Geometry {
    /// Flattens the geometry into a list of polygons, each a ring list.
    ///
    /// A `Polygon` becomes a one-element list; a `MultiPolygon` yields its
    /// members unchanged.
    pub fn into_polygons(self) -> Vec<PolygonRings> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates],
            Geometry::MultiPolygon { coordinates } => coordinates,
        }
    }
}

/// Obstacle label grammar: lowercase category name, hyphen, intensity digits.
static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z_]+)-([0-9]+)$").expect("label pattern is valid"));

/// Parses an obstacle `class` label into its category and intensity.
///
/// Returns `None` for labels outside the grammar, unknown categories, or
/// intensities above 5.
pub fn parse_label(label: &str) -> Option<(Category, Rating)> {
    let captures = LABEL_PATTERN.captures(label)?;
    let category = Category::from_label_name(&captures[1])?;
    let intensity = captures[2]
        .parse::<u8>()
        .ok()
        .and_then(|value| Rating::try_from_u8(value).ok())?;
    Some((category, intensity))
}

/// One obstacle: a discomfort category, an intensity, and polygon geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleFeature {
    category: Category,
    intensity: Rating,
    polygons: Vec<PolygonRings>,
}

impl ObstacleFeature {
    /// Creates a feature from already-parsed parts.
    pub fn new(category: Category, intensity: Rating, geometry: Geometry) -> Self {
        Self {
            category,
            intensity,
            polygons: geometry.into_polygons(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn intensity(&self) -> Rating {
        self.intensity
    }

    /// The feature's polygons in `[lng, lat]` ring form.
    pub fn polygons(&self) -> &[PolygonRings] {
        &self.polygons
    }
}

/// Failure to load the obstacle index.
#[derive(Debug, Error)]
pub enum ObstacleLoadError {
    #[error("obstacle index is not a valid GeoJSON FeatureCollection: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: serde_json::Value,
    #[serde(default)]
    properties: RawProperties,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    class: Option<String>,
}

/// Static, session-lifetime set of obstacle features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleIndex {
    features: Vec<ObstacleFeature>,
}

impl ObstacleIndex {
    /// Builds an index from already-parsed features.
    pub fn new(features: Vec<ObstacleFeature>) -> Self {
        Self { features }
    }

    /// Loads the index from a GeoJSON FeatureCollection string.
    pub fn from_geojson(geojson: &str) -> Result<Self, ObstacleLoadError> {
        let value: serde_json::Value = serde_json::from_str(geojson)?;
        Self::from_value(value)
    }

    /// Loads the index from an already-parsed GeoJSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ObstacleLoadError> {
        let collection: RawCollection = serde_json::from_value(value)?;
        let mut features = Vec::with_capacity(collection.features.len());

        for raw in collection.features {
            let Some(label) = raw.properties.class else {
                warn!("skipping obstacle feature without a class label");
                continue;
            };
            let Some((category, intensity)) = parse_label(&label) else {
                warn!(label = %label, "skipping obstacle feature with unusable class label");
                continue;
            };
            let geometry = match serde_json::from_value::<Geometry>(raw.geometry) {
                Ok(geometry) => geometry,
                Err(err) => {
                    warn!(label = %label, error = %err, "skipping obstacle feature with non-polygon geometry");
                    continue;
                }
            };
            features.push(ObstacleFeature::new(category, intensity, geometry));
        }

        Ok(Self { features })
    }

    pub fn features(&self) -> &[ObstacleFeature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
