//! Sensitivity profile: per-category discomfort ratings (0 to 5 scale).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};

use super::errors::ValidationError;
use super::Category;

/// Discomfort rating: 0 (don't avoid) to 5 (avoid aggressively).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Maximum rating value.
    pub const MAX: Rating = Rating(5);

    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_from_u8(value: u8) -> Result<Self, ValidationError> {
        if value <= 5 {
            Ok(Rating(value))
        } else {
            Err(ValidationError::out_of_range("rating", 0, 5, value as i32))
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if the category should not be avoided at all.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::try_from_u8(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-category discomfort ratings. All nine categories are always present;
/// everything defaults to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityProfile {
    odor: Rating,
    walkability: Rating,
    claustrophobia: Rating,
    agoraphobia: Rating,
    pollution: Rating,
    noise: Rating,
    lighting: Rating,
    accessibility: Rating,
    traffic: Rating,
}

impl SensitivityProfile {
    /// Creates a profile with every category rated 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rating for a category.
    pub fn rating(&self, category: Category) -> Rating {
        match category {
            Category::Odor => self.odor,
            Category::Walkability => self.walkability,
            Category::Claustrophobia => self.claustrophobia,
            Category::Agoraphobia => self.agoraphobia,
            Category::Pollution => self.pollution,
            Category::Noise => self.noise,
            Category::Lighting => self.lighting,
            Category::Accessibility => self.accessibility,
            Category::Traffic => self.traffic,
        }
    }

    /// Sets the rating for a category.
    pub fn set_rating(&mut self, category: Category, rating: Rating) {
        let slot = match category {
            Category::Odor => &mut self.odor,
            Category::Walkability => &mut self.walkability,
            Category::Claustrophobia => &mut self.claustrophobia,
            Category::Agoraphobia => &mut self.agoraphobia,
            Category::Pollution => &mut self.pollution,
            Category::Noise => &mut self.noise,
            Category::Lighting => &mut self.lighting,
            Category::Accessibility => &mut self.accessibility,
            Category::Traffic => &mut self.traffic,
        };
        *slot = rating;
    }

    /// Returns true if every category is rated 0, meaning no obstacle can
    /// ever qualify for avoidance.
    pub fn is_indifferent(&self) -> bool {
        Category::ALL.into_iter().all(|c| self.rating(c).is_zero())
    }

    /// Builder-style rating assignment, mostly for tests and examples.
    pub fn with_rating(mut self, category: Category, rating: Rating) -> Self {
        self.set_rating(category, rating);
        self
    }
}

/// Shared handle to the profile mutated by the UI layer.
///
/// The planner snapshots the profile once per routing attempt so an in-flight
/// request's outcome stays reproducible even when the user moves a slider
/// while the request is pending.
#[derive(Debug, Clone, Default)]
pub struct SharedProfile {
    inner: Arc<RwLock<SensitivityProfile>>,
}

impl SharedProfile {
    /// Creates a shared handle around an initial profile.
    pub fn new(profile: SensitivityProfile) -> Self {
        Self {
            inner: Arc::new(RwLock::new(profile)),
        }
    }

    /// Clones the current profile state.
    pub fn snapshot(&self) -> SensitivityProfile {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Applies a mutation to the live profile.
    pub fn update(&self, f: impl FnOnce(&mut SensitivityProfile)) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard);
    }

    /// Convenience setter for a single category.
    pub fn set_rating(&self, category: Category, rating: Rating) {
        self.update(|profile| profile.set_rating(category, rating));
    }
}
