//! Discomfort categories a user can rate.
//!
//! The set is closed: obstacle labels referring to anything outside these nine
//! dimensions are ignored by the conflict scorer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the nine fixed discomfort dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Odor,
    Walkability,
    Claustrophobia,
    Agoraphobia,
    Pollution,
    Noise,
    Lighting,
    Accessibility,
    Traffic,
}

impl Category {
    /// All nine categories, in display order.
    pub const ALL: [Category; 9] = [
        Category::Odor,
        Category::Walkability,
        Category::Claustrophobia,
        Category::Agoraphobia,
        Category::Pollution,
        Category::Noise,
        Category::Lighting,
        Category::Accessibility,
        Category::Traffic,
    ];

    /// Returns the lowercase wire name used in obstacle labels and profiles.
    pub fn label_name(&self) -> &'static str {
        match self {
            Category::Odor => "odor",
            Category::Walkability => "walkability",
            Category::Claustrophobia => "claustrophobia",
            Category::Agoraphobia => "agoraphobia",
            Category::Pollution => "pollution",
            Category::Noise => "noise",
            Category::Lighting => "lighting",
            Category::Accessibility => "accessibility",
            Category::Traffic => "traffic",
        }
    }

    /// Looks up a category by its wire name, returning `None` for anything
    /// outside the closed set.
    pub fn from_label_name(name: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.label_name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_name())
    }
}
