//! Checklist item definitions.

use alloc::string::String;
use alloc::vec::Vec;

/// One named component of a composite score (e.g. "Respiration", 0..=2).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubScore {
    pub name: String,
    /// Current value, expected to lie in `0..=max`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: u32,
    pub max: u32,
}

impl SubScore {
    /// A sub-score starting at zero.
    pub fn new(name: impl Into<String>, max: u32) -> Self {
        Self {
            name: name.into(),
            value: 0,
            max,
        }
    }

    /// Check whether `value` is acceptable for this sub-score.
    pub fn accepts(&self, value: u32) -> bool {
        value <= self.max
    }
}

/// A single task on a procedural checklist.
///
/// Category membership is carried by the `category` field; there is no
/// separate category structure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChecklistItem {
    pub id: String,
    pub category: String,
    pub task: String,
    /// Completion is mandatory before the gate opens.
    #[cfg_attr(feature = "serde", serde(default))]
    pub critical: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub completed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub notes: String,
    /// Ordered sub-scores; empty when the item is not scored.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub scores: Vec<SubScore>,
}

impl ChecklistItem {
    /// Create an incomplete, non-critical item with no sub-scores.
    pub fn new(id: impl Into<String>, category: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            task: task.into(),
            critical: false,
            completed: false,
            notes: String::new(),
            scores: Vec::new(),
        }
    }

    /// Mark the item as critical.
    pub fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    /// Append a sub-score starting at zero.
    pub fn score(mut self, name: impl Into<String>, max: u32) -> Self {
        self.scores.push(SubScore::new(name, max));
        self
    }

    /// Look up a sub-score by name.
    pub fn sub_score(&self, name: &str) -> Option<&SubScore> {
        self.scores.iter().find(|s| s.name == name)
    }

    /// Sum of sub-score values.
    pub fn score_total(&self) -> u32 {
        self.scores.iter().map(|s| s.value).sum()
    }

    /// Sum of sub-score maxima.
    pub fn score_max(&self) -> u32 {
        self.scores.iter().map(|s| s.max).sum()
    }
}
