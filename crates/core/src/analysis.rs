//! Structured extraction result for a job posting.

use serde::{Deserialize, Serialize};

/// Requirements and preferences extracted from a job posting.
///
/// Both sequences are in display order. A cached result never has an empty
/// field; placeholder results carry human-readable text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub requirements: Vec<String>,
    pub preferences: Vec<String>,
}

impl AnalysisResult {
    pub fn new(requirements: Vec<String>, preferences: Vec<String>) -> Self {
        Self {
            requirements,
            preferences,
        }
    }

    /// One line per field, each with the same text.
    pub fn uniform(text: &str) -> Self {
        Self::pair(text, text)
    }

    /// One line per field, with distinct text for each.
    pub fn pair(requirements: &str, preferences: &str) -> Self {
        Self {
            requirements: vec![requirements.to_string()],
            preferences: vec![preferences.to_string()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty() || self.preferences.is_empty()
    }
}
