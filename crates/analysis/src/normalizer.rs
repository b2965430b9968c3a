//! Response normalization.
//!
//! Upstream payloads carry `requirements` and `preferences` either as a JSON
//! array of strings or as a string holding a JSON-encoded array. Each field is
//! classified independently; only a pair of non-empty, marker-free arrays is a
//! hard pass. Everything else becomes a placeholder-carrying result, never an
//! error.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use hirelens_core::AnalysisResult;

use crate::markers::ErrorMarkers;
use crate::placeholder;

/// Raw analysis payload as received from the backend or the persisted store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub requirements: Option<JsonValue>,
    #[serde(default)]
    pub preferences: Option<JsonValue>,
}

impl RawAnalysis {
    pub fn new(requirements: JsonValue, preferences: JsonValue) -> Self {
        Self {
            requirements: Some(requirements),
            preferences: Some(preferences),
        }
    }
}

/// Outcome of normalizing a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Both fields parsed to non-empty, marker-free arrays. Safe to cache.
    Valid(AnalysisResult),
    /// Structurally valid result carrying placeholder text. Must not be cached.
    SoftFailure(AnalysisResult),
}

impl Normalized {
    pub fn is_valid(&self) -> bool {
        matches!(self, Normalized::Valid(_))
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            Normalized::Valid(r) | Normalized::SoftFailure(r) => r,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    Requirements,
    Preferences,
}

impl FieldKind {
    fn name(self) -> &'static str {
        match self {
            FieldKind::Requirements => "requirements",
            FieldKind::Preferences => "preferences",
        }
    }

    fn empty_text(self) -> &'static str {
        match self {
            FieldKind::Requirements => placeholder::EMPTY_REQUIREMENTS,
            FieldKind::Preferences => placeholder::EMPTY_PREFERENCES,
        }
    }
}

#[derive(Debug)]
enum Field {
    Items(Vec<String>),
    Empty,
    Malformed,
    Flagged(Vec<String>),
}

impl Field {
    fn into_lines(self, kind: FieldKind) -> Vec<String> {
        match self {
            Field::Items(items) | Field::Flagged(items) => items,
            Field::Empty => vec![kind.empty_text().to_string()],
            Field::Malformed => vec![placeholder::MALFORMED.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResponseNormalizer {
    markers: ErrorMarkers,
}

impl ResponseNormalizer {
    pub fn new(markers: ErrorMarkers) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &ErrorMarkers {
        &self.markers
    }

    pub fn normalize(&self, raw: &RawAnalysis) -> Normalized {
        let requirements = self.classify(FieldKind::Requirements, raw.requirements.as_ref());
        let preferences = self.classify(FieldKind::Preferences, raw.preferences.as_ref());

        match (requirements, preferences) {
            (Field::Items(requirements), Field::Items(preferences)) => {
                Normalized::Valid(AnalysisResult::new(requirements, preferences))
            }
            (requirements, preferences) => Normalized::SoftFailure(AnalysisResult::new(
                requirements.into_lines(FieldKind::Requirements),
                preferences.into_lines(FieldKind::Preferences),
            )),
        }
    }

    fn classify(&self, kind: FieldKind, value: Option<&JsonValue>) -> Field {
        let items = match value {
            Some(JsonValue::Array(values)) => string_items(values),
            Some(JsonValue::String(encoded)) => serde_json::from_str::<Vec<String>>(encoded).ok(),
            _ => None,
        };

        let Some(items) = items else {
            debug!(field = kind.name(), "analysis field is missing or malformed");
            return Field::Malformed;
        };

        if items.is_empty() {
            debug!(field = kind.name(), "analysis field is empty");
            return Field::Empty;
        }

        if self.markers.any_line(&items) {
            debug!(field = kind.name(), "analysis field contains an error marker");
            return Field::Flagged(items);
        }

        Field::Items(items)
    }
}

fn string_items(values: &[JsonValue]) -> Option<Vec<String>> {
    values
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}
