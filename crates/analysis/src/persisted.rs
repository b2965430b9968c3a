//! Read-only lookup of previously computed analyses.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use hirelens_core::JobId;

use crate::normalizer::RawAnalysis;

/// Stored analysis fields of a job posting, in the same dual representation
/// (array or JSON-encoded string) the backend uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub requirements: Option<JsonValue>,
    pub preferences: Option<JsonValue>,
}

impl PersistedRecord {
    pub fn new(requirements: JsonValue, preferences: JsonValue) -> Self {
        Self {
            requirements: Some(requirements),
            preferences: Some(preferences),
        }
    }

    /// Both fields as a raw payload, or `None` when either is null/absent.
    pub fn usable(&self) -> Option<RawAnalysis> {
        match (&self.requirements, &self.preferences) {
            (Some(r), Some(p)) if !r.is_null() && !p.is_null() => {
                Some(RawAnalysis::new(r.clone(), p.clone()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum PersistedStoreError {
    #[error("persisted store query failed: {0}")]
    Query(String),

    #[error("persisted store unavailable: {0}")]
    Unavailable(String),
}

/// Secondary store consulted before triggering a fresh analysis.
#[async_trait]
pub trait PersistedRecordLookup: Send + Sync + 'static {
    async fn find(&self, job_id: &JobId) -> Result<Option<PersistedRecord>, PersistedStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn usable_requires_both_fields() {
        assert!(PersistedRecord::new(json!(["a"]), json!(["b"])).usable().is_some());
        assert!(PersistedRecord::new(json!(["a"]), JsonValue::Null).usable().is_none());
        let partial = PersistedRecord {
            requirements: Some(json!(["a"])),
            preferences: None,
        };
        assert!(partial.usable().is_none());
    }
}
