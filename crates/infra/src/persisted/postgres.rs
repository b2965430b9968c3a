//! Postgres-backed job-posting store.
//!
//! Reads the stored `requirements` / `preferences` columns of a job posting.
//! Both columns are `jsonb` and may hold either a JSON array of strings or a
//! JSON string containing an encoded array; the coordinator normalizes both.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::debug;

use hirelens_analysis::{PersistedRecord, PersistedRecordLookup, PersistedStoreError};
use hirelens_core::JobId;

/// Default table holding job postings.
pub const DEFAULT_POSTINGS_TABLE: &str = "job_postings";

pub struct PostgresJobPostingStore {
    pool: Arc<PgPool>,
    query: String,
}

impl PostgresJobPostingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            query: select_for(DEFAULT_POSTINGS_TABLE),
        }
    }

    /// Use a custom table. The name must be a plain (optionally schema-qualified) identifier.
    pub fn with_table(pool: PgPool, table: &str) -> Result<Self, PersistedStoreError> {
        if !is_identifier(table) {
            return Err(PersistedStoreError::Query(format!("invalid table name: {table:?}")));
        }

        Ok(Self {
            pool: Arc::new(pool),
            query: select_for(table),
        })
    }

    pub async fn connect(database_url: &str, table: &str) -> Result<Self, PersistedStoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| PersistedStoreError::Unavailable(e.to_string()))?;
        Self::with_table(pool, table)
    }
}

// id is compared as text so numeric and text id columns both work.
fn select_for(table: &str) -> String {
    format!("SELECT requirements, preferences FROM {table} WHERE id::text = $1")
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                && !part.starts_with(|c: char| c.is_ascii_digit())
        })
}

#[async_trait]
impl PersistedRecordLookup for PostgresJobPostingStore {
    async fn find(&self, job_id: &JobId) -> Result<Option<PersistedRecord>, PersistedStoreError> {
        let row = sqlx::query(&self.query)
            .bind(job_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| PersistedStoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            debug!(job_id = %job_id, "no persisted job posting");
            return Ok(None);
        };

        let requirements: Option<JsonValue> = row
            .try_get("requirements")
            .map_err(|e| PersistedStoreError::Query(e.to_string()))?;
        let preferences: Option<JsonValue> = row
            .try_get("preferences")
            .map_err(|e| PersistedStoreError::Query(e.to_string()))?;

        Ok(Some(PersistedRecord {
            requirements,
            preferences,
        }))
    }
}
