use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use hirelens_analysis::{PersistedRecord, PersistedRecordLookup, PersistedStoreError};
use hirelens_core::JobId;

/// In-memory job-posting store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJobPostingStore {
    inner: RwLock<HashMap<JobId, PersistedRecord>>,
}

impl InMemoryJobPostingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, job_id: impl Into<JobId>, record: PersistedRecord) {
        let mut map = self.inner.write().unwrap_or_else(|p| p.into_inner());
        map.insert(job_id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PersistedRecordLookup for InMemoryJobPostingStore {
    async fn find(&self, job_id: &JobId) -> Result<Option<PersistedRecord>, PersistedStoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| PersistedStoreError::Unavailable("in-memory store lock poisoned".into()))?;
        Ok(map.get(job_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn finds_records_by_coerced_id() {
        let store = InMemoryJobPostingStore::new();
        store.upsert(42u64, PersistedRecord::new(json!(["5년 경력"]), json!(["운전면허"])));

        let found = store.find(&JobId::from("42")).await.unwrap();
        assert_eq!(found.unwrap().requirements, Some(json!(["5년 경력"])));
        assert!(store.find(&JobId::from("43")).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn upsert_still_writes_after_a_panicking_writer() {
        let store = InMemoryJobPostingStore::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _map = store.inner.write().unwrap();
            panic!("writer died");
        }));
        assert!(store.inner.is_poisoned());

        store.upsert("7", PersistedRecord::new(json!(["A"]), json!(["B"])));
        let map = store.inner.read().unwrap_or_else(|p| p.into_inner());
        assert_eq!(map.get(&JobId::from("7")).unwrap().preferences, Some(json!(["B"])));
    }
}
