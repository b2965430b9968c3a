//! Process-lifetime state behind the coordinator.
//!
//! - `ResultCache`: JobId -> validated result, first success wins.
//! - `FailureCooldownTracker`: JobId -> epoch ms of the last hard failure.
//! - `InFlightRegistry`: JobIds with an analysis currently running.
//!
//! None of these evict. Entries live until the process exits; cooldown
//! records are only purged once they are observed to be expired.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use thiserror::Error;

use hirelens_core::{AnalysisResult, JobId};

/// A state lock was poisoned by a panicking holder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0} lock poisoned")]
pub struct StateError(&'static str);

/// Validated results, keyed by job.
#[derive(Debug, Default)]
pub struct ResultCache {
    inner: RwLock<HashMap<JobId, AnalysisResult>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, job_id: &JobId) -> Result<Option<AnalysisResult>, StateError> {
        let map = self.inner.read().map_err(|_| StateError("result cache"))?;
        Ok(map.get(job_id).cloned())
    }

    pub fn contains(&self, job_id: &JobId) -> Result<bool, StateError> {
        let map = self.inner.read().map_err(|_| StateError("result cache"))?;
        Ok(map.contains_key(job_id))
    }

    /// Store a validated result unless one is already cached.
    ///
    /// Returns the result that ends up cached, which is the earlier one when
    /// the key was already populated.
    pub fn insert(&self, job_id: JobId, result: AnalysisResult) -> Result<AnalysisResult, StateError> {
        let mut map = self.inner.write().map_err(|_| StateError("result cache"))?;
        Ok(map.entry(job_id).or_insert(result).clone())
    }

    pub fn len(&self) -> Result<usize, StateError> {
        let map = self.inner.read().map_err(|_| StateError("result cache"))?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.len()? == 0)
    }

    /// Leave the lock poisoned, as a writer panicking mid-insert would.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _map = self.inner.write().unwrap();
            panic!("result cache writer panicked");
        }));
    }
}

/// Last hard-failure timestamp per job, with a fixed suppression window.
#[derive(Debug)]
pub struct FailureCooldownTracker {
    window_ms: i64,
    inner: Mutex<HashMap<JobId, i64>>,
}

impl FailureCooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: window.as_millis() as i64,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms as u64)
    }

    pub fn record_failure(&self, job_id: JobId, failed_at_ms: i64) -> Result<(), StateError> {
        let mut map = self.inner.lock().map_err(|_| StateError("cooldown tracker"))?;
        map.insert(job_id, failed_at_ms);
        Ok(())
    }

    /// Whether a failure for `job_id` is still inside the window at `now_ms`.
    ///
    /// Expired records are removed as a side effect.
    pub fn is_active(&self, job_id: &JobId, now_ms: i64) -> Result<bool, StateError> {
        let mut map = self.inner.lock().map_err(|_| StateError("cooldown tracker"))?;
        match map.get(job_id) {
            Some(&failed_at) if now_ms - failed_at < self.window_ms => Ok(true),
            Some(_) => {
                map.remove(job_id);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    pub fn clear(&self, job_id: &JobId) -> Result<(), StateError> {
        let mut map = self.inner.lock().map_err(|_| StateError("cooldown tracker"))?;
        map.remove(job_id);
        Ok(())
    }

    pub fn active_count(&self, now_ms: i64) -> Result<usize, StateError> {
        let map = self.inner.lock().map_err(|_| StateError("cooldown tracker"))?;
        Ok(map
            .values()
            .filter(|&&failed_at| now_ms - failed_at < self.window_ms)
            .count())
    }
}

/// Jobs with an analysis currently running.
#[derive(Debug, Default)]
pub struct InFlightRegistry {
    inner: Mutex<HashSet<JobId>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim `job_id`.
    ///
    /// Returns `None` when another caller already holds it. The claim is
    /// released when the returned guard is dropped, on every exit path.
    pub fn try_acquire(&self, job_id: &JobId) -> Result<Option<InFlightGuard<'_>>, StateError> {
        let mut set = self.inner.lock().map_err(|_| StateError("in-flight registry"))?;
        if !set.insert(job_id.clone()) {
            return Ok(None);
        }
        Ok(Some(InFlightGuard {
            registry: self,
            job_id: job_id.clone(),
        }))
    }

    pub fn contains(&self, job_id: &JobId) -> Result<bool, StateError> {
        let set = self.inner.lock().map_err(|_| StateError("in-flight registry"))?;
        Ok(set.contains(job_id))
    }

    pub fn len(&self) -> Result<usize, StateError> {
        let set = self.inner.lock().map_err(|_| StateError("in-flight registry"))?;
        Ok(set.len())
    }

    pub fn is_empty(&self) -> Result<bool, StateError> {
        Ok(self.len()? == 0)
    }

    fn release(&self, job_id: &JobId) {
        // Release must happen even if another holder panicked mid-update.
        let mut set = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(job_id);
    }
}

/// Scoped in-flight claim; dropping it deregisters the job.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlightRegistry,
    job_id: JobId,
}

impl InFlightGuard<'_> {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry.release(&self.job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tag: &str) -> AnalysisResult {
        AnalysisResult::uniform(tag)
    }

    #[test]
    fn poisoned_result_cache_reports_state_error() {
        let cache = ResultCache::new();
        cache.poison();
        let id = JobId::from("1");
        assert_eq!(cache.get(&id), Err(StateError("result cache")));
        assert!(cache.insert(id, result("a")).is_err());
    }

    #[test]
    fn result_cache_keeps_first_success() {
        let cache = ResultCache::new();
        let id = JobId::from("1");
        assert_eq!(cache.insert(id.clone(), result("a")).unwrap(), result("a"));
        assert_eq!(cache.insert(id.clone(), result("b")).unwrap(), result("a"));
        assert_eq!(cache.get(&id).unwrap(), Some(result("a")));
        assert_eq!(cache.len().unwrap(), 1);
    }

    #[test]
    fn cooldown_expires_at_window_boundary() {
        let tracker = FailureCooldownTracker::new(Duration::from_millis(60_000));
        let id = JobId::from("1");
        tracker.record_failure(id.clone(), 1_000).unwrap();

        assert!(tracker.is_active(&id, 1_000).unwrap());
        assert!(tracker.is_active(&id, 60_999).unwrap());
        assert!(!tracker.is_active(&id, 61_000).unwrap());
        // Purged once observed as expired.
        assert_eq!(tracker.active_count(1_000).unwrap(), 0);
    }

    #[test]
    fn cooldown_clear_removes_record() {
        let tracker = FailureCooldownTracker::new(Duration::from_secs(60));
        let id = JobId::from("1");
        tracker.record_failure(id.clone(), 0).unwrap();
        tracker.clear(&id).unwrap();
        assert!(!tracker.is_active(&id, 1).unwrap());
    }

    #[test]
    fn in_flight_claim_is_exclusive_until_dropped() {
        let registry = InFlightRegistry::new();
        let id = JobId::from("1");

        let guard = registry.try_acquire(&id).unwrap().expect("first claim");
        assert_eq!(guard.job_id(), &id);
        assert!(registry.try_acquire(&id).unwrap().is_none());
        assert!(registry.contains(&id).unwrap());

        drop(guard);
        assert!(!registry.contains(&id).unwrap());
        assert!(registry.try_acquire(&id).unwrap().is_some());
    }

    #[test]
    fn in_flight_claim_released_on_panic() {
        let registry = InFlightRegistry::new();
        let id = JobId::from("1");

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = registry.try_acquire(&id).unwrap();
            panic!("analysis blew up");
        }));

        assert!(outcome.is_err());
        assert!(registry.is_empty().unwrap());
    }
}
