//! Request coordinator: the single entry point for job analyses.
//!
//! Resolution order for `resolve(job_id)`, first match wins:
//!
//! 1. cached success
//! 2. active failure cooldown -> cooldown placeholder
//! 3. already in flight -> in-progress placeholder (callers poll, they are
//!    not attached to the running analysis)
//! 4. persisted record that normalizes to a valid result -> cached + returned
//! 5. fresh backend analysis
//!
//! The in-flight claim in step 3 is an atomic test-and-insert, and it is held
//! through steps 4 and 5. At most one persisted lookup or backend call runs
//! per job at any time.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use hirelens_core::{AnalysisResult, JobId};

use crate::backend::{AnalysisBackend, BackendError};
use crate::cache::{FailureCooldownTracker, InFlightGuard, InFlightRegistry, ResultCache, StateError};
use crate::clock::{Clock, SystemClock};
use crate::config::CoordinatorConfig;
use crate::normalizer::{Normalized, ResponseNormalizer};
use crate::persisted::PersistedRecordLookup;
use crate::placeholder;

/// Internal coordinator failure. Never returned to callers of `resolve`.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    State(#[from] StateError),
}

/// How a result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Served from the result cache.
    Cached,
    /// Loaded from the persisted store and now cached.
    Persisted,
    /// Fresh backend analysis, now cached.
    Analyzed,
    /// Another analysis for this job is running.
    InFlight,
    /// A hard failure happened within the cooldown window.
    CoolingDown,
    /// The backend answered with a malformed payload. Retryable immediately.
    SoftFailure,
    /// The backend call failed, or the coordinator itself did.
    Failed,
}

impl Outcome {
    /// Whether the accompanying result is a real extraction.
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Cached | Outcome::Persisted | Outcome::Analyzed)
    }
}

/// Per-job state, derived purely from cache membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Unseen,
    Analyzing,
    CachedSuccess,
    CoolingDown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub job_id: JobId,
    pub outcome: Outcome,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoordinatorStats {
    pub cached: usize,
    pub cooling_down: usize,
    pub in_flight: usize,
}

type Resolved = Result<(Outcome, AnalysisResult), CoordinatorError>;

/// Owns the three caches and the collaborators. Construct once, share via `Arc`.
pub struct RequestCoordinator {
    backend: Arc<dyn AnalysisBackend>,
    persisted: Arc<dyn PersistedRecordLookup>,
    clock: Arc<dyn Clock>,
    normalizer: ResponseNormalizer,
    config: CoordinatorConfig,
    results: ResultCache,
    cooldowns: FailureCooldownTracker,
    in_flight: InFlightRegistry,
}

impl RequestCoordinator {
    pub fn new(
        backend: Arc<dyn AnalysisBackend>,
        persisted: Arc<dyn PersistedRecordLookup>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            backend,
            persisted,
            clock: Arc::new(SystemClock),
            normalizer: ResponseNormalizer::new(config.error_markers.clone()),
            cooldowns: FailureCooldownTracker::new(config.cooldown),
            results: ResultCache::new(),
            in_flight: InFlightRegistry::new(),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Analysis for `job_id`. Never fails; problems come back as placeholders.
    pub async fn get_analysis(&self, job_id: impl Into<JobId>) -> AnalysisResult {
        self.resolve(job_id).await.result
    }

    /// Like `get_analysis`, but also reports how the result was produced.
    pub async fn resolve(&self, job_id: impl Into<JobId>) -> Resolution {
        let job_id = job_id.into();
        let resolved = self.try_resolve(&job_id).await;
        settle(job_id, resolved)
    }

    /// Run a fresh backend analysis, skipping the cache and persisted store.
    ///
    /// Still refuses to start a second analysis for a job that is in flight.
    pub async fn run_analysis(&self, job_id: impl Into<JobId>) -> AnalysisResult {
        let job_id = job_id.into();
        let resolved = match self.in_flight.try_acquire(&job_id) {
            Ok(Some(guard)) => self.analyze(&job_id, guard).await,
            Ok(None) => Ok((Outcome::InFlight, placeholder::in_progress())),
            Err(e) => Err(e.into()),
        };
        settle(job_id, resolved).result
    }

    pub fn state_of(&self, job_id: &JobId) -> Result<JobState, CoordinatorError> {
        if self.results.contains(job_id)? {
            return Ok(JobState::CachedSuccess);
        }
        if self.cooldowns.is_active(job_id, self.clock.now_ms())? {
            return Ok(JobState::CoolingDown);
        }
        if self.in_flight.contains(job_id)? {
            return Ok(JobState::Analyzing);
        }
        Ok(JobState::Unseen)
    }

    pub fn stats(&self) -> Result<CoordinatorStats, CoordinatorError> {
        Ok(CoordinatorStats {
            cached: self.results.len()?,
            cooling_down: self.cooldowns.active_count(self.clock.now_ms())?,
            in_flight: self.in_flight.len()?,
        })
    }

    async fn try_resolve(&self, job_id: &JobId) -> Resolved {
        if let Some(hit) = self.results.get(job_id)? {
            debug!(job_id = %job_id, "analysis cache hit");
            return Ok((Outcome::Cached, hit));
        }

        if self.cooldowns.is_active(job_id, self.clock.now_ms())? {
            debug!(job_id = %job_id, "analysis suppressed by failure cooldown");
            return Ok((Outcome::CoolingDown, placeholder::cooling_down()));
        }

        let Some(guard) = self.in_flight.try_acquire(job_id)? else {
            debug!(job_id = %job_id, "analysis already in flight");
            return Ok((Outcome::InFlight, placeholder::in_progress()));
        };

        // A concurrent analysis may have finished between the first check and the claim.
        if let Some(hit) = self.results.get(job_id)? {
            return Ok((Outcome::Cached, hit));
        }

        if let Some(result) = self.load_persisted(job_id).await? {
            return Ok((Outcome::Persisted, result));
        }

        self.analyze(job_id, guard).await
    }

    async fn load_persisted(&self, job_id: &JobId) -> Result<Option<AnalysisResult>, CoordinatorError> {
        let record = match self.persisted.find(job_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "persisted analysis lookup failed; falling back to backend");
                return Ok(None);
            }
        };

        let Some(raw) = record.usable() else {
            debug!(job_id = %job_id, "persisted record has no usable analysis");
            return Ok(None);
        };

        match self.normalizer.normalize(&raw) {
            Normalized::Valid(result) => {
                debug!(job_id = %job_id, "using persisted analysis");
                Ok(Some(self.results.insert(job_id.clone(), result)?))
            }
            Normalized::SoftFailure(_) => {
                debug!(job_id = %job_id, "persisted analysis failed validation");
                Ok(None)
            }
        }
    }

    /// Call the backend while holding the in-flight claim.
    async fn analyze(&self, job_id: &JobId, _claim: InFlightGuard<'_>) -> Resolved {
        info!(job_id = %job_id, "starting job analysis");
        let started = Instant::now();

        let timeout = self.config.backend_timeout;
        let raw = match tokio::time::timeout(timeout, self.backend.analyze(job_id)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => return self.hard_failure(job_id, &e),
            Err(_) => return self.hard_failure(job_id, &BackendError::Timeout(timeout)),
        };

        match self.normalizer.normalize(&raw) {
            Normalized::Valid(result) => {
                let cached = self.results.insert(job_id.clone(), result)?;
                self.cooldowns.clear(job_id)?;
                info!(
                    job_id = %job_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    requirements = cached.requirements.len(),
                    preferences = cached.preferences.len(),
                    "job analysis completed"
                );
                Ok((Outcome::Analyzed, cached))
            }
            Normalized::SoftFailure(result) => {
                warn!(job_id = %job_id, "analysis backend returned a malformed payload");
                Ok((Outcome::SoftFailure, result))
            }
        }
    }

    fn hard_failure(&self, job_id: &JobId, err: &BackendError) -> Resolved {
        warn!(
            job_id = %job_id,
            error = %err,
            cooldown_ms = self.config.cooldown.as_millis() as u64,
            "job analysis failed; cooling down"
        );
        self.cooldowns.record_failure(job_id.clone(), self.clock.now_ms())?;
        Ok((Outcome::Failed, placeholder::hard_failure()))
    }
}

fn settle(job_id: JobId, resolved: Resolved) -> Resolution {
    match resolved {
        Ok((outcome, result)) => Resolution {
            job_id,
            outcome,
            result,
        },
        Err(e) => {
            error!(job_id = %job_id, error = %e, "analysis coordinator failed");
            Resolution {
                job_id,
                outcome: Outcome::Failed,
                result: placeholder::unexpected_failure(),
            }
        }
    }
}
