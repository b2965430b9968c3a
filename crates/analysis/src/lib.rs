//! `hirelens-analysis`
//!
//! **Responsibility:** turn an expensive, fallible "extract requirements and
//! preferences from a job posting" call into an idempotent, deduplicated,
//! rate-limited service that many callers can hit concurrently.
//!
//! The crate is storage- and transport-agnostic: the analysis backend and the
//! persisted-record store are traits implemented by `hirelens-infra`.

pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod markers;
pub mod normalizer;
pub mod persisted;
pub mod placeholder;

pub use backend::{AnalysisBackend, BackendError};
pub use cache::{FailureCooldownTracker, InFlightGuard, InFlightRegistry, ResultCache, StateError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoordinatorConfig;
pub use coordinator::{CoordinatorError, CoordinatorStats, JobState, Outcome, RequestCoordinator, Resolution};
pub use markers::ErrorMarkers;
pub use normalizer::{Normalized, RawAnalysis, ResponseNormalizer};
pub use persisted::{PersistedRecord, PersistedRecordLookup, PersistedStoreError};
