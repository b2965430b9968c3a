//! Analysis backend boundary.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use hirelens_core::JobId;

use crate::normalizer::RawAnalysis;

/// Performs the actual requirement/preference extraction for one job.
///
/// Implementations should enforce their own transport timeout; the
/// coordinator additionally bounds every call with its configured timeout.
#[async_trait]
pub trait AnalysisBackend: Send + Sync + 'static {
    async fn analyze(&self, job_id: &JobId) -> Result<RawAnalysis, BackendError>;
}

/// Hard failures of a backend call. All of them start a cooldown.
///
/// A reply that arrives but has the wrong shape is not one of these: the
/// backend returns it as a [`RawAnalysis`] and the normalizer turns it into a
/// soft failure. `Decode` covers a body that could not be read at all.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("analysis backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("analysis backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode analysis response: {0}")]
    Decode(String),
}
