use serde::Serialize;

use hirelens_analysis::{JobState, Outcome, Resolution};
use hirelens_core::JobId;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub job_id: JobId,
    pub status: Outcome,
    pub requirements: Vec<String>,
    pub preferences: Vec<String>,
}

impl From<Resolution> for AnalysisResponse {
    fn from(r: Resolution) -> Self {
        Self {
            job_id: r.job_id,
            status: r.outcome,
            requirements: r.result.requirements,
            preferences: r.result.preferences,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobStateResponse {
    pub job_id: JobId,
    pub state: JobState,
}
