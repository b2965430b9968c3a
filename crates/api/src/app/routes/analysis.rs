use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto::{AnalysisResponse, JobStateResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/:job_id/analysis", get(get_analysis))
        .route("/:job_id/analysis/state", get(get_state))
}

/// Always 200 once the id is valid: failures come back as placeholder text
/// with a non-success `status`.
pub async fn get_analysis(
    Extension(services): Extension<Arc<AppServices>>,
    Path(job_id): Path<String>,
) -> axum::response::Response {
    let job_id = match errors::parse_job_id(&job_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let resolution = services.coordinator.resolve(job_id).await;
    tracing::debug!(job_id = %resolution.job_id, status = ?resolution.outcome, "analysis resolved");
    Json(AnalysisResponse::from(resolution)).into_response()
}

pub async fn get_state(
    Extension(services): Extension<Arc<AppServices>>,
    Path(job_id): Path<String>,
) -> axum::response::Response {
    let job_id = match errors::parse_job_id(&job_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.coordinator.state_of(&job_id) {
        Ok(state) => Json(JobStateResponse { job_id, state }).into_response(),
        Err(e) => errors::coordinator_error_to_response(e),
    }
}
