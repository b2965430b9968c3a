use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hirelens_analysis::CoordinatorError;
use hirelens_core::{DomainError, JobId};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_job_id", msg),
    }
}

pub fn coordinator_error_to_response(err: CoordinatorError) -> axum::response::Response {
    tracing::error!(error = %err, "coordinator state unavailable");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", err.to_string())
}

pub fn parse_job_id(raw: &str) -> Result<JobId, axum::response::Response> {
    JobId::parse(raw).map_err(domain_error_to_response)
}
