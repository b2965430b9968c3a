use axum::{routing::get, Router};

pub mod analysis;
pub mod system;

/// Router for the analysis endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/stats", get(system::stats))
        .nest("/jobs", analysis::router())
}
