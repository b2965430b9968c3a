//! HTTP client for the analysis backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use hirelens_analysis::{AnalysisBackend, BackendError, RawAnalysis};
use hirelens_core::JobId;

/// Triggers an analysis via `POST {base_url}/jobs/{job_id}/analysis`.
///
/// The request has no body and the job id is sent as a single
/// percent-encoded path segment. Anything other than a 2xx is a hard failure.
/// A 2xx body that is not a JSON object is handed on as an empty
/// [`RawAnalysis`] so it is classified as a malformed payload, not a failure.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| BackendError::Transport(format!("invalid backend url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Transport(format!("invalid backend url: {base_url}")));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: None,
            timeout,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, job_id: &JobId) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport(format!("invalid backend url: {}", self.base_url)))?
            .pop_if_empty()
            .push("jobs")
            .push(job_id.as_str())
            .push("analysis");
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else if err.is_decode() || err.is_body() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

// Only a JSON object carries the two fields. Anything else reaches the
// normalizer with both fields missing.
fn raw_from_body(job_id: &JobId, body: &[u8]) -> RawAnalysis {
    match serde_json::from_slice::<Value>(body) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(job_id = %job_id, error = %e, "analysis response object has unexpected shape");
            RawAnalysis::default()
        }),
        Ok(other) => {
            warn!(job_id = %job_id, kind = json_kind(&other), "analysis response is not a JSON object");
            RawAnalysis::default()
        }
        Err(e) => {
            warn!(job_id = %job_id, error = %e, "analysis response is not valid JSON");
            RawAnalysis::default()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze(&self, job_id: &JobId) -> Result<RawAnalysis, BackendError> {
        let url = self.endpoint(job_id)?;
        debug!(job_id = %job_id, url = %url, "requesting job analysis");

        let mut req = self.client.post(url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        Ok(raw_from_body(job_id, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
    use serde_json::json;

    use hirelens_analysis::{placeholder, CoordinatorConfig, Outcome, RequestCoordinator};
    use hirelens_core::AnalysisResult;

    use crate::InMemoryJobPostingStore;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn returns_raw_payload_on_success() {
        let router = Router::new().route(
            "/jobs/:job_id/analysis",
            post(|Path(job_id): Path<String>| async move {
                Json(json!({
                    "requirements": format!("[\"job {job_id}\"]"),
                    "preferences": ["B"],
                }))
            }),
        );
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(format!("{base}/"), Duration::from_secs(5)).unwrap();

        let raw = client.analyze(&JobId::from("42")).await.unwrap();
        assert_eq!(raw.requirements, Some(json!("[\"job 42\"]")));
        assert_eq!(raw.preferences, Some(json!(["B"])));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let router = Router::new().route(
            "/jobs/:job_id/analysis",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(base, Duration::from_secs(5)).unwrap();

        match client.analyze(&JobId::from("1")).await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let router = Router::new().route(
            "/jobs/:job_id/analysis",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({ "requirements": ["A"], "preferences": ["B"] }))
            }),
        );
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(base, Duration::from_millis(50)).unwrap();

        let err = client.analyze(&JobId::from("1")).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout(_)), "{err:?}");
    }

    #[tokio::test]
    async fn non_object_body_is_handed_on_as_malformed() {
        let router = Router::new()
            .route("/jobs/text/analysis", post(|| async { "plain text" }))
            .route("/jobs/string/analysis", post(|| async { Json(json!("[\"A\"]")) }))
            .route("/jobs/null/analysis", post(|| async { Json(Value::Null) }));
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(base, Duration::from_secs(5)).unwrap();

        for id in ["text", "string", "null"] {
            let raw = client.analyze(&JobId::from(id)).await.unwrap();
            assert_eq!(raw.requirements, None, "{id}");
            assert_eq!(raw.preferences, None, "{id}");
        }
    }

    #[tokio::test]
    async fn plain_text_reply_is_a_soft_failure_and_retried_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let router = Router::new().route(
            "/jobs/:job_id/analysis",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "plain text"
                }
            }),
        );
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(base, Duration::from_secs(5)).unwrap();
        let coordinator = RequestCoordinator::new(
            Arc::new(client),
            Arc::new(InMemoryJobPostingStore::new()),
            CoordinatorConfig::default(),
        );

        let first = coordinator.resolve("9").await;
        assert_eq!(first.outcome, Outcome::SoftFailure);
        assert_eq!(first.result, AnalysisResult::uniform(placeholder::MALFORMED));

        let second = coordinator.resolve("9").await;
        assert_eq!(second.outcome, Outcome::SoftFailure);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(coordinator.stats().unwrap().cooling_down, 0);
    }

    #[tokio::test]
    async fn job_id_is_sent_as_one_encoded_segment() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let router = Router::new().route(
            "/api/jobs/:job_id/analysis",
            post(move |Path(job_id): Path<String>| {
                let sink = sink.clone();
                async move {
                    sink.lock().unwrap().push(job_id);
                    Json(json!({ "requirements": ["A"], "preferences": ["B"] }))
                }
            }),
        );
        let base = spawn(router).await;
        let client = HttpAnalysisClient::new(format!("{base}/api/"), Duration::from_secs(5)).unwrap();

        for id in ["a/b?c", "../admin", "x#y"] {
            let raw = client.analyze(&JobId::from(id)).await.unwrap();
            assert_eq!(raw.requirements, Some(json!(["A"])), "{id}");
        }
        assert_eq!(*seen.lock().unwrap(), vec!["a/b?c", "../admin", "x#y"]);
    }

    #[test]
    fn rejects_urls_that_cannot_hold_a_path() {
        assert!(matches!(
            HttpAnalysisClient::new("mailto:analysis@example.com", Duration::from_secs(1)),
            Err(BackendError::Transport(_))
        ));
        assert!(HttpAnalysisClient::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let client = HttpAnalysisClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.analyze(&JobId::from("1")).await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_) | BackendError::Timeout(_)), "{err:?}");
    }
}
