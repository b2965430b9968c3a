use std::sync::Arc;

use anyhow::Context;

use hirelens_analysis::{PersistedRecordLookup, RequestCoordinator};
use hirelens_infra::{HttpAnalysisClient, InMemoryJobPostingStore, PostgresJobPostingStore, Settings};

/// Shared services handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    pub coordinator: Arc<RequestCoordinator>,
}

impl AppServices {
    pub fn new(coordinator: Arc<RequestCoordinator>) -> Self {
        Self { coordinator }
    }
}

/// Wire the coordinator from settings: HTTP backend + Postgres (or in-memory) persisted store.
pub async fn build_services(settings: &Settings) -> anyhow::Result<AppServices> {
    let mut backend = HttpAnalysisClient::new(&settings.backend_url, settings.backend_timeout)
        .context("failed to build analysis backend client")?;
    if let Some(token) = &settings.backend_token {
        backend = backend.with_token(token);
    }

    let persisted: Arc<dyn PersistedRecordLookup> = match &settings.database_url {
        Some(url) => {
            let store = PostgresJobPostingStore::connect(url, &settings.postings_table)
                .await
                .context("failed to connect persisted job-posting store")?;
            tracing::info!(table = %settings.postings_table, "using postgres job-posting store");
            Arc::new(store)
        }
        None => Arc::new(InMemoryJobPostingStore::new()),
    };

    let coordinator = RequestCoordinator::new(Arc::new(backend), persisted, settings.coordinator_config());
    Ok(AppServices::new(Arc::new(coordinator)))
}
