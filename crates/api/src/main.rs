use anyhow::Context;

use hirelens_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hirelens_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;
    if settings.database_url.is_none() {
        tracing::warn!("DATABASE_URL not set; persisted analyses come from an empty in-memory store");
    }

    let services = hirelens_api::app::services::build_services(&settings).await?;
    let app = hirelens_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, backend = %settings.backend_url, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
