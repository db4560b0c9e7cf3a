use std::sync::Arc;

use anyhow::Context;

use eventgate_api::config::{AppConfig, ERROR_STREAM_VAR};
use eventgate_events::{EventBus, InMemoryEventBus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    eventgate_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    match &config.error_events {
        Some(conf) => tracing::info!(
            error_stream = %conf.error_stream,
            schema_uri = %conf.schema_uri,
            "error events enabled"
        ),
        None => tracing::warn!("{ERROR_STREAM_VAR} not set; error events are disabled"),
    }

    // Reference bus; swap in a broker-backed implementation here.
    let bus: Arc<dyn EventBus> = Arc::new(InMemoryEventBus::new());
    let app = eventgate_api::app::build_app(&config, bus);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
