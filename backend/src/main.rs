use anyhow::Context;
use backend::{api, config::ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load().context("Failed to load server configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(
        "[CONFIG] host={} port={} event_buffer={}",
        config.host, config.port, config.event_buffer
    );

    let state = api::AppState::new(config.event_buffer);
    let app = api::router(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("[BACKEND] Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
