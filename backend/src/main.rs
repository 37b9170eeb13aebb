use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chore_tracker_backend::config::AppConfig;
use chore_tracker_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!("Using data directory {:?}", config.data_directory);

    let app_state = initialize_backend(&config)?;

    if let (Some(sync), Some(remote)) = (app_state.sync.clone(), config.remote.as_ref()) {
        if let Err(e) = sync.connect().await {
            warn!("Starting offline, will keep retrying: {}", e);
        }
        sync.spawn_watcher(remote.poll_interval());
    }

    let app = create_router(app_state);

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}
