use railbook_api::{app, AppState};
use railbook_store::Config;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "railbook_api=debug,railbook_order=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Railbook API on port {}", config.server.port);
    tracing::info!(auth_backend = %config.api.base_url, seed = ?config.catalog.seed, "configuration loaded");

    let state = AppState::from_config(&config)?;
    let _sweeper = state.spawn_sweeper(Duration::from_secs(config.server.sweep_interval_seconds));
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
