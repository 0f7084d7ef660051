use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapmark::places::NominatimGeocoder;
use mapmark::{open_repository, router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapmark=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mapmark sync server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}, Storage: {:?}",
        config.environment,
        config.server_address(),
        config.storage_backend
    );

    // Open storage (connects and migrates for postgres)
    let db = open_repository(&config).await?;

    let geocoder = NominatimGeocoder::new(
        config.geocoder_url.clone(),
        &config.geocoder_user_agent,
        config.geocoder_timeout(),
    )?;

    let state = AppState::new(db, Arc::new(geocoder), config.clone());

    if config.seed_demo_user {
        state.users.seed_demo_user().await?;
    }

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
