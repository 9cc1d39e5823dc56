use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pawtag_backend::{
    app_config, build_router, db::mask_connection_string, initialize_app_state,
    services::{detect_tag_reader, spawn_tag_listener},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pawtag_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = app_config::config();
    info!(
        "Starting PawTag backend on {} ({})",
        config.server_address(),
        config.environment
    );
    info!("Database: {}", mask_connection_string(&config.database_url));

    let state = match initialize_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(anyhow::anyhow!("Initialization failed: {}", e));
        },
    };

    // Optional tag scanning hardware; absence is silently tolerated
    let tag_reader = detect_tag_reader();
    spawn_tag_listener(tag_reader, state.diesel_pool.clone());

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.server_address()))?;

    info!("Listening on {}", config.server_address());
    axum::serve(listener, router)
        .await
        .context("Server exited unexpectedly")?;

    Ok(())
}
