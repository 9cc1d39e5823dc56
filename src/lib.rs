// Library exports for the PawTag backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::AppState;
pub use app_config::{AppConfig, StorageConfig, CONFIG};
pub use db::{DieselDatabaseConfig, DieselPool};
pub use models::profile::{
    AdminStats, Gender, PetProfile, ProfileLookupResponse, ProfileResponse, SaveOutcome,
    UpsertProfileRequest,
};
pub use services::{
    pin_allows_edit, ProfileService, StorageService, TagReader,
};
pub use utils::{ProfileError, ServiceError};

// Re-export individual handlers for direct use
pub use handlers::admin::{admin_stats, create_profile, list_profiles};
pub use handlers::profiles::{
    export_passport, get_profile, upload_image, upsert_profile, verify_pin,
};

use std::sync::Arc;

// Library initialization function for external consumers and the binary
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    // Initialize database pool
    info!("Initializing database pool...");
    let db_config = db::DieselDatabaseConfig::default();
    let max_connections = db_config.max_connections;
    let diesel_pool = db::create_diesel_pool(db_config).await?;

    // Run migrations if enabled
    if migrations::should_run_migrations() {
        info!("Running embedded migrations...");
        let migration_config = migrations::MigrationConfig::default();
        migrations::run_all_migrations(&diesel_pool, migration_config)
            .await
            .map_err(|e| format!("Migration failed: {}", e))?;
    }

    // Initialize the object storage client (may start disabled)
    let storage_service = Arc::new(services::StorageService::new(&config.storage)?);

    Ok(AppState {
        config: Arc::new(config.clone()),
        diesel_pool,
        storage_service,
        max_connections,
    })
}

/// Assemble the full router: pages at the root, JSON API under /api/v1,
/// unknown paths redirected home
pub fn build_router(state: AppState) -> axum::Router {
    use axum::routing::get;
    use tower_http::trace::TraceLayer;

    let api = axum::Router::new()
        .route("/health", get(health_check))
        .route("/openapi.json", get(handlers::docs::openapi_json))
        .merge(handlers::profile_routes())
        .nest("/admin", handlers::admin_routes());

    axum::Router::new()
        .merge(handlers::page_routes())
        .nest("/api/v1", api)
        .fallback(handlers::pages::fallback_redirect)
        .layer(axum::middleware::from_fn(
            middleware::dynamic_cors_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Health check handler
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    use axum::http::StatusCode;
    use axum::Json;

    let mut overall_healthy = true;
    let timestamp = chrono::Utc::now().to_rfc3339();

    // Check PostgreSQL
    let postgres_health = match db::check_diesel_health(&state.diesel_pool).await {
        Ok(_) => serde_json::json!({
            "status": "healthy",
            "max_connections": state.max_connections,
            "error": null
        }),
        Err(e) => {
            overall_healthy = false;
            serde_json::json!({
                "status": "unhealthy",
                "error": format!("Database connection failed: {}", e)
            })
        },
    };

    // Storage is degraded-but-tolerated when unconfigured
    let storage_health = serde_json::json!({
        "status": if state.storage_service.is_available() { "healthy" } else { "unconfigured" },
        "error": null
    });

    let response = serde_json::json!({
        "status": if overall_healthy { "healthy" } else { "degraded" },
        "service": "pawtag-backend",
        "timestamp": timestamp,
        "components": {
            "postgresql": postgres_health,
            "storage": storage_health
        }
    });

    if overall_healthy {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}
