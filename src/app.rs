// Application state and configuration
use std::sync::Arc;

use crate::{app_config::AppConfig, db::DieselPool, services::StorageService};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub diesel_pool: DieselPool,
    pub storage_service: Arc<StorageService>,
    pub max_connections: u32,
}
