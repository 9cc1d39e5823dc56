// HTTP layer: JSON API handlers plus the server-rendered pages

pub mod admin;
pub mod docs;
pub mod pages;
pub mod profiles;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Profile API routes, mounted under /api/v1
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profiles/{id}",
            get(profiles::get_profile).put(profiles::upsert_profile),
        )
        .route("/profiles/{id}/verify-pin", post(profiles::verify_pin))
        .route("/profiles/{id}/passport.pdf", get(profiles::export_passport))
        .route("/images", post(profiles::upload_image))
}

// Admin API routes, mounted under /api/v1/admin
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", get(admin::list_profiles).post(admin::create_profile))
        .route("/stats", get(admin::admin_stats))
}

// Server-rendered pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::landing))
        .route("/pet/{id}", get(pages::pet_profile_page))
        .route("/edit", get(pages::edit_page))
        .route("/admin", get(pages::admin_page))
}
