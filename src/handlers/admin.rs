// Admin dashboard endpoints: listing, stats, ad-hoc profile provisioning

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;
use validator::Validate;

use crate::{
    app::AppState,
    models::profile::{
        AdminStats, CreateProfileRequest, CreateProfileResponse, ProfileResponse,
        UpsertProfileRequest,
    },
    services::ProfileService,
    utils::{profile_errors::ProfileError, validate_profile_id},
};

/// List every profile, newest first
/// GET /api/v1/admin/profiles
#[utoipa::path(
    get,
    path = "/v1/admin/profiles",
    tag = "Admin",
    operation_id = "listProfiles",
    responses(
        (status = 200, description = "All profiles ordered by creation time descending", body = [ProfileResponse]),
        (status = 500, description = "Backend error")
    )
)]
pub async fn list_profiles(State(state): State<AppState>) -> impl IntoResponse {
    let service = ProfileService::new(&state);

    match service.fetch_all().await {
        Ok(profiles) => {
            let responses: Vec<ProfileResponse> = profiles.into_iter().map(Into::into).collect();
            Json(responses).into_response()
        },
        Err(e) => {
            error!("Failed to list profiles: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}

/// Aggregate dashboard figures
/// GET /api/v1/admin/stats
#[utoipa::path(
    get,
    path = "/v1/admin/stats",
    tag = "Admin",
    operation_id = "adminStats",
    responses(
        (status = 200, description = "Counts recomputed from the profile table; a failing count degrades to 0", body = AdminStats)
    )
)]
pub async fn admin_stats(State(state): State<AppState>) -> impl IntoResponse {
    let service = ProfileService::new(&state);
    Json(service.admin_stats().await)
}

/// Provision a profile id ahead of writing it to a physical tag
/// POST /api/v1/admin/profiles
#[utoipa::path(
    post,
    path = "/v1/admin/profiles",
    tag = "Admin",
    operation_id = "createProfile",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile row created with defaults", body = CreateProfileResponse),
        (status = 200, description = "Id already existed; row left as-is apart from last_updated", body = CreateProfileResponse),
        (status = 400, description = "Malformed profile id"),
        (status = 500, description = "Backend error")
    )
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return ProfileError::from(e).into_response();
    }
    let id = request.id.trim().to_string();
    if let Err(e) = validate_profile_id(&id) {
        return ProfileError::InvalidProfileId(e).into_response();
    }

    let service = ProfileService::new(&state);

    // An empty upsert: creates the row with defaults, or merely bumps
    // last_updated when the id was provisioned before
    match service.upsert(&id, UpsertProfileRequest::default()).await {
        Ok((profile, outcome)) => {
            let status = match outcome {
                crate::models::profile::SaveOutcome::Created => StatusCode::CREATED,
                crate::models::profile::SaveOutcome::Updated => StatusCode::OK,
            };
            let url = state.config.profile_url(&id);
            (
                status,
                Json(CreateProfileResponse {
                    outcome,
                    profile: profile.into(),
                    url,
                }),
            )
                .into_response()
        },
        Err(e) => {
            error!(profile_id = %id, "Ad-hoc profile creation failed: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}
