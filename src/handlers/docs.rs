// OpenAPI document for the JSON API

use axum::Json;
use utoipa::OpenApi;

use crate::handlers::{admin, profiles};
use crate::models::profile::{
    AdminStats, CreateProfileRequest, CreateProfileResponse, Gender, ProfileLookupResponse,
    ProfileResponse, SaveOutcome, SaveProfileResponse, UploadImageRequest, UploadImageResponse,
    UpsertProfileRequest, VerifyPinRequest, VerifyPinResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PawTag API",
        description = "Pet identification profiles behind scannable tags",
        version = "0.1.0"
    ),
    servers((url = "/api", description = "API mount point")),
    paths(
        profiles::get_profile,
        profiles::upsert_profile,
        profiles::verify_pin,
        profiles::export_passport,
        profiles::upload_image,
        admin::list_profiles,
        admin::admin_stats,
        admin::create_profile,
    ),
    components(schemas(
        AdminStats,
        CreateProfileRequest,
        CreateProfileResponse,
        Gender,
        ProfileLookupResponse,
        ProfileResponse,
        SaveOutcome,
        SaveProfileResponse,
        UploadImageRequest,
        UploadImageResponse,
        UpsertProfileRequest,
        VerifyPinRequest,
        VerifyPinResponse,
    )),
    tags(
        (name = "Profiles", description = "Public profile lookup and PIN-gated edits"),
        (name = "Images", description = "Pet photo uploads"),
        (name = "Admin", description = "Dashboard listing, stats and tag provisioning")
    )
)]
pub struct ApiDoc;

/// GET /api/v1/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
