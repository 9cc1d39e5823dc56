// Profile API endpoints: lookup, upsert, PIN gate, passport export, images

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;
use validator::Validate;

use crate::{
    app::AppState,
    models::profile::{
        ProfileLookupResponse, SaveOutcome, SaveProfileResponse, UploadImageRequest,
        UploadImageResponse, UpsertProfileRequest, VerifyPinRequest, VerifyPinResponse,
    },
    services::{decode_image_payload, passport_filename, passport_pdf, ProfileService},
    utils::{profile_errors::ProfileError, validate_profile_id},
};

// =============================================================================
// PROFILE HANDLERS
// =============================================================================

/// Look up a profile by tag id
/// GET /api/v1/profiles/:id
#[utoipa::path(
    get,
    path = "/v1/profiles/{id}",
    tag = "Profiles",
    operation_id = "getProfile",
    params(
        ("id" = String, Path, description = "Profile id embedded in the tag payload", example = "042")
    ),
    responses(
        (status = 200, description = "Lookup result; exists=false with a null profile for unknown ids", body = ProfileLookupResponse),
        (status = 400, description = "Malformed profile id"),
        (status = 500, description = "Backend error")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = validate_profile_id(&id) {
        return ProfileError::InvalidProfileId(e).into_response();
    }

    let service = ProfileService::new(&state);

    match service.fetch_by_id(&id).await {
        Ok(profile) => {
            let exists = profile.is_some();
            Json(ProfileLookupResponse {
                exists,
                profile: profile.map(Into::into),
            })
            .into_response()
        },
        Err(e) => {
            error!(profile_id = %id, "Profile lookup failed: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}

/// Create or update a profile (upsert keyed on the tag id)
/// PUT /api/v1/profiles/:id
#[utoipa::path(
    put,
    path = "/v1/profiles/{id}",
    tag = "Profiles",
    operation_id = "upsertProfile",
    params(
        ("id" = String, Path, description = "Profile id embedded in the tag payload", example = "042")
    ),
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Existing profile updated", body = SaveProfileResponse),
        (status = 201, description = "Profile created on first save", body = SaveProfileResponse),
        (status = 400, description = "Malformed id or payload"),
        (status = 403, description = "PIN rejected"),
        (status = 500, description = "Backend error; nothing was saved")
    )
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpsertProfileRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_profile_id(&id) {
        return ProfileError::InvalidProfileId(e).into_response();
    }
    if let Err(e) = request.validate() {
        return ProfileError::from(e).into_response();
    }

    let service = ProfileService::new(&state);

    match service.upsert(&id, request).await {
        Ok((profile, outcome)) => {
            let status = match outcome {
                SaveOutcome::Created => StatusCode::CREATED,
                SaveOutcome::Updated => StatusCode::OK,
            };
            (
                status,
                Json(SaveProfileResponse {
                    outcome,
                    profile: profile.into(),
                }),
            )
                .into_response()
        },
        Err(e) => {
            error!(profile_id = %id, "Profile save failed: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}

/// Check a PIN candidate against the stored profile
/// POST /api/v1/profiles/:id/verify-pin
#[utoipa::path(
    post,
    path = "/v1/profiles/{id}/verify-pin",
    tag = "Profiles",
    operation_id = "verifyPin",
    params(
        ("id" = String, Path, description = "Profile id embedded in the tag payload", example = "042")
    ),
    request_body = VerifyPinRequest,
    responses(
        (status = 200, description = "Verification result; valid=true when no PIN is set or the profile does not exist", body = VerifyPinResponse),
        (status = 400, description = "Malformed profile id"),
        (status = 500, description = "Backend error")
    )
)]
pub async fn verify_pin(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VerifyPinRequest>,
) -> impl IntoResponse {
    if let Err(e) = validate_profile_id(&id) {
        return ProfileError::InvalidProfileId(e).into_response();
    }

    let service = ProfileService::new(&state);

    match service.verify_pin(&id, &request.pin).await {
        Ok(valid) => Json(VerifyPinResponse { valid }).into_response(),
        Err(e) => {
            error!(profile_id = %id, "PIN verification failed: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}

/// Export the passport PDF for a profile
/// GET /api/v1/profiles/:id/passport.pdf
#[utoipa::path(
    get,
    path = "/v1/profiles/{id}/passport.pdf",
    tag = "Profiles",
    operation_id = "exportPassport",
    params(
        ("id" = String, Path, description = "Profile id embedded in the tag payload", example = "042")
    ),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Backend error")
    )
)]
pub async fn export_passport(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if let Err(e) = validate_profile_id(&id) {
        return ProfileError::InvalidProfileId(e).into_response();
    }

    let service = ProfileService::new(&state);

    let profile = match service.fetch_by_id(&id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return ProfileError::NotFound.into_response(),
        Err(e) => {
            error!(profile_id = %id, "Passport lookup failed: {}", e);
            return ProfileError::from(e).into_response();
        },
    };

    match passport_pdf(&profile) {
        Ok(bytes) => {
            let filename = passport_filename(&profile);
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ];
            (headers, bytes).into_response()
        },
        Err(e) => ProfileError::from(e).into_response(),
    }
}

/// Upload a pet image to the hosted bucket
/// POST /api/v1/images
#[utoipa::path(
    post,
    path = "/v1/images",
    tag = "Images",
    operation_id = "uploadImage",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Public URL of the stored image", body = UploadImageResponse),
        (status = 400, description = "Malformed image payload"),
        (status = 502, description = "Storage backend rejected the upload"),
        (status = 503, description = "Storage is not configured")
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    Json(request): Json<UploadImageRequest>,
) -> impl IntoResponse {
    let (bytes, content_type) =
        match decode_image_payload(&request.data, request.content_type.as_deref()) {
            Ok(decoded) => decoded,
            Err(e) => return ProfileError::from(e).into_response(),
        };

    match state.storage_service.upload_image(&bytes, &content_type).await {
        Ok(url) => Json(UploadImageResponse { url }).into_response(),
        Err(e) => {
            error!("Image upload failed: {}", e);
            ProfileError::from(e).into_response()
        },
    }
}
