pub mod profile;

// Re-export common types
pub use profile::{
    compute_is_complete, AdminStats, CreateProfileRequest, CreateProfileResponse, Gender,
    NewPetProfile, PetProfile, ProfileChangeset, ProfileLookupResponse, ProfileResponse,
    SaveOutcome, SaveProfileResponse, UploadImageRequest, UploadImageResponse,
    UpsertProfileRequest, VerifyPinRequest, VerifyPinResponse, DEFAULT_COVER_IMAGE_URL,
    DEFAULT_IMAGE_URL,
};
