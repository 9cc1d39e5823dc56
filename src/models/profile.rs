// Pet profile model - one row per scannable tag

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::schema::pet_profiles;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Placeholder shown until the owner uploads a photo
pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1543466835-00a7907e9de1";

/// Placeholder cover banner for new profiles
pub const DEFAULT_COVER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1444212477490-ca407925329e";

// =============================================================================
// DATABASE MODELS
// =============================================================================

/// Pet profile as stored in the `pet_profiles` table
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = pet_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PetProfile {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub cover_image_url: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub pin: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl PetProfile {
    /// Whether edits to this profile are gated behind a PIN.
    /// An empty string counts as "no PIN set", matching the legacy data.
    pub fn has_pin(&self) -> bool {
        self.pin.as_deref().map_or(false, |p| !p.is_empty())
    }

    /// Plaintext, case-sensitive PIN comparison. This is an edit gate for
    /// the form UI, not an authentication boundary: no hashing, no rate
    /// limiting, by explicit product decision.
    pub fn pin_matches(&self, candidate: &str) -> bool {
        match self.pin.as_deref() {
            None | Some("") => true,
            Some(stored) => stored == candidate,
        }
    }

    pub fn gender_parsed(&self) -> Gender {
        self.gender.parse().unwrap_or(Gender::Male)
    }
}

/// Fully merged row used for the insert arm of the upsert
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pet_profiles)]
pub struct NewPetProfile {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub cover_image_url: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub pin: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Update arm of the upsert. Excludes `id` and `created_at`: the id is
/// immutable and the creation stamp is fixed on first save.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pet_profiles)]
#[diesel(treat_none_as_null = true)]
pub struct ProfileChangeset {
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub cover_image_url: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub pin: Option<String>,
    pub is_complete: bool,
    pub last_updated: DateTime<Utc>,
}

impl NewPetProfile {
    /// Defaults for a row that has never been saved
    pub fn defaults(id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: String::new(),
            breed: String::new(),
            age: 0,
            gender: Gender::Male.to_string(),
            address: String::new(),
            description: String::new(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            cover_image_url: DEFAULT_COVER_IMAGE_URL.to_string(),
            owner_name: String::new(),
            owner_phone: String::new(),
            owner_email: String::new(),
            pin: None,
            is_complete: false,
            created_at: now,
            last_updated: now,
        }
    }

    /// Same row minus the columns the conflict arm must not touch
    pub fn as_changeset(&self) -> ProfileChangeset {
        ProfileChangeset {
            name: self.name.clone(),
            breed: self.breed.clone(),
            age: self.age,
            gender: self.gender.clone(),
            address: self.address.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            cover_image_url: self.cover_image_url.clone(),
            owner_name: self.owner_name.clone(),
            owner_phone: self.owner_phone.clone(),
            owner_email: self.owner_email.clone(),
            pin: self.pin.clone(),
            is_complete: self.is_complete,
            last_updated: self.last_updated,
        }
    }
}

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Tagged outcome of a save. The upsert reports which arm actually ran
/// instead of the caller inferring it from a prior existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Created,
    Updated,
}

// =============================================================================
// REQUEST/RESPONSE DTOs
// =============================================================================

/// Partial profile data submitted by the edit form.
/// Absent fields keep their stored (or default) values.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Luna",
    "breed": "Labrador Retriever",
    "age": 3,
    "gender": "female",
    "address": "ul. Warszawska 15, Krakow",
    "description": "Friendly and playful, loves to swim.",
    "owner_name": "Marta Kowalska",
    "owner_phone": "+48 123 456 789",
    "owner_email": "marta.k@example.com",
    "pin": "1234"
}))]
pub struct UpsertProfileRequest {
    #[validate(length(max = 100, message = "Name must be less than 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Breed must be less than 100 characters"))]
    pub breed: Option<String>,

    /// Negative values coerce to 0 rather than failing the save
    pub age: Option<i32>,

    pub gender: Option<Gender>,

    #[validate(length(max = 500, message = "Address must be less than 500 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 2000, message = "Description must be less than 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 2048, message = "Image URL must be less than 2048 characters"))]
    pub image_url: Option<String>,

    #[validate(length(max = 2048, message = "Cover image URL must be less than 2048 characters"))]
    pub cover_image_url: Option<String>,

    #[validate(length(max = 200, message = "Owner name must be less than 200 characters"))]
    pub owner_name: Option<String>,

    #[validate(length(max = 50, message = "Phone must be less than 50 characters"))]
    pub owner_phone: Option<String>,

    #[validate(length(max = 320, message = "Email must be less than 320 characters"))]
    pub owner_email: Option<String>,

    /// New PIN to store; empty string clears the gate
    #[validate(length(max = 64, message = "PIN must be less than 64 characters"))]
    pub pin: Option<String>,

    /// PIN candidate unlocking the edit when the stored row is gated.
    /// Never persisted.
    pub current_pin: Option<String>,
}

impl UpsertProfileRequest {
    /// Trim free-text fields before merging
    pub fn sanitize(&mut self) {
        self.name = self.name.as_ref().map(|s| s.trim().to_string());
        self.breed = self.breed.as_ref().map(|s| s.trim().to_string());
        self.address = self.address.as_ref().map(|s| s.trim().to_string());
        self.description = self.description.as_ref().map(|s| s.trim().to_string());
        self.owner_name = self.owner_name.as_ref().map(|s| s.trim().to_string());
        self.owner_phone = self.owner_phone.as_ref().map(|s| s.trim().to_string());
        self.owner_email = self.owner_email.as_ref().map(|s| s.trim().to_string());
    }

    /// Merge this partial request over the stored row (or the defaults for
    /// a first save), producing the full row the upsert writes. Stamps a
    /// fresh `last_updated`; `created_at` survives from the existing row.
    pub fn merge_onto(&self, existing: Option<&PetProfile>, id: &str, now: DateTime<Utc>) -> NewPetProfile {
        let mut row = match existing {
            Some(profile) => NewPetProfile {
                id: profile.id.clone(),
                name: profile.name.clone(),
                breed: profile.breed.clone(),
                age: profile.age,
                gender: profile.gender.clone(),
                address: profile.address.clone(),
                description: profile.description.clone(),
                image_url: profile.image_url.clone(),
                cover_image_url: profile.cover_image_url.clone(),
                owner_name: profile.owner_name.clone(),
                owner_phone: profile.owner_phone.clone(),
                owner_email: profile.owner_email.clone(),
                pin: profile.pin.clone(),
                is_complete: profile.is_complete,
                created_at: profile.created_at,
                last_updated: now,
            },
            None => NewPetProfile::defaults(id, now),
        };

        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(breed) = &self.breed {
            row.breed = breed.clone();
        }
        if let Some(age) = self.age {
            row.age = age.max(0);
        }
        if let Some(gender) = self.gender {
            row.gender = gender.to_string();
        }
        if let Some(address) = &self.address {
            row.address = address.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            row.image_url = image_url.clone();
        }
        if let Some(cover_image_url) = &self.cover_image_url {
            row.cover_image_url = cover_image_url.clone();
        }
        if let Some(owner_name) = &self.owner_name {
            row.owner_name = owner_name.clone();
        }
        if let Some(owner_phone) = &self.owner_phone {
            row.owner_phone = owner_phone.clone();
        }
        if let Some(owner_email) = &self.owner_email {
            row.owner_email = owner_email.clone();
        }
        if let Some(pin) = &self.pin {
            row.pin = if pin.is_empty() { None } else { Some(pin.clone()) };
        }

        row.last_updated = now;
        row.is_complete = compute_is_complete(&row.name, &row.owner_phone, &row.owner_email);
        row
    }
}

/// A profile counts as complete once it has a pet name and at least one
/// owner contact field. Incomplete profiles render the landing view.
pub fn compute_is_complete(name: &str, owner_phone: &str, owner_email: &str) -> bool {
    !name.trim().is_empty() && (!owner_phone.trim().is_empty() || !owner_email.trim().is_empty())
}

/// Profile as exposed over the API. The stored PIN never leaves the
/// server; callers only learn whether one is set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub breed: String,
    pub age: i32,
    pub gender: Gender,
    pub address: String,
    pub description: String,
    pub image_url: String,
    pub cover_image_url: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub has_pin: bool,
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<PetProfile> for ProfileResponse {
    fn from(profile: PetProfile) -> Self {
        let has_pin = profile.has_pin();
        Self {
            gender: profile.gender_parsed(),
            id: profile.id,
            name: profile.name,
            breed: profile.breed,
            age: profile.age,
            address: profile.address,
            description: profile.description,
            image_url: profile.image_url,
            cover_image_url: profile.cover_image_url,
            owner_name: profile.owner_name,
            owner_phone: profile.owner_phone,
            owner_email: profile.owner_email,
            has_pin,
            is_complete: profile.is_complete,
            created_at: profile.created_at,
            last_updated: profile.last_updated,
        }
    }
}

/// Lookup result: not-found is a success-shaped outcome, never an error
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileLookupResponse {
    pub exists: bool,
    pub profile: Option<ProfileResponse>,
}

/// Result of a save, tagged with the arm of the upsert that ran
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaveProfileResponse {
    pub outcome: SaveOutcome,
    pub profile: ProfileResponse,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyPinRequest {
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VerifyPinResponse {
    pub valid: bool,
}

/// Image payload from the edit form: a `data:` URL or bare base64 bytes
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    pub data: String,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadImageResponse {
    pub url: String,
}

/// Ad-hoc profile-id provisioning from the admin dashboard
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Profile id must be 1-64 characters"))]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateProfileResponse {
    pub outcome: SaveOutcome,
    pub profile: ProfileResponse,
    /// Shareable tag URL for the new profile
    pub url: String,
}

/// Aggregate dashboard figures, recomputed on demand and never persisted
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_profiles: i64,
    pub profiles_this_month: i64,
    pub active_profiles: i64,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_pin(pin: Option<&str>) -> PetProfile {
        let now = Utc::now();
        PetProfile {
            id: "042".to_string(),
            name: "Luna".to_string(),
            breed: String::new(),
            age: 3,
            gender: "female".to_string(),
            address: String::new(),
            description: String::new(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            cover_image_url: DEFAULT_COVER_IMAGE_URL.to_string(),
            owner_name: String::new(),
            owner_phone: "+48 123".to_string(),
            owner_email: String::new(),
            pin: pin.map(|p| p.to_string()),
            is_complete: true,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn pin_matches_when_no_pin_set() {
        let profile = profile_with_pin(None);
        assert!(profile.pin_matches(""));
        assert!(profile.pin_matches("anything"));
        assert!(!profile.has_pin());
    }

    #[test]
    fn pin_matches_when_pin_empty_string() {
        let profile = profile_with_pin(Some(""));
        assert!(profile.pin_matches(""));
        assert!(profile.pin_matches("1234"));
        assert!(!profile.has_pin());
    }

    #[test]
    fn pin_requires_exact_case_sensitive_match() {
        let profile = profile_with_pin(Some("AbC1"));
        assert!(profile.pin_matches("AbC1"));
        assert!(!profile.pin_matches("abc1"));
        assert!(!profile.pin_matches("0000"));
        assert!(!profile.pin_matches(""));
        assert!(profile.has_pin());
    }

    #[test]
    fn merge_onto_defaults_fills_placeholders() {
        let now = Utc::now();
        let request = UpsertProfileRequest {
            name: Some("Max".to_string()),
            owner_phone: Some("+48 987".to_string()),
            ..Default::default()
        };

        let row = request.merge_onto(None, "dog-1", now);
        assert_eq!(row.id, "dog-1");
        assert_eq!(row.name, "Max");
        assert_eq!(row.age, 0);
        assert_eq!(row.gender, "male");
        assert_eq!(row.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(row.created_at, now);
        assert_eq!(row.last_updated, now);
        assert!(row.is_complete);
    }

    #[test]
    fn merge_onto_existing_keeps_unset_fields_and_created_at() {
        let existing = profile_with_pin(Some("1234"));
        let created_at = existing.created_at;
        let later = created_at + chrono::Duration::seconds(30);

        let request = UpsertProfileRequest {
            breed: Some("Beagle".to_string()),
            ..Default::default()
        };

        let row = request.merge_onto(Some(&existing), "042", later);
        assert_eq!(row.name, "Luna");
        assert_eq!(row.breed, "Beagle");
        assert_eq!(row.pin.as_deref(), Some("1234"));
        assert_eq!(row.created_at, created_at);
        assert_eq!(row.last_updated, later);
        assert!(row.last_updated >= row.created_at);
    }

    #[test]
    fn merge_coerces_negative_age_to_zero() {
        let request = UpsertProfileRequest {
            age: Some(-7),
            ..Default::default()
        };
        let row = request.merge_onto(None, "x", Utc::now());
        assert_eq!(row.age, 0);
    }

    #[test]
    fn merge_empty_pin_clears_gate() {
        let existing = profile_with_pin(Some("1234"));
        let request = UpsertProfileRequest {
            pin: Some(String::new()),
            current_pin: Some("1234".to_string()),
            ..Default::default()
        };
        let row = request.merge_onto(Some(&existing), "042", Utc::now());
        assert_eq!(row.pin, None);
    }

    #[test]
    fn is_complete_requires_name_and_a_contact() {
        assert!(!compute_is_complete("", "+48 123", ""));
        assert!(!compute_is_complete("Luna", "", ""));
        assert!(compute_is_complete("Luna", "+48 123", ""));
        assert!(compute_is_complete("Luna", "", "a@b.c"));
        assert!(!compute_is_complete("   ", "+48 123", ""));
    }

    #[test]
    fn response_never_carries_the_pin() {
        let profile = profile_with_pin(Some("1234"));
        let response = ProfileResponse::from(profile);
        assert!(response.has_pin);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("1234"));
    }

    #[test]
    fn gender_round_trip() {
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(Gender::Male.to_string(), "male");
        assert!("other".parse::<Gender>().is_err());
    }
}
