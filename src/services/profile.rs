// Profile store - business logic for fetch/upsert/PIN gate/admin stats

use chrono::{DateTime, Duration, SubsecRound, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{info, instrument, warn};

use crate::{
    app::AppState,
    db::DieselPool,
    models::profile::{AdminStats, PetProfile, SaveOutcome, UpsertProfileRequest},
    schema::pet_profiles,
    utils::service_error::ServiceError,
};

/// Window for the "this month" and "active" dashboard figures
const STATS_WINDOW_DAYS: i64 = 30;

// =============================================================================
// PROFILE SERVICE
// =============================================================================

/// Mediates all reads and writes of the `pet_profiles` table.
///
/// Lookups treat a missing row as a successful not-found outcome; only a
/// real backend failure surfaces as an error. Saves are upserts keyed on
/// the profile id, so a profile is created implicitly on first save and
/// there can never be two rows for the same tag.
pub struct ProfileService {
    diesel_pool: DieselPool,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            diesel_pool: state.diesel_pool.clone(),
        }
    }

    pub fn from_pool(diesel_pool: DieselPool) -> Self {
        Self { diesel_pool }
    }

    async fn conn(
        &self,
    ) -> Result<bb8::PooledConnection<'_, diesel_async::pooled_connection::AsyncDieselConnectionManager<diesel_async::AsyncPgConnection>>, ServiceError>
    {
        self.diesel_pool
            .get()
            .await
            .map_err(|e| ServiceError::DatabaseError(e.to_string()))
    }

    /// Point lookup by tag id. `Ok(None)` means the tag has never been
    /// provisioned, which the caller renders as the landing view.
    #[instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: &str) -> Result<Option<PetProfile>, ServiceError> {
        let mut conn = self.conn().await?;

        let profile = pet_profiles::table
            .find(id)
            .select(PetProfile::as_select())
            .first::<PetProfile>(&mut conn)
            .await
            .optional()?;

        Ok(profile)
    }

    /// Save a partial edit, creating the row if this id was never saved.
    ///
    /// When the stored row carries a PIN the request must present a
    /// matching `current_pin`, otherwise nothing is written. The returned
    /// outcome reports which arm of the upsert actually ran.
    #[instrument(skip(self, request))]
    pub async fn upsert(
        &self,
        id: &str,
        mut request: UpsertProfileRequest,
    ) -> Result<(PetProfile, SaveOutcome), ServiceError> {
        // Scoped import: brings `.filter` for ON CONFLICT DO UPDATE into
        // scope without shadowing QueryDsl::filter elsewhere in this file.
        use diesel::query_dsl::methods::FilterDsl;

        request.sanitize();

        let mut conn = self.conn().await?;

        let existing = pet_profiles::table
            .find(id)
            .select(PetProfile::as_select())
            .first::<PetProfile>(&mut conn)
            .await
            .optional()?;

        let candidate = request.current_pin.clone().unwrap_or_default();

        if let Some(profile) = &existing {
            if !profile.pin_matches(&candidate) {
                warn!(profile_id = %id, "Edit rejected: PIN mismatch");
                return Err(ServiceError::PinRejected);
            }
        }

        let now = save_stamp();
        let row = request.merge_onto(existing.as_ref(), id, now);
        let changes = row.as_changeset();

        // The lookup-based check above gives the fast rejection; the WHERE
        // clause on the conflict arm is the authoritative gate. It also
        // covers a gated row created between our lookup and the write: the
        // update then matches nothing and no row comes back.
        let saved: PetProfile = diesel::insert_into(pet_profiles::table)
            .values(&row)
            .on_conflict(pet_profiles::id)
            .do_update()
            .set(&changes)
            .filter(
                pet_profiles::pin
                    .is_null()
                    .or(pet_profiles::pin.eq(""))
                    .or(pet_profiles::pin.eq(candidate)),
            )
            .returning(PetProfile::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    warn!(profile_id = %id, "Edit rejected at write time: PIN mismatch");
                    ServiceError::PinRejected
                },
                other => other.into(),
            })?;

        // The conflict arm leaves created_at untouched, so a fresh stamp
        // coming back means the insert arm ran. This stays correct even if
        // another request created the row between our lookup and the write.
        let outcome = if saved.created_at == now {
            SaveOutcome::Created
        } else {
            SaveOutcome::Updated
        };

        info!(profile_id = %id, outcome = ?outcome, "Profile saved");
        Ok((saved, outcome))
    }

    /// PIN check for the edit form. True when the profile does not exist,
    /// has no PIN set, or the candidate matches exactly.
    #[instrument(skip(self, candidate))]
    pub async fn verify_pin(&self, id: &str, candidate: &str) -> Result<bool, ServiceError> {
        let profile = self.fetch_by_id(id).await?;
        Ok(pin_allows_edit(profile.as_ref(), candidate))
    }

    /// Every profile, newest first. Admin view only.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<PetProfile>, ServiceError> {
        let mut conn = self.conn().await?;

        let profiles = pet_profiles::table
            .order(pet_profiles::created_at.desc())
            .select(PetProfile::as_select())
            .load::<PetProfile>(&mut conn)
            .await?;

        Ok(profiles)
    }

    /// Dashboard figures from three independent count queries. A failing
    /// query degrades its figure to 0 instead of aborting the others.
    #[instrument(skip(self))]
    pub async fn admin_stats(&self) -> AdminStats {
        let cutoff = Utc::now() - Duration::days(STATS_WINDOW_DAYS);

        let total_profiles = match self.count_total().await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count total profiles: {}", e);
                0
            },
        };

        let profiles_this_month = match self.count_created_since(cutoff).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count recently created profiles: {}", e);
                0
            },
        };

        let active_profiles = match self.count_updated_since(cutoff).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to count recently updated profiles: {}", e);
                0
            },
        };

        AdminStats {
            total_profiles,
            profiles_this_month,
            active_profiles,
        }
    }

    async fn count_total(&self) -> Result<i64, ServiceError> {
        let mut conn = self.conn().await?;
        let count = pet_profiles::table
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count)
    }

    async fn count_created_since(
        &self,
        cutoff: chrono::DateTime<Utc>,
    ) -> Result<i64, ServiceError> {
        let mut conn = self.conn().await?;
        let count = pet_profiles::table
            .filter(pet_profiles::created_at.ge(cutoff))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count)
    }

    async fn count_updated_since(
        &self,
        cutoff: chrono::DateTime<Utc>,
    ) -> Result<i64, ServiceError> {
        let mut conn = self.conn().await?;
        let count = pet_profiles::table
            .filter(pet_profiles::last_updated.ge(cutoff))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count)
    }
}

/// Pure edit-gate predicate: access is open when no profile is loaded or
/// the loaded profile has no PIN, otherwise the candidate must match.
pub fn pin_allows_edit(profile: Option<&PetProfile>, candidate: &str) -> bool {
    profile.map_or(true, |p| p.pin_matches(candidate))
}

/// Write stamp at microsecond precision. `timestamptz` stores microseconds,
/// so a full-precision `Utc::now()` would never compare equal to its own
/// value after the round trip.
fn save_stamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{DEFAULT_COVER_IMAGE_URL, DEFAULT_IMAGE_URL};

    fn profile(pin: Option<&str>) -> PetProfile {
        let now = Utc::now();
        PetProfile {
            id: "042".to_string(),
            name: "Luna".to_string(),
            breed: String::new(),
            age: 0,
            gender: "female".to_string(),
            address: String::new(),
            description: String::new(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            cover_image_url: DEFAULT_COVER_IMAGE_URL.to_string(),
            owner_name: String::new(),
            owner_phone: String::new(),
            owner_email: String::new(),
            pin: pin.map(str::to_string),
            is_complete: false,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn gate_open_when_no_profile_loaded() {
        assert!(pin_allows_edit(None, ""));
        assert!(pin_allows_edit(None, "0000"));
    }

    #[test]
    fn gate_open_when_no_pin_set() {
        let p = profile(None);
        assert!(pin_allows_edit(Some(&p), ""));
        let p = profile(Some(""));
        assert!(pin_allows_edit(Some(&p), ""));
    }

    #[test]
    fn gate_requires_exact_match_when_pin_set() {
        let p = profile(Some("1234"));
        assert!(pin_allows_edit(Some(&p), "1234"));
        assert!(!pin_allows_edit(Some(&p), "0000"));
        assert!(!pin_allows_edit(Some(&p), ""));
    }

    #[test]
    fn save_stamp_survives_timestamptz_round_trip() {
        // The stored column keeps microseconds only; anything finer in the
        // stamp would make the written and returned values compare unequal.
        let stamp = save_stamp();
        assert_eq!(stamp.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(stamp, stamp.trunc_subsecs(6));
    }
}
