// Profile store integration tests
// Cover the fetch/upsert/PIN-gate/stats behavior against a real database

use chrono::Utc;
use pawtag_backend::{
    db::{create_diesel_pool, DieselDatabaseConfig},
    models::profile::{SaveOutcome, UpsertProfileRequest},
    services::ProfileService,
    utils::ServiceError,
};
use serial_test::serial;

async fn setup_service() -> ProfileService {
    // Load environment for testing
    dotenv::from_filename(".env.test").ok();
    dotenv::dotenv().ok();

    let db_config = DieselDatabaseConfig::default();
    let pool = create_diesel_pool(db_config).await.unwrap();
    ProfileService::from_pool(pool)
}

fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

fn named_request(name: &str) -> UpsertProfileRequest {
    UpsertProfileRequest {
        name: Some(name.to_string()),
        breed: Some("Beagle".to_string()),
        age: Some(2),
        owner_name: Some("Kasia".to_string()),
        owner_phone: Some("+48 777 888 999".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn unknown_id_is_not_found_not_an_error() {
    let service = setup_service().await;

    let result = service.fetch_by_id(&unique_id("ghost")).await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn first_save_creates_then_identical_save_updates() {
    let service = setup_service().await;
    let id = unique_id("idem");
    let request = named_request("Daisy");

    let (first, outcome) = service.upsert(&id, request.clone()).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Created);
    assert_eq!(first.name, "Daisy");
    assert!(first.is_complete);
    assert!(first.last_updated >= first.created_at);

    // Idempotent resubmission: only last_updated moves
    let (second, outcome) = service.upsert(&id, request).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Updated);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.name, first.name);
    assert_eq!(second.breed, first.breed);
    assert_eq!(second.age, first.age);
    assert!(second.last_updated >= first.last_updated);
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn pin_gate_scenario() {
    let service = setup_service().await;
    let id = unique_id("pin");

    // Created without a PIN: immediately editable
    let (_, outcome) = service.upsert(&id, named_request("Luna")).await.unwrap();
    assert_eq!(outcome, SaveOutcome::Created);
    assert!(service.verify_pin(&id, "").await.unwrap());

    // Set a PIN
    let set_pin = UpsertProfileRequest {
        pin: Some("1234".to_string()),
        ..Default::default()
    };
    service.upsert(&id, set_pin).await.unwrap();

    // Wrong PIN keeps the form locked; right PIN unlocks it
    assert!(!service.verify_pin(&id, "0000").await.unwrap());
    assert!(service.verify_pin(&id, "1234").await.unwrap());

    // Saves now require the matching current_pin
    let blocked = UpsertProfileRequest {
        name: Some("Hijacked".to_string()),
        current_pin: Some("0000".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.upsert(&id, blocked).await,
        Err(ServiceError::PinRejected)
    ));

    let allowed = UpsertProfileRequest {
        name: Some("Luna II".to_string()),
        current_pin: Some("1234".to_string()),
        ..Default::default()
    };
    let (saved, _) = service.upsert(&id, allowed).await.unwrap();
    assert_eq!(saved.name, "Luna II");
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn gated_row_is_never_overwritten_without_the_pin() {
    let service = setup_service().await;
    let id = unique_id("gate");

    let mut initial = named_request("Rex");
    initial.pin = Some("1234".to_string());
    service.upsert(&id, initial).await.unwrap();

    // No current_pin at all: the write-time gate must hold even though
    // this request never presented a candidate
    let blocked = UpsertProfileRequest {
        name: Some("Overwritten".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        service.upsert(&id, blocked).await,
        Err(ServiceError::PinRejected)
    ));

    let stored = service.fetch_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Rex");
    assert!(stored.has_pin());
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn verify_pin_true_for_missing_profile() {
    let service = setup_service().await;
    assert!(service.verify_pin(&unique_id("nobody"), "0000").await.unwrap());
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn listing_is_newest_first() {
    let service = setup_service().await;
    let older = unique_id("list-a");
    let newer = unique_id("list-b");

    service.upsert(&older, named_request("Older")).await.unwrap();
    service.upsert(&newer, named_request("Newer")).await.unwrap();

    let all = service.fetch_all().await.unwrap();
    let pos_older = all.iter().position(|p| p.id == older).unwrap();
    let pos_newer = all.iter().position(|p| p.id == newer).unwrap();
    assert!(pos_newer < pos_older, "newest profile should come first");

    for window in all.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }
}

#[tokio::test]
#[ignore] // Requires database
#[serial]
async fn admin_stats_invariants_hold() {
    let service = setup_service().await;

    // A freshly created profile is both recent and active
    service
        .upsert(&unique_id("stats"), named_request("Counted"))
        .await
        .unwrap();

    let stats = service.admin_stats().await;
    assert!(stats.total_profiles >= 1);
    assert!(stats.profiles_this_month <= stats.total_profiles);
    assert!(stats.active_profiles <= stats.total_profiles);
    assert!(stats.profiles_this_month >= 1);

    // Timestamps of everything we just wrote are within the window
    let cutoff = Utc::now() - chrono::Duration::days(30);
    let all = service.fetch_all().await.unwrap();
    let recent = all.iter().filter(|p| p.created_at >= cutoff).count() as i64;
    assert!(recent <= stats.total_profiles);
}
