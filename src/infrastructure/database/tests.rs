use once_cell::sync::Lazy;
use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::domain::{CredentialStorePtr, DeviceType, LoginEvent, OtpChallenge, UserCredential};

// One runtime to rule them all...
/// Shared tokio runtime for all database tests.
///
/// We must initialize the database once and tests must share it.  Each test also must
/// share this single runtime instead of creating a new one per test.  This keeps the
/// database connection pool alive across all tests. Without it, each `#[tokio::test]`
/// would create its own runtime, and when that runtime drops at test completion, the pool
/// connections would be closed, causing subsequent tests to timeout waiting for new
/// connections.
static RUNTIME: Lazy<Runtime> = Lazy::new(|| {
    // ---
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create TOKIO runtime")
});

// Initialize tracing once for all tests
static TRACING_INIT: std::sync::Once = std::sync::Once::new();

fn init_tracing() {
    // ---
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_ansi(false) // No colorization, makes logs easier to read.
            .with_test_writer()
            .init();
    });
}

async fn setup_store() -> CredentialStorePtr {
    // ---
    init_tracing();

    super::init_database_with_retry_from_env()
        .await
        .expect("database init failed");

    super::create_postgres_store().expect("store creation failed")
}

fn test_user(email: &str) -> UserCredential {
    // ---
    UserCredential::new(
        "Thorin Oakenshield".to_string(),
        email.to_string(),
        Some(format!("+1555{}", &email[..4])),
        "speak-friend".to_string(),
    )
}

#[test]
#[ignore] // Requires a live PostgreSQL instance (DATABASE_URL)
fn test_create_and_find_user() {
    // ---
    RUNTIME.block_on(async {
        // ---
        let store = setup_store().await;

        let email = format!("{}@example.com", Uuid::new_v4());
        let user = test_user(&email);
        store.create(user.clone()).await.expect("Failed to create user");

        // Find by email
        let found = store
            .find_by_identifier(&email)
            .await
            .expect("Failed to query user")
            .expect("User not found");

        assert_eq!(found.id, user.id);
        assert_eq!(found.identifier, email);
        assert!(found.active_challenge.is_none());
        assert!(found.login_history.is_empty());

        // Find by phone
        let by_phone = store
            .find_by_identifier(found.phone.as_deref().unwrap())
            .await
            .expect("Failed to query user by phone")
            .expect("User not found by phone");

        assert_eq!(by_phone.id, user.id);
    });
}

#[test]
#[ignore] // Requires a live PostgreSQL instance (DATABASE_URL)
fn test_find_nonexistent_user() {
    // ---
    RUNTIME.block_on(async {
        // ---
        let store = setup_store().await;

        let result = store
            .find_by_identifier("nonexistent@example.com")
            .await
            .expect("Query should succeed");

        assert!(result.is_none());
    });
}

#[test]
#[ignore] // Requires a live PostgreSQL instance (DATABASE_URL)
fn test_save_roundtrips_challenge_and_history() {
    // ---
    RUNTIME.block_on(async {
        // ---
        let store = setup_store().await;

        let email = format!("{}@example.com", Uuid::new_v4());
        let mut user = test_user(&email);
        store.create(user.clone()).await.expect("Failed to create user");

        let now = chrono::Utc::now();
        user.active_challenge = Some(OtpChallenge {
            code: "123456".to_string(),
            expires_at: now + chrono::Duration::minutes(5),
        });
        user.login_history.push(LoginEvent {
            ip: "203.0.113.9".to_string(),
            browser: "Firefox".to_string(),
            os: "Linux".to_string(),
            device_type: DeviceType::Desktop,
            occurred_at: now,
        });
        store.save(&user).await.expect("Failed to save user");

        let found = store
            .find_by_identifier(&email)
            .await
            .expect("Failed to query user")
            .expect("User not found");

        let challenge = found.active_challenge.expect("challenge should persist");
        assert_eq!(challenge.code, "123456");
        assert_eq!(found.login_history.len(), 1);
        assert_eq!(found.login_history[0].browser, "Firefox");

        // Clearing the challenge persists too, and saving again does not
        // duplicate history rows.
        user.active_challenge = None;
        store.save(&user).await.expect("Failed to save user");
        store.save(&user).await.expect("Failed to save user");

        let found = store
            .find_by_identifier(&email)
            .await
            .expect("Failed to query user")
            .expect("User not found");

        assert!(found.active_challenge.is_none());
        assert_eq!(found.login_history.len(), 1);
    });
}
