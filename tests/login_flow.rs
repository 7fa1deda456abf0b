//! End-to-end tests for the login decision flow against the public
//! engine API, using in-memory collaborators. No external services.

use otp_login_api::domain::{DeviceType, Outcome, RejectReason, Restriction};

mod common;

use common::{at_hour, attempt, engine_fixture, hints, seed_user, stored_code};

// ============================================================================
// Challenge gate
// ============================================================================

#[tokio::test]
async fn chrome_login_without_otp_issues_challenge() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    let outcome = f
        .engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Chrome", DeviceType::Desktop)),
            at_hour(12),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::ChallengeRequired);

    // No login event for a pending attempt, and the code went out by mail.
    let user = f.store.get("ada@example.com").unwrap();
    assert!(user.login_history.is_empty());

    let sent = f.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "ada@example.com");
    assert!(sent[0].2.contains(&user.active_challenge.unwrap().code));
}

#[tokio::test]
async fn challenge_expiry_boundary() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    let issued_at = at_hour(12);
    f.engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Chrome", DeviceType::Desktop)),
            issued_at,
        )
        .await
        .unwrap();
    let code = stored_code(&f.store, "ada@example.com");

    // Accepted one second before the 5-minute mark
    let outcome = f
        .engine
        .attempt_login(
            &attempt(
                "ada@example.com",
                "secret123",
                Some(&code),
                hints("Chrome", DeviceType::Desktop),
            ),
            issued_at + chrono::Duration::seconds(299),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Authenticated { .. }));

    // Fresh challenge, checked one second past the mark
    f.engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Chrome", DeviceType::Desktop)),
            issued_at,
        )
        .await
        .unwrap();
    let code = stored_code(&f.store, "ada@example.com");

    let outcome = f
        .engine
        .attempt_login(
            &attempt(
                "ada@example.com",
                "secret123",
                Some(&code),
                hints("Chrome", DeviceType::Desktop),
            ),
            issued_at + chrono::Duration::seconds(301),
        )
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Rejected(RejectReason::InvalidOrExpiredOtp));
}

#[tokio::test]
async fn reissue_overwrites_previous_challenge() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;
    let chrome =
        || attempt("ada@example.com", "secret123", None, hints("Chrome", DeviceType::Desktop));

    f.engine.attempt_login(&chrome(), at_hour(12)).await.unwrap();
    let first = stored_code(&f.store, "ada@example.com");

    f.engine.attempt_login(&chrome(), at_hour(12)).await.unwrap();
    let second = stored_code(&f.store, "ada@example.com");

    // Exactly one challenge remains, and only the second code verifies.
    if first != second {
        let outcome = f
            .engine
            .attempt_login(
                &attempt(
                    "ada@example.com",
                    "secret123",
                    Some(&first),
                    hints("Chrome", DeviceType::Desktop),
                ),
                at_hour(12),
            )
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected(RejectReason::InvalidOrExpiredOtp));
    }

    let outcome = f
        .engine
        .attempt_login(
            &attempt(
                "ada@example.com",
                "secret123",
                Some(&second),
                hints("Chrome", DeviceType::Desktop),
            ),
            at_hour(12),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Authenticated { .. }));
}

#[tokio::test]
async fn consumed_code_is_rejected_on_resubmission() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    f.engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Chrome", DeviceType::Desktop)),
            at_hour(12),
        )
        .await
        .unwrap();
    let code = stored_code(&f.store, "ada@example.com");

    let verify = attempt(
        "ada@example.com",
        "secret123",
        Some(&code),
        hints("Chrome", DeviceType::Desktop),
    );

    assert!(matches!(
        f.engine.attempt_login(&verify, at_hour(12)).await.unwrap(),
        Outcome::Authenticated { .. }
    ));
    assert_eq!(
        f.engine.attempt_login(&verify, at_hour(12)).await.unwrap(),
        Outcome::Rejected(RejectReason::InvalidOrExpiredOtp)
    );
}

// ============================================================================
// Straight-through and restricted paths
// ============================================================================

#[tokio::test]
async fn firefox_desktop_authenticates_without_otp() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    let outcome = f
        .engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Firefox", DeviceType::Desktop)),
            at_hour(12),
        )
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Authenticated {
            token: "token-for-ada@example.com".to_string()
        }
    );

    // Exactly one history entry, and no mail was ever sent.
    let user = f.store.get("ada@example.com").unwrap();
    assert_eq!(user.login_history.len(), 1);
    assert!(f.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mobile_hours_window() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;
    let mobile =
        || attempt("ada@example.com", "secret123", None, hints("Safari", DeviceType::Mobile));

    assert!(matches!(
        f.engine.attempt_login(&mobile(), at_hour(10)).await.unwrap(),
        Outcome::Authenticated { .. }
    ));
    assert!(matches!(
        f.engine.attempt_login(&mobile(), at_hour(12)).await.unwrap(),
        Outcome::Authenticated { .. }
    ));

    let history_len = f.store.get("ada@example.com").unwrap().login_history.len();

    assert_eq!(
        f.engine.attempt_login(&mobile(), at_hour(9)).await.unwrap(),
        Outcome::Restricted(Restriction::MobileHours)
    );
    assert_eq!(
        f.engine.attempt_login(&mobile(), at_hour(13)).await.unwrap(),
        Outcome::Restricted(Restriction::MobileHours)
    );

    // Restricted attempts leave the history untouched.
    assert_eq!(
        f.store.get("ada@example.com").unwrap().login_history.len(),
        history_len
    );
}

#[tokio::test]
async fn wrong_credentials_never_reach_the_challenge_gate() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    let outcome = f
        .engine
        .attempt_login(
            &attempt("ada@example.com", "wrong", None, hints("Chrome", DeviceType::Desktop)),
            at_hour(12),
        )
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Rejected(RejectReason::InvalidCredentials));
    assert!(f.mailer.sent.lock().unwrap().is_empty());
    assert!(f.store.get("ada@example.com").unwrap().active_challenge.is_none());
}
