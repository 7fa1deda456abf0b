//! Tests for the password-reset flow against the public engine API.

use otp_login_api::domain::{DeviceType, Outcome, RejectReason, Restriction};

mod common;

use common::{at_hour, attempt, engine_fixture, hints, seed_user};

#[tokio::test]
async fn reset_then_cooldown_then_reset_again() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    let t0 = at_hour(12);

    assert_eq!(
        f.engine.request_password_reset("ada@example.com", t0).await.unwrap(),
        Outcome::ResetIssued
    );

    // Second request inside the rolling 24-hour window
    assert_eq!(
        f.engine
            .request_password_reset("ada@example.com", t0 + chrono::Duration::hours(23))
            .await
            .unwrap(),
        Outcome::Restricted(Restriction::ResetAlreadyRequested)
    );

    // Third request after the window has elapsed
    assert_eq!(
        f.engine
            .request_password_reset("ada@example.com", t0 + chrono::Duration::hours(25))
            .await
            .unwrap(),
        Outcome::ResetIssued
    );

    let sent = f.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, "Password Reset");
}

#[tokio::test]
async fn reset_delivers_the_new_working_password() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;

    f.engine
        .request_password_reset("ada@example.com", at_hour(12))
        .await
        .unwrap();

    let new_password = {
        let sent = f.mailer.sent.lock().unwrap();
        sent[0]
            .2
            .strip_prefix("Your new password is: ")
            .expect("mail body should carry the password")
            .to_string()
    };

    assert_eq!(new_password.len(), 12);
    assert!(new_password.chars().all(|c| c.is_ascii_alphabetic()));

    // The delivered password is the one that now logs in.
    let outcome = f
        .engine
        .attempt_login(
            &attempt(
                "ada@example.com",
                &new_password,
                None,
                hints("Firefox", DeviceType::Desktop),
            ),
            at_hour(12),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Authenticated { .. }));

    let outcome = f
        .engine
        .attempt_login(
            &attempt("ada@example.com", "secret123", None, hints("Firefox", DeviceType::Desktop)),
            at_hour(12),
        )
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Rejected(RejectReason::InvalidCredentials));
}

#[tokio::test]
async fn reset_is_reachable_by_phone_number() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", Some("+15550100")).await;

    assert_eq!(
        f.engine.request_password_reset("+15550100", at_hour(12)).await.unwrap(),
        Outcome::ResetIssued
    );

    // Delivery still goes to the email on file.
    let sent = f.mailer.sent.lock().unwrap();
    assert_eq!(sent[0].0, "ada@example.com");
}

#[tokio::test]
async fn unknown_identifier_is_reported_as_not_found() {
    // ---
    let f = engine_fixture();

    assert_eq!(
        f.engine
            .request_password_reset("nobody@example.com", at_hour(12))
            .await
            .unwrap(),
        Outcome::Rejected(RejectReason::UserNotFound)
    );
}

#[tokio::test]
async fn failed_delivery_leaves_the_account_untouched() {
    // ---
    let f = engine_fixture();
    seed_user(&f.store, "ada@example.com", None).await;
    f.mailer.fail.store(true, std::sync::atomic::Ordering::SeqCst);

    assert_eq!(
        f.engine.request_password_reset("ada@example.com", at_hour(12)).await.unwrap(),
        Outcome::NotificationFailed
    );

    let user = f.store.get("ada@example.com").unwrap();
    assert_eq!(user.secret, "secret123");
    assert!(user.last_password_reset_at.is_none());

    // The failed attempt does not start the cooldown.
    f.mailer.fail.store(false, std::sync::atomic::Ordering::SeqCst);
    assert_eq!(
        f.engine.request_password_reset("ada@example.com", at_hour(12)).await.unwrap(),
        Outcome::ResetIssued
    );
}
