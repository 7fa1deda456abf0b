//! The OTP challenge engine.
//!
//! Decides, per login attempt, whether an OTP challenge is required,
//! issues and validates codes, and enforces the device/time restrictions.
//! The engine is stateless; all challenge state lives on the user record
//! behind the [`CredentialStore`] trait, so it is consistent across
//! handlers and survives restarts.
//!
//! Per attempt the flow is: credential check, then (Chrome family only)
//! challenge issue or verify, then the mobile-hours gate, then commit:
//! append a login-history entry and mint a session token. Every rejection
//! is terminal for that attempt; the caller resubmits a fresh one.

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Timelike, Utc};
use rand::Rng;

use super::{
    CredentialStore, CredentialStorePtr, DeviceHints, LoginEvent, LoginPolicy, Notifier,
    NotifierPtr, OtpChallenge, Outcome, RejectReason, Restriction, SessionIssuer,
    SessionIssuerPtr,
};

/// One login attempt as submitted by the caller.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    // ---
    pub identifier: String,
    pub credential: String,
    pub otp: Option<String>,
    pub hints: DeviceHints,
}

/// The login/OTP decision engine.
///
/// Holds its collaborators behind trait pointers; cheap to clone and
/// carries no per-request state.
#[derive(Clone)]
pub struct OtpEngine {
    // ---
    store: CredentialStorePtr,
    notifier: NotifierPtr,
    sessions: SessionIssuerPtr,
    policy: LoginPolicy,
}

impl OtpEngine {
    // ---
    pub fn new(
        store: CredentialStorePtr,
        notifier: NotifierPtr,
        sessions: SessionIssuerPtr,
        policy: LoginPolicy,
    ) -> Self {
        // ---
        Self {
            store,
            notifier,
            sessions,
            policy,
        }
    }

    pub fn policy(&self) -> &LoginPolicy {
        // ---
        &self.policy
    }

    /// Run one login attempt through the decision flow.
    ///
    /// `now` carries the caller's local offset: expiry math uses the
    /// absolute instant, the mobile-hours gate uses the local hour.
    ///
    /// # Errors
    /// Only store/connectivity failures are returned as errors; every
    /// policy decision is an [`Outcome`] value.
    pub async fn attempt_login(
        &self,
        attempt: &LoginAttempt,
        now: DateTime<FixedOffset>,
    ) -> Result<Outcome> {
        // ---
        let now_utc = now.with_timezone(&Utc);

        let Some(mut user) = self.store.find_by_identifier(&attempt.identifier).await? else {
            tracing::debug!(identifier = %attempt.identifier, "login attempt for unknown identifier");
            return Ok(Outcome::Rejected(RejectReason::InvalidCredentials));
        };

        // Exact comparison, no normalization. Same outcome as an unknown
        // identifier so neither half is disclosed.
        if user.secret != attempt.credential {
            return Ok(Outcome::Rejected(RejectReason::InvalidCredentials));
        }

        if self.policy.requires_challenge(&attempt.hints) {
            match &attempt.otp {
                None => {
                    return self.issue_challenge(&mut user, now_utc).await;
                }
                Some(code) => {
                    let accepted = user
                        .active_challenge
                        .as_ref()
                        .is_some_and(|c| c.accepts(code, now_utc));

                    if !accepted {
                        // Mismatch and expiry share one outcome; challenge
                        // state is left untouched.
                        return Ok(Outcome::Rejected(RejectReason::InvalidOrExpiredOtp));
                    }

                    // Consumed: cleared immediately, never left present.
                    user.active_challenge = None;
                    self.store.save(&user).await?;
                }
            }
        }

        if !self
            .policy
            .allows_device_at(attempt.hints.device_type, now.hour())
        {
            tracing::info!(
                identifier = %user.identifier,
                hour = now.hour(),
                "mobile login outside allowed window"
            );
            return Ok(Outcome::Restricted(Restriction::MobileHours));
        }

        // Commit: history entry, then session token.
        user.login_history.push(LoginEvent {
            ip: attempt.hints.ip.clone(),
            browser: attempt.hints.browser.clone(),
            os: attempt.hints.os.clone(),
            device_type: attempt.hints.device_type,
            occurred_at: now_utc,
        });
        self.store.save(&user).await?;

        let token = self.sessions.issue(&user.identifier).await?;

        tracing::info!(identifier = %user.identifier, "login authenticated");
        Ok(Outcome::Authenticated { token })
    }

    /// Generate, deliver, and persist a fresh challenge.
    ///
    /// Delivery happens before the store write: a failed send leaves the
    /// record unchanged and surfaces as `notification_failed`.
    async fn issue_challenge(
        &self,
        user: &mut crate::domain::UserCredential,
        now: DateTime<Utc>,
    ) -> Result<Outcome> {
        // ---
        let code = generate_otp_code();
        let body = format!("Your OTP is: {code}");

        if let Err(err) = self
            .notifier
            .send(&user.identifier, "Your login verification code", &body)
            .await
        {
            tracing::warn!(identifier = %user.identifier, error = %err, "OTP delivery failed");
            return Ok(Outcome::NotificationFailed);
        }

        // Overwrites any prior unconsumed challenge: at most one active.
        user.active_challenge = Some(OtpChallenge {
            code,
            expires_at: now + self.policy.otp_ttl_chrono(),
        });
        self.store.save(user).await?;

        tracing::info!(identifier = %user.identifier, "OTP challenge issued");
        Ok(Outcome::ChallengeRequired)
    }

    /// Handle a password-reset request.
    ///
    /// Looks up by email or phone, enforces the rolling cooldown, then
    /// generates a replacement secret and delivers it. Does not touch
    /// `active_challenge`.
    pub async fn request_password_reset(
        &self,
        identifier: &str,
        now: DateTime<FixedOffset>,
    ) -> Result<Outcome> {
        // ---
        let now_utc = now.with_timezone(&Utc);

        let Some(mut user) = self.store.find_by_identifier(identifier).await? else {
            return Ok(Outcome::Rejected(RejectReason::UserNotFound));
        };

        // Rolling wall-clock window, not calendar day.
        if let Some(last) = user.last_password_reset_at {
            if now_utc - last < self.policy.reset_cooldown_chrono() {
                return Ok(Outcome::Restricted(Restriction::ResetAlreadyRequested));
            }
        }

        let new_secret = generate_password();
        let body = format!("Your new password is: {new_secret}");

        if let Err(err) = self
            .notifier
            .send(&user.identifier, "Password Reset", &body)
            .await
        {
            tracing::warn!(identifier = %user.identifier, error = %err, "reset delivery failed");
            return Ok(Outcome::NotificationFailed);
        }

        user.secret = new_secret;
        user.last_password_reset_at = Some(now_utc);
        self.store.save(&user).await?;

        tracing::info!(identifier = %user.identifier, "password reset issued");
        Ok(Outcome::ResetIssued)
    }
}

/// Uniformly random 6-digit code, zero-padded.
fn generate_otp_code() -> String {
    // ---
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

/// 12 characters drawn uniformly from the 52 upper/lowercase Latin letters.
fn generate_password() -> String {
    // ---
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..12)
        .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
