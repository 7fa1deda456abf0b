//! Outcome taxonomy for login and password-reset attempts.
//!
//! Every variant is a recoverable-by-resubmission result returned to the
//! caller as a value. Only store/connectivity failures propagate as errors
//! to the layer above the engine.

/// Reason a login or reset attempt was rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Identifier/credential mismatch or unknown identifier. The same
    /// variant covers both so no information is disclosed about which
    /// half failed.
    InvalidCredentials,

    /// OTP code mismatch or past expiry. Same outcome for both failures.
    InvalidOrExpiredOtp,

    /// Password reset requested for an unknown identifier.
    UserNotFound,
}

/// Reason an otherwise-valid attempt was blocked by policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restriction {
    /// Mobile logins are allowed only inside the configured local-hour window.
    MobileHours,

    /// A password reset was already issued within the cooldown window.
    ResetAlreadyRequested,
}

/// Terminal result of one `attempt_login` or `request_password_reset` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Fully authenticated; carries the opaque bearer token.
    Authenticated { token: String },

    /// An OTP challenge was issued and delivered; resubmit with the code.
    ChallengeRequired,

    /// A new password was generated and delivered.
    ResetIssued,

    Rejected(RejectReason),

    Restricted(Restriction),

    /// Downstream delivery failed. Distinct from OTP rejection so the
    /// caller can offer "resend" rather than "re-enter code".
    NotificationFailed,
}

impl Outcome {
    /// Short machine-readable kind for logging, metrics, and API clients.
    pub fn kind(&self) -> &'static str {
        // ---
        match self {
            Outcome::Authenticated { .. } => "authenticated",
            Outcome::ChallengeRequired => "challenge_required",
            Outcome::ResetIssued => "reset_issued",
            Outcome::Rejected(RejectReason::InvalidCredentials) => "invalid_credentials",
            Outcome::Rejected(RejectReason::InvalidOrExpiredOtp) => "invalid_or_expired_otp",
            Outcome::Rejected(RejectReason::UserNotFound) => "user_not_found",
            Outcome::Restricted(Restriction::MobileHours) => "mobile_hours",
            Outcome::Restricted(Restriction::ResetAlreadyRequested) => "reset_already_requested",
            Outcome::NotificationFailed => "notification_failed",
        }
    }

    /// Human-readable message template. Localization and display are the
    /// calling layer's responsibility.
    pub fn message(&self) -> &'static str {
        // ---
        match self {
            Outcome::Authenticated { .. } => "Login successful",
            Outcome::ChallengeRequired => "OTP sent to email",
            Outcome::ResetIssued => "Password reset successful. Check your email.",
            Outcome::Rejected(RejectReason::InvalidCredentials) => "Invalid credentials",
            Outcome::Rejected(RejectReason::InvalidOrExpiredOtp) => "Invalid or expired OTP",
            Outcome::Rejected(RejectReason::UserNotFound) => "User not found",
            Outcome::Restricted(Restriction::MobileHours) => {
                "Mobile login allowed only between 10 AM and 1 PM"
            }
            Outcome::Restricted(Restriction::ResetAlreadyRequested) => {
                "Password reset already requested. Try again in 24 hours."
            }
            Outcome::NotificationFailed => "Failed to deliver notification email",
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn kinds_are_stable_identifiers() {
        // ---
        // These strings are part of the API contract; clients branch on them.
        assert_eq!(
            Outcome::Authenticated {
                token: "t".to_string()
            }
            .kind(),
            "authenticated"
        );
        assert_eq!(Outcome::ChallengeRequired.kind(), "challenge_required");
        assert_eq!(
            Outcome::Rejected(RejectReason::InvalidOrExpiredOtp).kind(),
            "invalid_or_expired_otp"
        );
        assert_eq!(
            Outcome::Restricted(Restriction::MobileHours).kind(),
            "mobile_hours"
        );
        assert_eq!(Outcome::NotificationFailed.kind(), "notification_failed");
    }
}
