use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse device class derived from the User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    Mobile,
    Desktop,
}

impl DeviceType {
    // ---
    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            DeviceType::Mobile => "Mobile",
            DeviceType::Desktop => "Desktop",
        }
    }
}

/// Untrusted device/browser signals extracted from request metadata.
///
/// These are best-effort hints used for policy decisions (OTP gating,
/// mobile-hours restriction), never security boundaries.
#[derive(Debug, Clone)]
pub struct DeviceHints {
    // ---
    pub browser: String,
    pub os: String,
    pub device_type: DeviceType,
    pub ip: String,
}

/// One entry in a user's append-only login history.
///
/// Immutable once appended, owned exclusively by its `UserCredential`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEvent {
    // ---
    pub ip: String,
    pub browser: String,
    pub os: String,
    pub device_type: DeviceType,
    pub occurred_at: DateTime<Utc>,
}

/// The single active OTP challenge for a user, if any.
///
/// At most one challenge exists at a time; issuing a new one overwrites
/// the previous, and a successful verification clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    // ---
    /// Exactly 6 ASCII digits, zero-padded.
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// Whether `code` matches this challenge and it has not expired at `now`.
    pub fn accepts(&self, code: &str, now: DateTime<Utc>) -> bool {
        // ---
        self.code == code && now <= self.expires_at
    }
}

/// One credential record per user: identity, secret, challenge state,
/// reset cooldown, and login history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    // ---
    pub id: Uuid,

    pub name: String,

    /// Primary lookup key (email). Unique, never reused across records.
    pub identifier: String,

    /// Secondary lookup key for password reset.
    pub phone: Option<String>,

    /// Password material, opaque to the engine (equality comparison only).
    pub secret: String,

    pub active_challenge: Option<OtpChallenge>,

    /// Blocks further reset issuance for a rolling 24 hours once set.
    pub last_password_reset_at: Option<DateTime<Utc>>,

    /// Append-only; grows only on fully authenticated attempts.
    pub login_history: Vec<LoginEvent>,

    pub created_at: DateTime<Utc>,
}

impl UserCredential {
    // ---
    pub fn new(name: String, identifier: String, phone: Option<String>, secret: String) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            name,
            identifier,
            phone,
            secret,
            active_challenge: None,
            last_password_reset_at: None,
            login_history: Vec::new(),
            created_at: Utc::now(),
        }
    }
}
