//! Attribute-gated restriction policy.
//!
//! The OTP requirement applies to one browser family and the time-of-day
//! gate to one device class. The policy is deliberately narrow: friction
//! stays low for the common case while a second factor covers Chrome
//! logins and a local-hour window covers mobile devices.

use std::time::Duration;

use crate::domain::{DeviceHints, DeviceType};

/// Tunable knobs for the login/OTP decision flow.
#[derive(Debug, Clone)]
pub struct LoginPolicy {
    // ---
    /// Lifetime of an issued OTP challenge.
    pub otp_ttl: Duration,

    /// Local-hour window for mobile logins, start inclusive.
    pub mobile_window_start: u32,

    /// End of the mobile window, exclusive.
    pub mobile_window_end: u32,

    /// Minimum wall-clock gap between password resets for one user.
    pub reset_cooldown: Duration,
}

impl Default for LoginPolicy {
    // ---
    fn default() -> Self {
        // ---
        Self {
            otp_ttl: Duration::from_secs(300),
            mobile_window_start: 10,
            mobile_window_end: 13,
            reset_cooldown: Duration::from_secs(24 * 3600),
        }
    }
}

impl LoginPolicy {
    /// Whether this attempt falls under the OTP challenge gate.
    ///
    /// Matches the Chrome browser family by case-insensitive substring, so
    /// "Chrome", "chrome", and "Chrome Mobile" all gate. Chromium-derived
    /// browsers that report their own family name (Edge, Opera) do not.
    pub fn requires_challenge(&self, hints: &DeviceHints) -> bool {
        // ---
        hints.browser.to_ascii_lowercase().contains("chrome")
    }

    /// Whether a mobile login is allowed at the given local hour.
    ///
    /// Non-mobile devices are never restricted.
    pub fn allows_device_at(&self, device_type: DeviceType, local_hour: u32) -> bool {
        // ---
        match device_type {
            DeviceType::Desktop => true,
            DeviceType::Mobile => {
                local_hour >= self.mobile_window_start && local_hour < self.mobile_window_end
            }
        }
    }

    pub fn otp_ttl_chrono(&self) -> chrono::Duration {
        // ---
        chrono::Duration::seconds(self.otp_ttl.as_secs() as i64)
    }

    pub fn reset_cooldown_chrono(&self) -> chrono::Duration {
        // ---
        chrono::Duration::seconds(self.reset_cooldown.as_secs() as i64)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn hints(browser: &str, device_type: DeviceType) -> DeviceHints {
        // ---
        DeviceHints {
            browser: browser.to_string(),
            os: "Linux".to_string(),
            device_type,
            ip: "127.0.0.1".to_string(),
        }
    }

    #[test]
    fn chrome_family_requires_challenge() {
        // ---
        let policy = LoginPolicy::default();

        assert!(policy.requires_challenge(&hints("Chrome", DeviceType::Desktop)));
        assert!(policy.requires_challenge(&hints("Chrome Mobile", DeviceType::Mobile)));
        assert!(policy.requires_challenge(&hints("chrome", DeviceType::Desktop)));

        assert!(!policy.requires_challenge(&hints("Firefox", DeviceType::Desktop)));
        assert!(!policy.requires_challenge(&hints("Safari", DeviceType::Desktop)));
        assert!(!policy.requires_challenge(&hints("Edge", DeviceType::Desktop)));
    }

    #[test]
    fn mobile_window_is_start_inclusive_end_exclusive() {
        // ---
        let policy = LoginPolicy::default();

        assert!(!policy.allows_device_at(DeviceType::Mobile, 9));
        assert!(policy.allows_device_at(DeviceType::Mobile, 10));
        assert!(policy.allows_device_at(DeviceType::Mobile, 12));
        assert!(!policy.allows_device_at(DeviceType::Mobile, 13));
        assert!(!policy.allows_device_at(DeviceType::Mobile, 22));
    }

    #[test]
    fn desktop_is_never_hour_restricted() {
        // ---
        let policy = LoginPolicy::default();

        for hour in 0..24 {
            assert!(policy.allows_device_at(DeviceType::Desktop, hour));
        }
    }
}
