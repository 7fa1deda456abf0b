use metrics::{counter, histogram};
use std::time::Instant;

/// Increment the counter for fully authenticated logins.
pub fn increment_login_succeeded() {
    counter!("logins_succeeded_total").increment(1);
}

/// Increment the counter for issued OTP challenges.
pub fn increment_challenge_issued() {
    counter!("otp_challenges_issued_total").increment(1);
}

/// Increment the rejection counter, labeled by outcome kind
/// (invalid_credentials, invalid_or_expired_otp, mobile_hours, ...).
pub fn increment_login_rejected(kind: &'static str) {
    counter!("logins_rejected_total", "kind" => kind).increment(1);
}

/// Increment the counter for issued password resets.
pub fn increment_reset_issued() {
    counter!("password_resets_issued_total").increment(1);
}

/// Track HTTP request latency using a histogram.
pub fn track_http_request(start: Instant) {
    let elapsed = start.elapsed();
    histogram!("http_request_duration_seconds").record(elapsed);
}
