use std::sync::Arc;
use std::time::Instant;

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    // ---
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> String;

    /// Record a fully authenticated login.
    fn record_login_succeeded(&self);

    /// Record an issued OTP challenge.
    fn record_challenge_issued(&self);

    /// Record a rejected or restricted attempt, labeled by outcome kind.
    fn record_login_rejected(&self, kind: &'static str);

    /// Record an issued password reset.
    fn record_reset_issued(&self);

    /// Record HTTP request duration and labels.
    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
