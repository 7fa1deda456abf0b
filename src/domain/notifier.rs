use anyhow::Result;
use std::sync::Arc;

/// Abstraction for outbound notification delivery (email).
///
/// Fire-and-forget from the engine's perspective, but failure is
/// observable: the engine maps a send error to the `notification_failed`
/// outcome rather than silently treating it as success.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    // ---
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Type alias for any backend that implements Notifier.
pub type NotifierPtr = Arc<dyn Notifier>;
