use anyhow::Result;

use crate::domain::Notifier;

/// Log-only notifier for development and tests.
pub struct ConsoleMailer;

#[async_trait::async_trait]
impl Notifier for ConsoleMailer {
    // ---
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        // ---
        tracing::info!(to = %to, subject = %subject, body = %body, "mail (console only)");
        Ok(())
    }
}
