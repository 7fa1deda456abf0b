mod console_mailer;
mod smtp_mailer;

pub use console_mailer::ConsoleMailer;
pub use smtp_mailer::SmtpMailer;

use crate::config::SmtpConfig;
use crate::domain::NotifierPtr;
use std::sync::Arc;

/// Creates an SMTP-backed notifier.
pub fn create_smtp_mailer(config: SmtpConfig) -> anyhow::Result<NotifierPtr> {
    // ---
    tracing::info!(host = %config.host, "Initializing SMTP mailer");
    Ok(Arc::new(SmtpMailer::new(config)))
}

/// Creates a log-only notifier for development and tests.
///
/// Every send succeeds and the message is written to the log instead of
/// being delivered.
pub fn create_console_mailer() -> anyhow::Result<NotifierPtr> {
    // ---
    tracing::info!("No SMTP host configured, mail will be logged only");
    Ok(Arc::new(ConsoleMailer))
}
