//! SMTP notifier using the `lettre` crate.

use anyhow::{anyhow, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::domain::Notifier;

/// Production notifier delivering over an authenticated SMTP relay.
pub struct SmtpMailer {
    // ---
    config: SmtpConfig,
}

impl SmtpMailer {
    // ---
    pub fn new(config: SmtpConfig) -> Self {
        // ---
        Self { config }
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpMailer {
    // ---
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        // ---
        let from = self
            .config
            .from_address
            .parse()
            .map_err(|err| anyhow!("invalid from address: {err}"))?;

        let to_mailbox = to
            .parse()
            .map_err(|err| anyhow!("invalid recipient address: {err}"))?;

        let message = Message::builder()
            .from(from)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())
            .map_err(|err| anyhow!("failed to build email: {err}"))?;

        let credentials =
            Credentials::new(self.config.username.clone(), self.config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.host)
            .map_err(|err| anyhow!("failed to create SMTP transport: {err}"))?
            .port(self.config.port)
            .credentials(credentials)
            .build();

        mailer
            .send(message)
            .await
            .map_err(|err| anyhow!("failed to send email: {err}"))?;

        tracing::debug!(to = %to, subject = %subject, "email sent");

        Ok(())
    }
}
