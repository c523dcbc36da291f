use crate::core::errors::{Result, SealmailError};
use crate::core::models::outgoing_mail::OutgoingMail;
use crate::core::models::smtp_credentials::SmtpCredentials;
use crate::core::traits::mail_transport::MailTransport;

/// Holds the SMTP settings and submits one message per call.
pub struct MailGateway<T: MailTransport> {
    transport: T,
    credentials: Option<SmtpCredentials>,
}

impl<T: MailTransport> MailGateway<T> {
    /// Create an unconfigured gateway. `send` fails until `configure` runs.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            credentials: None,
        }
    }

    /// Replace every SMTP setting at once.
    pub fn configure(&mut self, credentials: SmtpCredentials) {
        tracing::debug!(
            host = %credentials.host,
            port = credentials.port,
            auth = credentials.authenticate,
            tls = %credentials.tls,
            "configured SMTP"
        );
        self.credentials = Some(credentials);
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `body` verbatim from `sender` to `recipient`.
    ///
    /// A single attempt is made; any transport failure is returned as
    /// `SealmailError::Transport`.
    pub fn send(&self, recipient: &str, sender: &str, subject: &str, body: &[u8]) -> Result<()> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            SealmailError::transport("SMTP is not configured; add an [smtp] section to the config")
        })?;

        let mail = OutgoingMail::new(recipient, sender, subject, body);
        self.transport.deliver(credentials, &mail)?;

        tracing::info!(%recipient, host = %credentials.host, "mail submitted");
        Ok(())
    }
}
