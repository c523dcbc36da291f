use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::core::errors::{Result, SealmailError};
use crate::core::models::outgoing_mail::OutgoingMail;
use crate::core::models::smtp_credentials::{SmtpCredentials, TlsMode};
use crate::core::traits::mail_transport::MailTransport;

/// Blocking SMTP submission through `lettre`.
///
/// A fresh connection is opened for every message and closed afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmtpMailTransport;

impl SmtpMailTransport {
    pub fn new() -> Self {
        Self
    }

    fn build_transport(credentials: &SmtpCredentials) -> Result<SmtpTransport> {
        let host = credentials.host.as_str();
        let tls_parameters = || {
            TlsParameters::new(host.to_string()).map_err(|e| {
                SealmailError::transport(format!("Unable to set up TLS for {host}: {e}"))
            })
        };

        let tls = match credentials.tls {
            TlsMode::None => Tls::None,
            TlsMode::Starttls => Tls::Required(tls_parameters()?),
            TlsMode::Tls => Tls::Wrapper(tls_parameters()?),
        };

        let mut builder = SmtpTransport::builder_dangerous(host)
            .port(credentials.port)
            .tls(tls);

        if credentials.authenticate {
            builder = builder.credentials(Credentials::new(
                credentials.username.clone(),
                credentials.password.expose_secret().to_string(),
            ));
        }

        Ok(builder.build())
    }

    fn build_message(mail: &OutgoingMail) -> Result<Message> {
        let sender = parse_mailbox("sender", &mail.sender)?;
        let recipient = parse_mailbox("recipient", &mail.recipient)?;

        Message::builder()
            .from(sender.clone())
            .sender(sender.clone())
            .reply_to(sender)
            .to(recipient)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| SealmailError::transport(format!("Unable to build message: {e}")))
    }
}

fn parse_mailbox(role: &str, address: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| SealmailError::transport(format!("Invalid {role} address '{address}': {e}")))
}

impl MailTransport for SmtpMailTransport {
    fn deliver(&self, credentials: &SmtpCredentials, mail: &OutgoingMail) -> Result<()> {
        let message = Self::build_message(mail)?;
        let transport = Self::build_transport(credentials)?;

        if credentials.debug {
            tracing::info!(
                host = %credentials.host,
                port = credentials.port,
                tls = %credentials.tls,
                from = %mail.sender,
                to = %mail.recipient,
                bytes = mail.body.len(),
                "submitting message"
            );
            for (name, value) in mail.headers() {
                tracing::info!("{name}: {value}");
            }
        }

        let response = transport.send(&message).map_err(|e| {
            SealmailError::transport(format!(
                "{}:{} rejected the message: {e}",
                credentials.host, credentials.port
            ))
        })?;

        if credentials.debug {
            tracing::info!(
                code = %response.code(),
                reply = response.first_line().unwrap_or_default(),
                "server accepted message"
            );
        }

        Ok(())
    }
}
