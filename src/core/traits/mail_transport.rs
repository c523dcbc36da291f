use crate::core::errors::Result;
use crate::core::models::outgoing_mail::OutgoingMail;
use crate::core::models::smtp_credentials::SmtpCredentials;

/// Port for submitting a single message.
///
/// The transport is built from `credentials` on every call, so a failure to
/// connect or to build the client surfaces as `SealmailError::Transport`
/// from `deliver` itself.
pub trait MailTransport: Send + Sync {
    /// Submit `mail` once. No retries.
    fn deliver(&self, credentials: &SmtpCredentials, mail: &OutgoingMail) -> Result<()>;
}
