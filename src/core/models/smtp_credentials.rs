use secrecy::SecretString;
use serde::Deserialize;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain text connection.
    None,
    /// Upgrade with STARTTLS; the server must support it.
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (SMTPS, usually port 465).
    Tls,
}

impl std::fmt::Display for TlsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TlsMode::None => "none",
            TlsMode::Starttls => "starttls",
            TlsMode::Tls => "tls",
        };
        f.write_str(s)
    }
}

/// Everything needed to talk to one SMTP relay.
///
/// Values are stored as given. Host names and addresses are only checked by
/// the transport when a message is actually sent.
#[derive(Debug)]
pub struct SmtpCredentials {
    pub host: String,
    pub port: u16,
    pub authenticate: bool,
    pub username: String,
    pub password: SecretString,
    pub debug: bool,
    pub tls: TlsMode,
}
