use chrono::{DateTime, Utc};
use serde::Serialize;

/// Friendly name reported for keys that carry no usable user id.
pub const NO_NAME_AVAILABLE: &str = "[NO NAME AVAILABLE]";

/// A key as listed by the cryptographic engine.
///
/// The primary key is always the first entry of `subkeys`, so capability
/// filters only ever need to walk that list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    pub fingerprint: String,
    pub subkeys: Vec<Subkey>,
    pub uids: Vec<UserId>,
}

/// Key material with its own capability flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subkey {
    pub fingerprint: String,
    pub key_id: String,
    pub can_encrypt: bool,
    pub can_sign: bool,
    pub can_certify: bool,
    pub can_authenticate: bool,
    pub revoked: bool,
    pub expired: bool,
    pub disabled: bool,
    pub created: Option<DateTime<Utc>>,
    pub expires: Option<DateTime<Utc>>,
}

/// A user id bound to a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserId {
    /// Full user id string, e.g. `Alice (work) <alice@example.com>`.
    pub uid: Option<String>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub revoked: bool,
    pub invalid: bool,
}

impl KeyDescriptor {
    /// Name shown to humans when picking a key: the first user id, or
    /// [`NO_NAME_AVAILABLE`] when there is none.
    pub fn friendly_name(&self) -> &str {
        self.uids
            .first()
            .and_then(|u| u.uid.as_deref())
            .unwrap_or(NO_NAME_AVAILABLE)
    }
}

impl std::fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.fingerprint, self.friendly_name())
    }
}
