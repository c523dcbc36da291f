//! In-memory engine and transport used by the service tests.

use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};

use crate::core::errors::{Result, SealmailError};
use crate::core::models::import_result::ImportResult;
use crate::core::models::key_descriptor::{KeyDescriptor, Subkey, UserId};
use crate::core::models::outgoing_mail::OutgoingMail;
use crate::core::models::smtp_credentials::SmtpCredentials;
use crate::core::services::keyring_scope::GNUPGHOME;
use crate::core::traits::crypto_engine::CryptoEngine;
use crate::core::traits::mail_transport::MailTransport;

pub const ALICE_FPR: &str = "A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1A1";
pub const ALICE_ENC_FPR: &str = "A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2A2";
pub const BOB_FPR: &str = "B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1B1";
pub const CAROL_FPR: &str = "C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1C1";
pub const PASSPHRASE: &str = "correct horse";

fn subkey(fingerprint: &str, can_encrypt: bool, can_sign: bool) -> Subkey {
    Subkey {
        fingerprint: fingerprint.into(),
        key_id: fingerprint[24..].into(),
        can_encrypt,
        can_sign,
        ..Default::default()
    }
}

/// Alice has a sign-only primary and an encryption subkey. Bob has a
/// single primary that can do both, and no user id. Carol can only sign.
pub fn sample_keys() -> Vec<KeyDescriptor> {
    vec![
        KeyDescriptor {
            fingerprint: ALICE_FPR.into(),
            subkeys: vec![
                subkey(ALICE_FPR, false, true),
                subkey(ALICE_ENC_FPR, true, false),
            ],
            uids: vec![UserId {
                uid: Some("Alice <alice@example.com>".into()),
                name: Some("Alice".into()),
                email: Some("alice@example.com".into()),
                ..Default::default()
            }],
        },
        KeyDescriptor {
            fingerprint: BOB_FPR.into(),
            subkeys: vec![subkey(BOB_FPR, true, true)],
            uids: vec![],
        },
        KeyDescriptor {
            fingerprint: CAROL_FPR.into(),
            subkeys: vec![subkey(CAROL_FPR, false, true)],
            uids: vec![UserId {
                uid: Some("Carol <carol@example.com>".into()),
                ..Default::default()
            }],
        },
    ]
}

/// Engine backed by `sample_keys()` that records every call it receives
/// together with the `GNUPGHOME` value it observed.
pub struct FakeEngine {
    keys: Vec<KeyDescriptor>,
    fail_with: Option<String>,
    calls: Mutex<Vec<String>>,
    seen_homes: Mutex<Vec<Option<String>>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            keys: sample_keys(),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
            seen_homes: Mutex::new(Vec::new()),
        }
    }

    /// Engine whose every operation fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_homes(&self) -> Vec<Option<String>> {
        self.seen_homes.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        self.seen_homes
            .lock()
            .unwrap()
            .push(std::env::var(GNUPGHOME).ok());
        match &self.fail_with {
            Some(reason) => Err(SealmailError::engine(operation, reason.clone())),
            None => Ok(()),
        }
    }

    fn find(&self, operation: &'static str, id: &str) -> Result<&KeyDescriptor> {
        self.keys
            .iter()
            .find(|k| k.fingerprint == id || k.subkeys.iter().any(|s| s.fingerprint == id))
            .ok_or_else(|| SealmailError::engine(operation, format!("no key matches '{id}'")))
    }
}

impl CryptoEngine for FakeEngine {
    fn list_keys(&self, search: &str) -> Result<Vec<KeyDescriptor>> {
        self.record("list")?;
        Ok(self
            .keys
            .iter()
            .filter(|k| search.is_empty() || k.fingerprint.contains(search))
            .cloned()
            .collect())
    }

    fn import(&self, key_data: &[u8]) -> Result<ImportResult> {
        self.record("import")?;
        if !key_data.starts_with(b"-----BEGIN PGP PUBLIC KEY BLOCK-----") {
            return Err(SealmailError::engine("import", "no valid OpenPGP data found"));
        }
        Ok(ImportResult {
            considered: 1,
            imported: 1,
            fingerprints: vec![BOB_FPR.into()],
            ..Default::default()
        })
    }

    fn export(&self, key_id: &str) -> Result<Vec<u8>> {
        self.record("export")?;
        let key = self.find("export", key_id)?;
        Ok(format!("-----BEGIN PGP PUBLIC KEY BLOCK-----\n{}\n", key.fingerprint).into_bytes())
    }

    fn encrypt(&self, recipient: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.record("encrypt")?;
        let key = self.find("encrypt", recipient)?;
        if !key.subkeys.iter().any(|s| s.can_encrypt) {
            return Err(SealmailError::engine("encrypt", "unusable public key"));
        }
        let mut out = format!("ENC[{recipient}]:").into_bytes();
        out.extend(plaintext.iter().rev());
        Ok(out)
    }

    fn encrypt_and_sign(
        &self,
        recipient: &str,
        plaintext: &[u8],
        signer: &str,
        passphrase: &SecretString,
    ) -> Result<Vec<u8>> {
        self.record("sign and encrypt")?;
        self.find("sign and encrypt", signer)?;
        if passphrase.expose_secret() != PASSPHRASE {
            return Err(SealmailError::engine("sign and encrypt", "bad passphrase"));
        }
        let mut out = format!("SIGNED[{signer}]").into_bytes();
        out.extend(self.encrypt(recipient, plaintext)?);
        Ok(out)
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// Transport that stores delivered mail instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    fail_with: Option<String>,
    attempts: Mutex<Vec<(String, OutgoingMail)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that rejects every message with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Number of delivery attempts, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Every attempted message together with the host it was sent to.
    pub fn sent(&self) -> Vec<(String, OutgoingMail)> {
        self.attempts.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn deliver(&self, credentials: &SmtpCredentials, mail: &OutgoingMail) -> Result<()> {
        self.attempts
            .lock()
            .unwrap()
            .push((credentials.host.clone(), mail.clone()));
        match &self.fail_with {
            Some(reason) => Err(SealmailError::transport(reason.clone())),
            None => Ok(()),
        }
    }
}
