use std::collections::BTreeMap;
use std::path::Path;

use secrecy::SecretString;

use crate::core::errors::{Result, SealmailError};
use crate::core::models::import_result::ImportResult;
use crate::core::models::key_descriptor::{KeyDescriptor, Subkey};
use crate::core::models::keyring_path::KeyringPath;
use crate::core::services::keyring_scope::KeyringScope;
use crate::core::traits::crypto_engine::CryptoEngine;

/// Runs engine operations against one keyring.
///
/// Each call enters a [`KeyringScope`] for the configured keyring, invokes
/// the engine once and leaves the scope before returning, whatever the
/// outcome.
pub struct CryptoService<E: CryptoEngine> {
    engine: E,
    keyring: Option<KeyringPath>,
}

impl<E: CryptoEngine> CryptoService<E> {
    /// `keyring: None` uses the engine's default keyring.
    pub fn new(engine: E, keyring: Option<KeyringPath>) -> Self {
        Self { engine, keyring }
    }

    pub fn keyring(&self) -> Option<&KeyringPath> {
        self.keyring.as_ref()
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn scoped<T>(&self, op: impl FnOnce(&E) -> Result<T>) -> Result<T> {
        tracing::trace!(engine = self.engine.name(), keyring = ?self.keyring, "engine call");
        KeyringScope::run(self.keyring.as_ref(), || op(&self.engine))
    }

    /// Keys matching `search`; an empty string lists the whole keyring.
    pub fn list_keys(&self, search: &str) -> Result<Vec<KeyDescriptor>> {
        self.scoped(|engine| engine.list_keys(search))
    }

    /// Fingerprints of every encryption-capable subkey, mapped to the
    /// friendly name of the key that owns it.
    pub fn list_encrypt_capable(&self) -> Result<BTreeMap<String, String>> {
        self.capable_subkeys(|subkey| subkey.can_encrypt)
    }

    /// Fingerprints of every signing-capable subkey, mapped to the friendly
    /// name of the key that owns it.
    pub fn list_sign_capable(&self) -> Result<BTreeMap<String, String>> {
        self.capable_subkeys(|subkey| subkey.can_sign)
    }

    fn capable_subkeys(&self, capable: impl Fn(&Subkey) -> bool) -> Result<BTreeMap<String, String>> {
        let keys = self.list_keys("")?;
        let mut choices = BTreeMap::new();
        for key in &keys {
            for subkey in key.subkeys.iter().filter(|s| capable(s)) {
                choices.insert(subkey.fingerprint.clone(), key.friendly_name().to_string());
            }
        }
        Ok(choices)
    }

    pub fn import_key(&self, key_data: &[u8]) -> Result<ImportResult> {
        let result = self.scoped(|engine| engine.import(key_data))?;
        tracing::info!(%result, "imported key material");
        Ok(result)
    }

    /// Import the ASCII key stored in `path`.
    ///
    /// The file is checked and read before the engine is involved, so a
    /// missing or unreadable file is always `FileAccess`.
    pub fn import_key_from_file(&self, path: &Path) -> Result<ImportResult> {
        if !path.exists() {
            return Err(SealmailError::FileAccess {
                path: path.to_path_buf(),
                reason: "the file does not exist".into(),
            });
        }
        if !path.is_file() {
            return Err(SealmailError::FileAccess {
                path: path.to_path_buf(),
                reason: "not a regular file".into(),
            });
        }

        let key_data = std::fs::read(path).map_err(|e| SealmailError::FileAccess {
            path: path.to_path_buf(),
            reason: format!("the file is not readable: {e}"),
        })?;

        self.import_key(&key_data)
    }

    pub fn export_key(&self, key_id: &str) -> Result<Vec<u8>> {
        self.scoped(|engine| engine.export(key_id))
    }

    pub fn encrypt(&self, recipient_key_id: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.scoped(|engine| engine.encrypt(recipient_key_id, plaintext))
    }

    pub fn encrypt_and_sign(
        &self,
        recipient_key_id: &str,
        plaintext: &[u8],
        signer_key_id: &str,
        passphrase: &SecretString,
    ) -> Result<Vec<u8>> {
        self.scoped(|engine| {
            engine.encrypt_and_sign(recipient_key_id, plaintext, signer_key_id, passphrase)
        })
    }
}
