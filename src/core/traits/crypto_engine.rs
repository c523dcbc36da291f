use secrecy::SecretString;

use crate::core::errors::Result;
use crate::core::models::import_result::ImportResult;
use crate::core::models::key_descriptor::KeyDescriptor;

/// Port for the OpenPGP engine that owns the keyring.
///
/// Implementations live in `adapters::gpg`. Every failure is reported as
/// `SealmailError::CryptoEngine`; the core never inspects engine status codes.
pub trait CryptoEngine: Send + Sync {
    /// List public keys matching `search` (fingerprint, email or partial
    /// name). An empty search lists every key.
    fn list_keys(&self, search: &str) -> Result<Vec<KeyDescriptor>>;

    /// Import ASCII-armored key material.
    fn import(&self, key_data: &[u8]) -> Result<ImportResult>;

    /// Export a public key as ASCII armor.
    fn export(&self, key_id: &str) -> Result<Vec<u8>>;

    /// Encrypt `plaintext` to `recipient`, returning ASCII armor.
    fn encrypt(&self, recipient: &str, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Sign with `signer` and encrypt to `recipient` in one pass.
    fn encrypt_and_sign(
        &self,
        recipient: &str,
        plaintext: &[u8],
        signer: &str,
        passphrase: &SecretString,
    ) -> Result<Vec<u8>>;

    /// Human-readable name of this engine (e.g. "gpg").
    fn name(&self) -> &str;
}
