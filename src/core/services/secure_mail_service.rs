use secrecy::SecretString;

use crate::core::errors::Result;
use crate::core::services::crypto_service::CryptoService;
use crate::core::services::mail_gateway::MailGateway;
use crate::core::traits::crypto_engine::CryptoEngine;
use crate::core::traits::mail_transport::MailTransport;

/// Who a message goes to, who it comes from, and its subject line.
#[derive(Debug, Clone, Copy)]
pub struct Addressing<'a> {
    pub recipient: &'a str,
    pub sender: &'a str,
    pub subject: &'a str,
}

/// Chains a crypto operation with a mail submission.
///
/// The crypto step always finishes (and releases its keyring scope) before
/// the gateway is touched. If it fails, nothing is sent.
pub struct SecureMailService<E: CryptoEngine, T: MailTransport> {
    pub crypto: CryptoService<E>,
    pub gateway: MailGateway<T>,
}

impl<E: CryptoEngine, T: MailTransport> SecureMailService<E, T> {
    /// Encrypt `plaintext` to `recipient_key_id` and mail the ciphertext.
    pub fn send_encrypted_email(
        &self,
        to: Addressing<'_>,
        recipient_key_id: &str,
        plaintext: &[u8],
    ) -> Result<()> {
        let ciphertext = self.crypto.encrypt(recipient_key_id, plaintext)?;
        self.dispatch(to, &ciphertext)
    }

    /// Sign with `sender_key_id`, encrypt to `recipient_key_id`, and mail
    /// the result.
    pub fn send_signed_encrypted_email(
        &self,
        to: Addressing<'_>,
        recipient_key_id: &str,
        sender_key_id: &str,
        passphrase: &SecretString,
        plaintext: &[u8],
    ) -> Result<()> {
        let ciphertext =
            self.crypto
                .encrypt_and_sign(recipient_key_id, plaintext, sender_key_id, passphrase)?;
        self.dispatch(to, &ciphertext)
    }

    /// Export the public key `key_id` and mail the armored key.
    pub fn email_exported_key(&self, key_id: &str, to: Addressing<'_>) -> Result<()> {
        let key_data = self.crypto.export_key(key_id)?;
        self.dispatch(to, &key_data)
    }

    fn dispatch(&self, to: Addressing<'_>, body: &[u8]) -> Result<()> {
        self.gateway.send(to.recipient, to.sender, to.subject, body)
    }
}
