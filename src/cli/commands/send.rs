use std::path::Path;

use crate::cli::context::{self, Context};
use crate::cli::output;
use crate::cli::{CryptoArgs, MailArgs};
use crate::core::errors::Result;
use crate::core::services::secure_mail_service::Addressing;

fn addressing(mail: &MailArgs) -> Addressing<'_> {
    Addressing {
        recipient: &mail.to,
        sender: &mail.from,
        subject: &mail.subject,
    }
}

/// Execute the `sealmail send` command.
///
/// Encrypts the message for the recipient key, optionally signing it, and
/// emails the ciphertext. Nothing is sent if encryption fails.
pub fn execute(ctx: &Context, mail: &MailArgs, crypto: &CryptoArgs, file: Option<&Path>) -> Result<()> {
    let service = ctx.mail_service()?;
    let plaintext = context::read_input(file)?;
    let passphrase = match &crypto.sign_with {
        Some(_) => Some(context::signing_passphrase(crypto, file.is_none())?),
        None => None,
    };

    let pb = output::spinner(&format!("Sending to {}...", mail.to), ctx.quiet);
    let result = match (&crypto.sign_with, &passphrase) {
        (Some(signer), Some(passphrase)) => service.send_signed_encrypted_email(
            addressing(mail),
            &crypto.recipient_key,
            signer,
            passphrase,
            &plaintext,
        ),
        _ => service.send_encrypted_email(addressing(mail), &crypto.recipient_key, &plaintext),
    };
    pb.finish_and_clear();
    result?;

    if !ctx.quiet {
        let kind = if crypto.sign_with.is_some() {
            "Signed and encrypted"
        } else {
            "Encrypted"
        };
        output::success(&format!("{kind} message sent to {}", mail.to));
    }
    Ok(())
}

/// Execute the `sealmail send-key` command.
pub fn execute_key(ctx: &Context, key_id: &str, mail: &MailArgs) -> Result<()> {
    let service = ctx.mail_service()?;

    let pb = output::spinner(&format!("Sending key {key_id} to {}...", mail.to), ctx.quiet);
    let result = service.email_exported_key(key_id, addressing(mail));
    pb.finish_and_clear();
    result?;

    if !ctx.quiet {
        output::success(&format!("Public key {key_id} sent to {}", mail.to));
    }
    Ok(())
}
