use std::io::{self, Write};
use std::path::Path;

use crate::cli::CryptoArgs;
use crate::cli::context::{self, Context};
use crate::cli::output;
use crate::core::errors::Result;

/// Execute the `sealmail encrypt` command.
///
/// Encrypts (and optionally signs) the message and writes the ASCII armor
/// to stdout.
pub fn execute(ctx: &Context, crypto: &CryptoArgs, file: Option<&Path>) -> Result<()> {
    let service = ctx.crypto_service()?;
    let plaintext = context::read_input(file)?;

    let ciphertext = match &crypto.sign_with {
        Some(signer) => {
            let passphrase = context::signing_passphrase(crypto, file.is_none())?;
            service.encrypt_and_sign(&crypto.recipient_key, &plaintext, signer, &passphrase)?
        }
        None => service.encrypt(&crypto.recipient_key, &plaintext)?,
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(&ciphertext)?;
    stdout.flush()?;

    if !ctx.quiet {
        output::status(&format!("Encrypted for {}", crypto.recipient_key));
    }
    Ok(())
}
