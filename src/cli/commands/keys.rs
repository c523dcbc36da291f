use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

use crate::cli::KeysAction;
use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::key_descriptor::{KeyDescriptor, Subkey};

/// Execute the `sealmail keys` command.
pub fn execute(ctx: &Context, action: &KeysAction) -> Result<()> {
    match action {
        KeysAction::List { search, json } => execute_list(ctx, search.as_deref(), *json),
        KeysAction::EncryptCapable => {
            let choices = ctx.crypto_service()?.list_encrypt_capable()?;
            print_choices("Keys that can encrypt", &choices);
            Ok(())
        }
        KeysAction::SignCapable => {
            let choices = ctx.crypto_service()?.list_sign_capable()?;
            print_choices("Keys that can sign", &choices);
            Ok(())
        }
        KeysAction::Import { file } => execute_import(ctx, file),
        KeysAction::Export { key_id, output } => execute_export(ctx, key_id, output.as_deref()),
    }
}

/// List keys in the keyring.
fn execute_list(ctx: &Context, search: Option<&str>, json: bool) -> Result<()> {
    let service = ctx.crypto_service()?;
    let keys = service.list_keys(search.unwrap_or(""))?;

    if json {
        let rendered = serde_json::to_string_pretty(&keys).map_err(io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    if keys.is_empty() {
        output::warning("No keys found.");
        println!("  Import one with 'sealmail keys import <file>'.");
        return Ok(());
    }

    match service.keyring() {
        Some(keyring) => output::header(&format!("Keys in {keyring} ({})", keys.len())),
        None => output::header(&format!("Keys ({})", keys.len())),
    }
    for key in &keys {
        print_key(key);
    }
    Ok(())
}

fn print_key(key: &KeyDescriptor) {
    println!("  • {}  {}", key.fingerprint.cyan(), key.friendly_name());
    for uid in key.uids.iter().skip(1) {
        if let Some(uid) = &uid.uid {
            println!("      aka {uid}");
        }
    }
    for subkey in &key.subkeys {
        println!("      {} [{}]{}", subkey.key_id, capability_letters(subkey), state(subkey));
    }
}

fn capability_letters(subkey: &Subkey) -> String {
    [
        (subkey.can_sign, 'S'),
        (subkey.can_certify, 'C'),
        (subkey.can_encrypt, 'E'),
        (subkey.can_authenticate, 'A'),
    ]
    .iter()
    .filter(|(set, _)| *set)
    .map(|(_, letter)| *letter)
    .collect()
}

fn state(subkey: &Subkey) -> String {
    let mut flags = Vec::new();
    if subkey.revoked {
        flags.push("revoked".to_string());
    }
    if subkey.expired {
        flags.push("expired".to_string());
    } else if let Some(expires) = subkey.expires {
        flags.push(format!("expires {}", expires.format("%Y-%m-%d")));
    }
    if subkey.disabled {
        flags.push("disabled".to_string());
    }

    if flags.is_empty() {
        String::new()
    } else {
        format!("  ({})", flags.join(", ")).yellow().to_string()
    }
}

fn print_choices(title: &str, choices: &BTreeMap<String, String>) {
    if choices.is_empty() {
        output::warning(&format!("{title}: none found."));
        return;
    }

    output::header(&format!("{title} ({})", choices.len()));
    for (fingerprint, name) in choices {
        println!("  • {}  {name}", fingerprint.cyan());
    }
}

/// Import an ASCII key file into the keyring.
fn execute_import(ctx: &Context, file: &Path) -> Result<()> {
    let result = ctx.crypto_service()?.import_key_from_file(file)?;

    if result.changed_anything() {
        output::success(&format!("Imported {}: {result}", file.display()));
    } else {
        output::warning(&format!("Nothing new in {}: {result}", file.display()));
    }
    for fingerprint in &result.fingerprints {
        println!("    • {fingerprint}");
    }
    Ok(())
}

/// Export a public key to stdout or a file.
fn execute_export(ctx: &Context, key_id: &str, output_path: Option<&Path>) -> Result<()> {
    let armored = ctx.crypto_service()?.export_key(key_id)?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &armored)?;
            if !ctx.quiet {
                output::success(&format!("Exported {key_id} to {}", path.display()));
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&armored)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
