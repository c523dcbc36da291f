use colored::Colorize;

use crate::cli::context::Context;
use crate::cli::output;
use crate::core::errors::{Result, SealmailError};
use crate::core::models::keyring_path::KeyringPath;

/// Execute the `sealmail check` command.
///
/// Reports whether gpg runs, whether the keyring directory is usable and
/// whether SMTP is configured. Fails when any of them is missing.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();

    output::header("🔍 sealmail check");

    match &ctx.config_path {
        Some(path) => output::success(&format!("Config: {}", path.display())),
        None => output::warning("No config file found, using defaults"),
    }

    let engine = ctx.engine(None);
    let gpg_path = engine.gpg_path();
    match engine.version() {
        Some(version) => output::success(&format!("GnuPG: {version}")),
        None => {
            output::warning(&format!("GnuPG: '{}' could not be run", gpg_path.display()));
            missing.push(format!("GnuPG executable ({})", gpg_path.display()));
        }
    }

    match ctx.keyring_dir() {
        None => output::success("Keyring: gpg default home"),
        Some(dir) => match KeyringPath::new(dir) {
            Ok(keyring) => output::success(&format!("Keyring: {keyring}")),
            Err(e) => {
                output::warning(&format!("Keyring: {}", first_line(&e)));
                missing.push(format!("Readable keyring directory ({})", dir.display()));
            }
        },
    }

    match &ctx.config.smtp {
        Some(smtp) => {
            let auth = if smtp.auth {
                format!("as {}", smtp.username)
            } else {
                "without authentication".to_string()
            };
            output::success(&format!(
                "SMTP: {}:{} ({}) {auth}",
                smtp.host, smtp.port, smtp.tls
            ));
        }
        None => {
            output::warning("SMTP: no [smtp] section");
            missing.push("SMTP settings ([smtp] section)".to_string());
        }
    }

    println!();
    if missing.is_empty() {
        output::success(&"You are good to go!".green().to_string());
        return Ok(());
    }

    println!("  You lack one or more components:");
    for component in &missing {
        println!("    • {component}");
    }
    Err(SealmailError::Configuration {
        detail: format!("{} prerequisite(s) missing", missing.len()),
    })
}

fn first_line(err: &SealmailError) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}
