use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::adapters::gpg::gpg_engine::GpgEngine;
use crate::adapters::smtp::lettre_transport::SmtpMailTransport;
use crate::cli::{Cli, CryptoArgs};
use crate::config::app_config::AppConfig;
use crate::core::errors::{Result, SealmailError};
use crate::core::models::keyring_path::KeyringPath;
use crate::core::services::crypto_service::CryptoService;
use crate::core::services::mail_gateway::MailGateway;
use crate::core::services::secure_mail_service::SecureMailService;

/// Settings resolved from the command line and the config file.
pub struct Context {
    pub config: AppConfig,
    pub config_path: Option<PathBuf>,
    pub quiet: bool,
    keyring_override: Option<PathBuf>,
    gpg_override: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (config, config_path) = AppConfig::discover(cli.config.as_deref())?;
        if let Some(path) = &config_path {
            tracing::debug!(config = %path.display(), "loaded configuration");
        }
        Ok(Self {
            config,
            config_path,
            quiet: cli.quiet,
            keyring_override: cli.keyring.clone(),
            gpg_override: cli.gpg.clone(),
        })
    }

    /// Keyring directory as configured, before validation.
    pub fn keyring_dir(&self) -> Option<&Path> {
        self.keyring_override
            .as_deref()
            .or(self.config.gpg.keyring.as_deref())
    }

    /// The validated keyring, or `None` for gpg's default home.
    pub fn keyring(&self) -> Result<Option<KeyringPath>> {
        KeyringPath::optional(self.keyring_dir())
    }

    pub fn gpg_path(&self) -> PathBuf {
        self.gpg_override
            .clone()
            .or_else(|| self.config.gpg.executable.clone())
            .unwrap_or_else(|| PathBuf::from("gpg"))
    }

    pub fn engine(&self, keyring: Option<&KeyringPath>) -> GpgEngine {
        GpgEngine::with_path(self.gpg_path()).bound_to(keyring)
    }

    pub fn crypto_service(&self) -> Result<CryptoService<GpgEngine>> {
        let keyring = self.keyring()?;
        let engine = self.engine(keyring.as_ref());
        Ok(CryptoService::new(engine, keyring))
    }

    /// Crypto plus a configured SMTP gateway. Fails up front when there is
    /// no `[smtp]` section, before anything is encrypted.
    pub fn mail_service(&self) -> Result<SecureMailService<GpgEngine, SmtpMailTransport>> {
        let smtp = self.config.smtp.as_ref().ok_or_else(|| SealmailError::Configuration {
            detail: "no [smtp] section found; sending mail needs SMTP settings".into(),
        })?;

        let mut gateway = MailGateway::new(SmtpMailTransport::new());
        gateway.configure(smtp.credentials());

        Ok(SecureMailService {
            crypto: self.crypto_service()?,
            gateway,
        })
    }
}

/// Read the whole message from `file`, or from stdin when no file is given.
pub fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => std::fs::read(path).map_err(|e| SealmailError::FileAccess {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Passphrase for signing: from `--passphrase`/`SEALMAIL_PASSPHRASE`, or
/// prompted for. Prompting is impossible when stdin carries the message.
pub fn signing_passphrase(crypto: &CryptoArgs, stdin_is_message: bool) -> Result<SecretString> {
    if let Some(passphrase) = &crypto.passphrase {
        return Ok(SecretString::from(passphrase.clone()));
    }

    if stdin_is_message {
        return Err(SealmailError::Configuration {
            detail: "the message is read from stdin, so the signing passphrase must come \
                     from --passphrase or SEALMAIL_PASSPHRASE"
                .into(),
        });
    }

    eprint!("  Passphrase for signing key: ");
    io::stderr().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(SecretString::from(input.trim_end_matches(['\r', '\n']).to_string()))
}
