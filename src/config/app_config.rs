use serde::Deserialize;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::core::errors::{Result, SealmailError};
use crate::core::models::smtp_credentials::{SmtpCredentials, TlsMode};

/// File looked up in the working directory when no config path is given.
pub const LOCAL_CONFIG_FILE: &str = "sealmail.toml";

/// Overrides `[smtp] password` so it does not have to live in the file.
pub const SMTP_PASSWORD_ENV: &str = "SEALMAIL_SMTP_PASSWORD";

/// Top-level configuration read from `sealmail.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub smtp: Option<SmtpSection>,
    pub gpg: GpgSection,
}

impl AppConfig {
    /// Load the configuration from an explicit file, which must exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SealmailError::Configuration {
                detail: format!("config file {} not found", path.display()),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|detail| SealmailError::Configuration {
            detail: format!("Failed to parse {}: {detail}", path.display()),
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Find and load the configuration.
    ///
    /// An explicit path wins. Otherwise `./sealmail.toml` and then the user
    /// config directory are tried; when neither exists the defaults apply.
    /// Returns the file that was actually read, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), user_config_path()];
        for candidate in candidates.into_iter().flatten() {
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok((config, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }
}

/// `<config_dir>/sealmail/config.toml`, e.g. `~/.config/sealmail/config.toml`.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sealmail").join("config.toml"))
}

/// The `[smtp]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpSection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_auth")]
    pub auth: bool,
    #[serde(default)]
    pub username: String,
    pub password: Option<String>,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub tls: TlsMode,
}

fn default_port() -> u16 {
    587
}

fn default_auth() -> bool {
    true
}

impl SmtpSection {
    /// Build transport credentials. `SEALMAIL_SMTP_PASSWORD` takes
    /// precedence over the password stored in the file.
    pub fn credentials(&self) -> SmtpCredentials {
        let password = std::env::var(SMTP_PASSWORD_ENV)
            .ok()
            .or_else(|| self.password.clone())
            .unwrap_or_default();

        SmtpCredentials {
            host: self.host.clone(),
            port: self.port,
            authenticate: self.auth,
            username: self.username.clone(),
            password: SecretString::from(password),
            debug: self.debug,
            tls: self.tls,
        }
    }
}

/// The `[gpg]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpgSection {
    /// Keyring directory; absent means gpg's default home.
    pub keyring: Option<PathBuf>,
    /// gpg binary; absent means `gpg` from `PATH`.
    pub executable: Option<PathBuf>,
}
