use std::path::{Path, PathBuf};

use crate::core::errors::{Result, SealmailError};

/// A keyring directory that was checked when it was created.
///
/// Holding a `KeyringPath` means the directory existed and could be listed
/// at construction time. The path never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyringPath(PathBuf);

impl KeyringPath {
    /// Validate `path` as a keyring directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.is_dir() {
            return Err(SealmailError::Configuration {
                detail: format!(
                    "GPG path {} is not a valid directory. You may lack sufficient permissions.",
                    path.display()
                ),
            });
        }

        if let Err(e) = std::fs::read_dir(&path) {
            return Err(SealmailError::Configuration {
                detail: format!("GPG path {} is not readable: {e}", path.display()),
            });
        }

        Ok(Self(path))
    }

    /// Validate an optional path. `None` selects the engine's default keyring.
    pub fn optional(path: Option<impl Into<PathBuf>>) -> Result<Option<Self>> {
        path.map(Self::new).transpose()
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for KeyringPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
