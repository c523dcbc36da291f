use std::path::PathBuf;

/// All domain errors for sealmail.
///
/// Every delegated failure ends up in exactly one of these variants and is
/// returned to the caller unchanged. Nothing is retried or swallowed.
#[derive(Debug, thiserror::Error)]
pub enum SealmailError {
    #[error(
        "Invalid configuration: {detail}\n\n  \
         Check the [gpg] and [smtp] sections of your sealmail.toml,\n  \
         or run 'sealmail check' to inspect the current setup."
    )]
    Configuration { detail: String },

    #[error(
        "Cannot read {path}: {reason}\n\n  \
         Check that the path is correct and that you have permission to read it."
    )]
    FileAccess { path: PathBuf, reason: String },

    #[error("GPG {operation} failed: {reason}")]
    CryptoEngine {
        operation: &'static str,
        reason: String,
    },

    #[error(
        "Mail delivery failed: {reason}\n\n  \
         Solutions:\n    \
         → Verify host, port and TLS mode in the [smtp] section\n    \
         → Set debug = true in [smtp] to log the SMTP exchange\n    \
         → Run 'sealmail check' to confirm SMTP is configured"
    )]
    Transport { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SealmailError {
    /// Shorthand for a failure reported by the cryptographic engine.
    pub fn engine(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::CryptoEngine {
            operation,
            reason: reason.into(),
        }
    }

    /// Shorthand for a mail transport failure.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SealmailError>;
