pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Encrypt with your GPG keyring, deliver over SMTP.
#[derive(Parser, Debug)]
#[command(name = "sealmail", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the config file (default: ./sealmail.toml, then the user config dir)
    #[arg(long, global = true, env = "SEALMAIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// GPG keyring directory, overrides [gpg] keyring
    #[arg(long, global = true, env = "SEALMAIL_KEYRING")]
    pub keyring: Option<PathBuf>,

    /// gpg binary to run, overrides [gpg] executable
    #[arg(long, global = true)]
    pub gpg: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect and manage keys in the keyring
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Encrypt a message and print the ASCII-armored result
    Encrypt {
        #[command(flatten)]
        crypto: CryptoArgs,

        /// File to encrypt (default: stdin)
        file: Option<PathBuf>,
    },

    /// Encrypt a message and email the ciphertext
    Send {
        #[command(flatten)]
        mail: MailArgs,

        #[command(flatten)]
        crypto: CryptoArgs,

        /// File holding the message (default: stdin)
        file: Option<PathBuf>,
    },

    /// Email an exported public key
    SendKey {
        /// Fingerprint, key id or email of the key to send
        key_id: String,

        #[command(flatten)]
        mail: MailArgs,
    },

    /// Check that gpg, the keyring and SMTP are set up
    Check,
}

#[derive(Subcommand, Debug)]
pub enum KeysAction {
    /// List keys, optionally matching a fingerprint, email or name
    List {
        /// Search string (default: all keys)
        search: Option<String>,

        /// Print the full key details as JSON
        #[arg(long)]
        json: bool,
    },
    /// List subkeys that can encrypt
    EncryptCapable,
    /// List subkeys that can sign
    SignCapable,
    /// Import an ASCII-armored key file
    Import {
        /// File containing the key
        file: PathBuf,
    },
    /// Export a public key as ASCII armor
    Export {
        /// Fingerprint, key id or email of the key
        key_id: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Key selection shared by `encrypt` and `send`.
#[derive(Args, Debug)]
pub struct CryptoArgs {
    /// Key to encrypt to (fingerprint, key id or email)
    #[arg(long, short = 'r')]
    pub recipient_key: String,

    /// Also sign with this secret key
    #[arg(long)]
    pub sign_with: Option<String>,

    /// Passphrase for the signing key (prompted for when missing)
    #[arg(long, env = "SEALMAIL_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// Addressing shared by `send` and `send-key`.
#[derive(Args, Debug)]
pub struct MailArgs {
    /// Recipient email address
    #[arg(long)]
    pub to: String,

    /// Sender email address (used for From, Sender and Reply-To)
    #[arg(long)]
    pub from: String,

    /// Subject line
    #[arg(long, short = 's')]
    pub subject: String,
}
