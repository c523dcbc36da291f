use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use secrecy::{ExposeSecret, SecretString};

use super::colon_listing::parse_key_listing;
use super::import_status::parse_import_status;
use crate::core::errors::{Result, SealmailError};
use crate::core::models::import_result::ImportResult;
use crate::core::models::key_descriptor::KeyDescriptor;
use crate::core::models::keyring_path::KeyringPath;
use crate::core::services::keyring_scope::GNUPGHOME;
use crate::core::traits::crypto_engine::CryptoEngine;

/// OpenPGP engine that shells out to the system `gpg` binary.
///
/// When bound to a keyring, every child process gets `GNUPGHOME` set to it
/// explicitly. Otherwise gpg inherits `GNUPGHOME` from this process and
/// falls back to `~/.gnupg`.
pub struct GpgEngine {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
    homedir: Option<PathBuf>,
}

impl GpgEngine {
    /// Create an engine using the default `gpg` binary.
    pub fn new() -> Self {
        Self {
            gpg_path: PathBuf::from("gpg"),
            homedir: None,
        }
    }

    /// Create an engine with a custom gpg binary path.
    pub fn with_path(gpg_path: PathBuf) -> Self {
        Self {
            gpg_path,
            homedir: None,
        }
    }

    /// Bind every invocation to `keyring`.
    pub fn bound_to(mut self, keyring: Option<&KeyringPath>) -> Self {
        self.homedir = keyring.map(|k| k.as_path().to_path_buf());
        self
    }

    pub fn gpg_path(&self) -> &Path {
        &self.gpg_path
    }

    /// First line of `gpg --version`, e.g. `gpg (GnuPG) 2.4.4`.
    pub fn version(&self) -> Option<String> {
        let output = Command::new(&self.gpg_path).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(str::to_string)
    }

    /// `gpgconf` next to the configured gpg binary, or from `PATH`.
    fn gpgconf_path(&self) -> PathBuf {
        match self.gpg_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join("gpgconf"),
            _ => PathBuf::from("gpgconf"),
        }
    }

    /// Make gpg-agent forget cached passphrases so the next signing checks
    /// the passphrase it is given. Loopback pinentry fills the cache, and a
    /// cached entry would satisfy gpg no matter what is sent on stdin.
    fn flush_passphrase_cache(&self) {
        let mut cmd = Command::new(self.gpgconf_path());
        if let Some(home) = &self.homedir {
            cmd.env(GNUPGHOME, home);
        }
        cmd.args(["--reload", "gpg-agent"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        match cmd.output() {
            Ok(output) if output.status.success() => {
                tracing::debug!("flushed gpg-agent passphrase cache");
            }
            Ok(output) => tracing::warn!(
                reason = %stderr_reason(&output),
                "could not reload gpg-agent; a cached passphrase may be reused"
            ),
            Err(e) => tracing::warn!(
                error = %e,
                "could not run gpgconf; a cached passphrase may be reused"
            ),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.gpg_path);
        if let Some(home) = &self.homedir {
            cmd.env(GNUPGHOME, home);
        }
        cmd.args(["--batch", "--no-tty"]);
        cmd
    }

    /// Spawn gpg with `args`, feed `stdin_data` and collect everything it
    /// printed. The exit status is left for the caller to judge.
    fn spawn_gpg(
        &self,
        operation: &'static str,
        args: &[&str],
        stdin_data: Option<&[u8]>,
    ) -> Result<Output> {
        tracing::debug!(operation, gpg = %self.gpg_path.display(), ?args, "running gpg");

        let mut cmd = self.command();
        cmd.args(args)
            .stdin(if stdin_data.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| SealmailError::engine(operation, format!("Failed to run gpg: {e}")))?;

        // Feed stdin from a separate thread so a large output cannot fill the
        // stdout pipe while we are still writing.
        let writer = match (stdin_data, child.stdin.take()) {
            (Some(data), Some(mut stdin)) => {
                let data = data.to_vec();
                Some(std::thread::spawn(move || stdin.write_all(&data)))
            }
            _ => None,
        };

        let output = child
            .wait_with_output()
            .map_err(|e| SealmailError::engine(operation, format!("gpg process failed: {e}")))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // gpg may stop reading early when it rejects the input; its
                // exit status explains why.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(SealmailError::engine(
                        operation,
                        format!("Failed to write to gpg stdin: {e}"),
                    ));
                }
                Err(_) => {
                    return Err(SealmailError::engine(operation, "gpg stdin writer panicked"));
                }
            }
        }

        Ok(output)
    }

    /// Run gpg and return stdout on success.
    fn run_gpg(
        &self,
        operation: &'static str,
        args: &[&str],
        stdin_data: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let output = self.spawn_gpg(operation, args, stdin_data)?;

        if !output.status.success() {
            return Err(SealmailError::engine(operation, stderr_reason(&output)));
        }

        Ok(output.stdout)
    }
}

impl Default for GpgEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn stderr_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("gpg exited with {}", output.status)
    } else {
        format!("gpg exited with error: {stderr}")
    }
}

fn is_unmatched_search(search: &str, keys: &[KeyDescriptor], stderr: &str) -> bool {
    !search.is_empty() && keys.is_empty() && stderr.contains("No public key")
}

impl CryptoEngine for GpgEngine {
    fn list_keys(&self, search: &str) -> Result<Vec<KeyDescriptor>> {
        let mut args = vec!["--with-colons", "--fixed-list-mode", "--list-keys"];
        if !search.is_empty() {
            args.push("--");
            args.push(search);
        }

        let output = self.spawn_gpg("list", &args, None)?;
        let keys = parse_key_listing(&String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            // A search that matches nothing is an empty result, not a failure.
            // gpg still prints its `tru:` record, so judge by the parsed keys.
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_unmatched_search(search, &keys, &stderr) {
                return Ok(Vec::new());
            }
            return Err(SealmailError::engine("list", stderr_reason(&output)));
        }

        Ok(keys)
    }

    fn import(&self, key_data: &[u8]) -> Result<ImportResult> {
        let output = self.spawn_gpg("import", &["--status-fd", "1", "--import"], Some(key_data))?;

        let status = String::from_utf8_lossy(&output.stdout);
        let Some(result) = parse_import_status(&status) else {
            return Err(SealmailError::engine(
                "import",
                format!("no valid OpenPGP data found ({})", stderr_reason(&output)),
            ));
        };

        if !output.status.success() && result.imported == 0 && result.unchanged == 0 {
            return Err(SealmailError::engine("import", stderr_reason(&output)));
        }

        Ok(result)
    }

    fn export(&self, key_id: &str) -> Result<Vec<u8>> {
        // `gpg --export` without a name exports the whole keyring.
        if key_id.trim().is_empty() {
            return Err(SealmailError::engine("export", "no key id given"));
        }

        let armored = self.run_gpg("export", &["--armor", "--export", "--", key_id], None)?;
        if armored.is_empty() {
            return Err(SealmailError::engine(
                "export",
                format!("no public key matches '{key_id}'"),
            ));
        }
        Ok(armored)
    }

    fn encrypt(&self, recipient: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let args = [
            "--armor",
            "--yes",
            "--trust-model",
            "always",
            "--recipient",
            recipient,
            "--output",
            "-",
            "--encrypt",
        ];
        self.run_gpg("encrypt", &args, Some(plaintext))
    }

    fn encrypt_and_sign(
        &self,
        recipient: &str,
        plaintext: &[u8],
        signer: &str,
        passphrase: &SecretString,
    ) -> Result<Vec<u8>> {
        // stdin carries the passphrase, so the plaintext goes through a
        // private (0600) temporary file that is removed on drop.
        let mut staged = tempfile::NamedTempFile::new()?;
        staged.write_all(plaintext)?;
        staged.flush()?;
        let staged_path = staged.path().to_string_lossy().into_owned();

        let args = [
            "--armor",
            "--yes",
            "--trust-model",
            "always",
            "--pinentry-mode",
            "loopback",
            "--passphrase-fd",
            "0",
            "--local-user",
            signer,
            "--recipient",
            recipient,
            "--output",
            "-",
            "--sign",
            "--encrypt",
            "--",
            staged_path.as_str(),
        ];

        self.flush_passphrase_cache();

        let mut secret = passphrase.expose_secret().as_bytes().to_vec();
        secret.push(b'\n');
        let result = self.run_gpg("sign and encrypt", &args, Some(&secret));
        secret.fill(0);
        result
    }

    fn name(&self) -> &str {
        "gpg"
    }
}
