use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::core::errors::Result;
use crate::core::models::keyring_path::KeyringPath;

/// Environment variable GnuPG reads to locate its home directory.
pub const GNUPGHOME: &str = "GNUPGHOME";

/// Serializes every override of `GNUPGHOME` within the process.
static SCOPE_LOCK: Mutex<()> = Mutex::new(());

/// The value `GNUPGHOME` had before a scope overrode it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot(Option<OsString>);

impl EnvironmentSnapshot {
    pub fn capture() -> Self {
        Self(std::env::var_os(GNUPGHOME))
    }

    /// Put the captured value back. A variable that was unset is removed
    /// again rather than left as an empty string.
    fn restore(&self) {
        // SAFETY: only called while SCOPE_LOCK is held. The only thread the
        // crate starts besides main is the gpg stdin writer, which never
        // reads the environment; the CLI spinner has no ticker thread.
        unsafe {
            match &self.0 {
                Some(value) => std::env::set_var(GNUPGHOME, value),
                None => std::env::remove_var(GNUPGHOME),
            }
        }
    }

    pub fn value(&self) -> Option<&OsString> {
        self.0.as_ref()
    }
}

/// Points `GNUPGHOME` at a keyring for as long as the scope is alive.
///
/// Dropping the scope restores the previous value, so the override is
/// undone on every exit path: normal return, `?` propagation or panic.
/// Without a keyring the scope does nothing.
///
/// Scopes are serialized process-wide and must not be nested: entering a
/// second scope on a thread that already holds one blocks forever.
#[must_use = "the keyring override ends when the scope is dropped"]
pub struct KeyringScope {
    snapshot: Option<EnvironmentSnapshot>,
    _lock: Option<MutexGuard<'static, ()>>,
}

impl KeyringScope {
    pub fn enter(keyring: Option<&KeyringPath>) -> Self {
        let Some(keyring) = keyring else {
            return Self {
                snapshot: None,
                _lock: None,
            };
        };

        let lock = SCOPE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = EnvironmentSnapshot::capture();

        // SAFETY: SCOPE_LOCK is held, see EnvironmentSnapshot::restore.
        unsafe { std::env::set_var(GNUPGHOME, keyring.as_path()) };
        tracing::debug!(keyring = %keyring, previous = ?snapshot.value(), "entered keyring scope");

        Self {
            snapshot: Some(snapshot),
            _lock: Some(lock),
        }
    }

    /// End the scope now instead of at the end of the enclosing block.
    pub fn exit(self) {
        drop(self);
    }

    /// Run `op` inside a scope for `keyring`.
    ///
    /// The scope is released before the result is returned, and errors from
    /// `op` come back unchanged.
    pub fn run<T>(keyring: Option<&KeyringPath>, op: impl FnOnce() -> Result<T>) -> Result<T> {
        let scope = Self::enter(keyring);
        let result = op();
        scope.exit();
        result
    }
}

impl Drop for KeyringScope {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore();
            tracing::debug!(restored = ?snapshot.value(), "left keyring scope");
        }
    }
}
