//! End-to-end runs against a real `gpg` binary and throwaway keyrings.
//!
//! Run with `cargo test -- --ignored` on a machine with GnuPG 2.2+.

use std::process::Command;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn sealmail(dir: &assert_fs::TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sealmail");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("SEALMAIL_CONFIG")
        .env_remove("SEALMAIL_KEYRING")
        .env_remove("SEALMAIL_PASSPHRASE")
        .env_remove("GNUPGHOME");
    cmd
}

/// Create a private keyring directory holding one freshly generated key.
fn keyring_with_key(dir: &assert_fs::TempDir, name: &str, uid: &str, passphrase: &str) {
    let home = dir.child(name);
    home.create_dir_all().unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(home.path(), std::fs::Permissions::from_mode(0o700)).unwrap();
    }

    let status = Command::new("gpg")
        .arg("--homedir")
        .arg(home.path())
        .args(["--batch", "--pinentry-mode", "loopback", "--passphrase", passphrase])
        .args(["--quick-gen-key", uid, "default", "default", "never"])
        .status()
        .unwrap();
    assert!(status.success(), "gpg key generation failed");
}

fn empty_keyring(dir: &assert_fs::TempDir, name: &str) {
    let home = dir.child(name);
    home.create_dir_all().unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(home.path(), std::fs::Permissions::from_mode(0o700)).unwrap();
    }
}

#[test]
#[ignore = "requires gpg"]
fn list_keys_as_json() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "");

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\": \"alice@example.com\""))
        .stdout(predicate::str::contains("\"can_encrypt\": true"));
}

#[test]
#[ignore = "requires gpg"]
fn search_without_match_lists_nothing() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "");

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "list", "nobody@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No keys found."));
}

#[test]
#[ignore = "requires gpg"]
fn capability_maps_name_the_key() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "");

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "encrypt-capable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice <alice@example.com>"));

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "sign-capable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice <alice@example.com>"));
}

#[test]
#[ignore = "requires gpg"]
fn encrypt_writes_armored_message() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "");
    dir.child("note.txt").write_str("meet at noon").unwrap();

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "encrypt", "-r", "alice@example.com", "note.txt"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-----BEGIN PGP MESSAGE-----"))
        .stdout(predicate::str::contains("meet at noon").not());
}

#[test]
#[ignore = "requires gpg"]
fn sign_and_encrypt_uses_passphrase() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "s3cret");
    dir.child("note.txt").write_str("signed note").unwrap();

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "encrypt", "-r", "alice@example.com"])
        .args(["--sign-with", "alice@example.com", "note.txt"])
        .env("SEALMAIL_PASSPHRASE", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-----BEGIN PGP MESSAGE-----"));

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "encrypt", "-r", "alice@example.com"])
        .args(["--sign-with", "alice@example.com", "note.txt"])
        .env("SEALMAIL_PASSPHRASE", "wrong")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GPG sign and encrypt failed"));
}

#[test]
#[ignore = "requires gpg"]
fn unknown_recipient_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    empty_keyring(&dir, "empty-ring");
    dir.child("note.txt").write_str("hello").unwrap();

    sealmail(&dir)
        .args(["--keyring", "empty-ring", "encrypt", "-r", "nobody@example.com", "note.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GPG encrypt failed"));
}

#[test]
#[ignore = "requires gpg"]
fn export_then_import_into_another_keyring() {
    let dir = assert_fs::TempDir::new().unwrap();
    keyring_with_key(&dir, "alice-ring", "Alice <alice@example.com>", "");
    empty_keyring(&dir, "bob-ring");

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "export", "alice@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-----BEGIN PGP PUBLIC KEY BLOCK-----"));

    sealmail(&dir)
        .args(["--keyring", "alice-ring", "keys", "export", "alice@example.com"])
        .args(["-o", "alice.asc"])
        .assert()
        .success();
    dir.child("alice.asc")
        .assert(predicate::str::contains("BEGIN PGP PUBLIC KEY BLOCK"));

    sealmail(&dir)
        .args(["--keyring", "bob-ring", "keys", "import", "alice.asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported alice.asc: 1 processed, 1 imported"));

    // A second import changes nothing.
    sealmail(&dir)
        .args(["--keyring", "bob-ring", "keys", "import", "alice.asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing new in alice.asc"));

    sealmail(&dir)
        .args(["--keyring", "bob-ring", "keys", "encrypt-capable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice <alice@example.com>"));
}

#[test]
#[ignore = "requires gpg"]
fn export_unknown_key_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    empty_keyring(&dir, "empty-ring");

    sealmail(&dir)
        .args(["--keyring", "empty-ring", "keys", "export", "nobody@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no public key matches"));
}

#[test]
#[ignore = "requires gpg"]
fn importing_garbage_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    empty_keyring(&dir, "empty-ring");
    dir.child("junk.asc").write_str("not a key").unwrap();

    sealmail(&dir)
        .args(["--keyring", "empty-ring", "keys", "import", "junk.asc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GPG import failed"));
}
