use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::core::models::key_descriptor::{KeyDescriptor, Subkey, UserId};

/// Splits `Name (comment) <email>` into its parts. Every part is optional.
static USER_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<name>[^(<]*?)\s*(?:\((?P<comment>[^)]*)\))?\s*(?:<(?P<email>[^>]*)>)?\s*$")
        .expect("user id pattern is valid")
});

/// Parse the output of `gpg --with-colons --fixed-list-mode --list-keys`.
///
/// Only `pub`, `sub`, `fpr` and `uid` records are used. The primary key is
/// recorded as the first subkey of its descriptor, and each `fpr` record
/// applies to the key record just before it.
pub fn parse_key_listing(listing: &str) -> Vec<KeyDescriptor> {
    let mut keys: Vec<KeyDescriptor> = Vec::new();

    for line in listing.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        match field(0) {
            "pub" => keys.push(KeyDescriptor {
                fingerprint: String::new(),
                subkeys: vec![parse_key_record(&fields)],
                uids: Vec::new(),
            }),
            "sub" => {
                if let Some(key) = keys.last_mut() {
                    key.subkeys.push(parse_key_record(&fields));
                }
            }
            "fpr" => {
                let Some(key) = keys.last_mut() else { continue };
                let fingerprint = field(9).to_string();
                let Some(subkey) = key.subkeys.last_mut() else { continue };
                if subkey.fingerprint.is_empty() {
                    subkey.fingerprint = fingerprint.clone();
                }
                if key.fingerprint.is_empty() {
                    key.fingerprint = fingerprint;
                }
            }
            "uid" => {
                if let Some(key) = keys.last_mut() {
                    key.uids.push(parse_uid_record(field(1), field(9)));
                }
            }
            _ => {}
        }
    }

    keys
}

fn parse_key_record(fields: &[&str]) -> Subkey {
    let field = |i: usize| fields.get(i).copied().unwrap_or("");
    let validity = field(1);
    let capabilities = field(11);

    Subkey {
        fingerprint: String::new(),
        key_id: field(4).to_string(),
        can_encrypt: capabilities.contains('e'),
        can_sign: capabilities.contains('s'),
        can_certify: capabilities.contains('c'),
        can_authenticate: capabilities.contains('a'),
        revoked: validity == "r",
        expired: validity == "e",
        disabled: validity == "d" || capabilities.contains('D'),
        created: parse_timestamp(field(5)),
        expires: parse_timestamp(field(6)),
    }
}

fn parse_uid_record(validity: &str, raw: &str) -> UserId {
    let uid = unescape(raw);
    let mut user_id = UserId {
        revoked: validity == "r",
        invalid: validity == "i",
        ..Default::default()
    };

    if let Some(caps) = USER_ID.captures(&uid) {
        let part = |name: &str| {
            caps.name(name)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        user_id.name = part("name");
        user_id.comment = part("comment");
        user_id.email = part("email");
    }

    if !uid.is_empty() {
        user_id.uid = Some(uid);
    }
    user_id
}

/// Dates are seconds since the epoch in fixed-list mode. Empty means none.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Undo the `\xHH` escaping gpg applies to colons and control bytes.
fn unescape(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            let decoded = raw
                .get(i + 2..i + 4)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(byte) = decoded {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}
