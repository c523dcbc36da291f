use crate::core::models::import_result::ImportResult;

const STATUS_PREFIX: &str = "[GNUPG:] ";

/// Build an `ImportResult` from `gpg --status-fd` output.
///
/// Returns `None` when no `IMPORT_RES` line was emitted, which gpg does
/// when the input held no OpenPGP data at all.
pub fn parse_import_status(status: &str) -> Option<ImportResult> {
    let mut fingerprints = Vec::new();
    let mut result = None;

    for line in status.lines() {
        let Some(rest) = line.strip_prefix(STATUS_PREFIX) else {
            continue;
        };
        let mut words = rest.split_whitespace();

        match words.next() {
            Some("IMPORT_OK") => {
                if let Some(fpr) = words.nth(1)
                    && !fingerprints.iter().any(|f| f == fpr)
                {
                    fingerprints.push(fpr.to_string());
                }
            }
            Some("IMPORT_RES") => {
                let counts: Vec<u32> = words.map(|w| w.parse().unwrap_or(0)).collect();
                let count = |i: usize| counts.get(i).copied().unwrap_or(0);
                result = Some(ImportResult {
                    considered: count(0),
                    imported: count(2),
                    unchanged: count(4),
                    new_user_ids: count(5),
                    new_subkeys: count(6),
                    new_signatures: count(7),
                    new_revocations: count(8),
                    secret_read: count(9),
                    secret_imported: count(10),
                    secret_unchanged: count(11),
                    not_imported: count(13),
                    fingerprints: Vec::new(),
                });
            }
            _ => {}
        }
    }

    result.map(|mut r| {
        r.fingerprints = fingerprints;
        r
    })
}
