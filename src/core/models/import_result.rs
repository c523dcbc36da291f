use serde::Serialize;

/// Outcome of a key import, as counted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportResult {
    pub considered: u32,
    pub imported: u32,
    pub unchanged: u32,
    pub new_user_ids: u32,
    pub new_subkeys: u32,
    pub new_signatures: u32,
    pub new_revocations: u32,
    pub secret_read: u32,
    pub secret_imported: u32,
    pub secret_unchanged: u32,
    pub not_imported: u32,
    /// Fingerprints of every key the engine touched.
    pub fingerprints: Vec<String>,
}

impl ImportResult {
    /// True when at least one key was new or changed.
    pub fn changed_anything(&self) -> bool {
        self.imported > 0
            || self.new_user_ids > 0
            || self.new_subkeys > 0
            || self.new_signatures > 0
            || self.new_revocations > 0
            || self.secret_imported > 0
    }
}

impl std::fmt::Display for ImportResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} processed, {} imported, {} unchanged",
            self.considered, self.imported, self.unchanged
        )?;
        if self.secret_read > 0 {
            write!(f, ", {} secret imported", self.secret_imported)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_import_reports_no_change() {
        let result = ImportResult {
            considered: 1,
            unchanged: 1,
            ..Default::default()
        };
        assert!(!result.changed_anything());
        assert_eq!(result.to_string(), "1 processed, 0 imported, 1 unchanged");
    }

    #[test]
    fn new_signature_counts_as_change() {
        let result = ImportResult {
            considered: 1,
            new_signatures: 2,
            ..Default::default()
        };
        assert!(result.changed_anything());
    }
}
