//! `[[copy]]` entries: directories copied verbatim into the output root.
//!
//! ```toml
//! [[copy]]
//! from = "static/images"     # relative to project root
//! to = "static/images"       # relative to output root
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::unsafe_component;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyEntry {
    /// Source directory.
    pub from: PathBuf,
    /// Destination directory under the output root.
    pub to: PathBuf,
}

impl CopyEntry {
    pub const FIELD: FieldPath = FieldPath::new("copy");

    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Built-in entry: `static/images` → `static/images`.
    pub fn defaults() -> Vec<Self> {
        vec![Self::new("static/images", "static/images")]
    }

    /// Resolve `from` against the project root. `to` stays relative.
    pub fn normalize(&mut self, root: &Path) {
        if self.from.is_relative() {
            self.from = root.join(&self.from);
        }
    }

    /// Validate path safety before normalization.
    pub fn validate_paths(entries: &[Self], diag: &mut ConfigDiagnostics) {
        for (idx, entry) in entries.iter().enumerate() {
            if let Some(reason) = unsafe_component(&entry.from) {
                diag.error(
                    Self::FIELD,
                    format!("[{idx}] from '{}': {reason}", entry.from.display()),
                );
            }
            if let Some(reason) = unsafe_component(&entry.to) {
                diag.error(
                    Self::FIELD,
                    format!("[{idx}] to '{}': {reason}", entry.to.display()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_paths() {
        let entries = vec![
            CopyEntry::new("static/images", "static/images"),
            CopyEntry::new("../shared", "/abs"),
        ];
        let mut diag = ConfigDiagnostics::new();
        CopyEntry::validate_paths(&entries, &mut diag);
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_normalize_keeps_destination_relative() {
        let mut entry = CopyEntry::new("static/images", "img");
        entry.normalize(Path::new("/project"));
        assert_eq!(entry.from, PathBuf::from("/project/static/images"));
        assert_eq!(entry.to, PathBuf::from("img"));
    }
}
