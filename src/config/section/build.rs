//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! sources = ["src/assets", "src/images"]   # scanned for assets (relative to project root)
//! manifest = "asset-manifest.json"         # written under the output root
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directories scanned for assets.
    pub sources: Vec<PathBuf>,

    /// Manifest file name, relative to the output root.
    pub manifest: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            sources: vec!["src/assets".into()],
            manifest: "asset-manifest.json".into(),
        }
    }
}

impl BuildConfig {
    const SOURCES: FieldPath = FieldPath::new("build.sources");
    const MANIFEST: FieldPath = FieldPath::new("build.manifest");

    pub fn normalize(&mut self, root: &Path) {
        for source in &mut self.sources {
            if source.is_relative() {
                *source = root.join(&*source);
            }
        }
    }

    /// Validate after normalization.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, source) in self.sources.iter().enumerate() {
            if source.exists() && !source.is_dir() {
                diag.error(
                    Self::SOURCES,
                    format!("[{idx}] '{}' must be a directory", source.display()),
                );
            }
        }

        if self.manifest.is_empty() || self.manifest.contains(['/', '\\']) {
            diag.error_with_hint(
                Self::MANIFEST,
                format!("invalid manifest name '{}'", self.manifest),
                "use a plain file name such as \"asset-manifest.json\"",
            );
        }
    }
}
