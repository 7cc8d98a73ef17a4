//! `[output]` section configuration.
//!
//! One target per build mode. Emitted assets land under the target's
//! `root`, and references to them are rewritten to `public_path + path`.
//!
//! # Example
//!
//! ```toml
//! [output.development]
//! root = "dist"
//! public_path = "/"
//!
//! [output.production]
//! root = "build/static"
//! public_path = "https://cdn.example.com/app/"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::core::BuildMode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub development: OutputTarget,
    pub production: OutputTarget,
}

impl OutputConfig {
    const DEVELOPMENT: FieldPath = FieldPath::new("output.development.public_path");
    const PRODUCTION: FieldPath = FieldPath::new("output.production.public_path");

    /// Target selected by the build mode.
    pub fn target(&self, mode: BuildMode) -> &OutputTarget {
        match mode {
            BuildMode::Development => &self.development,
            BuildMode::Production => &self.production,
        }
    }

    /// Resolve relative roots against the project root.
    pub fn normalize(&mut self, root: &Path) {
        self.development.normalize(root);
        self.production.normalize(root);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (target, field) in [
            (&self.development, Self::DEVELOPMENT),
            (&self.production, Self::PRODUCTION),
        ] {
            if target.public_path.is_empty() {
                diag.error_with_hint(field, "public path is empty", "use \"/\" for the site root");
            } else if !target.public_path.ends_with('/') {
                diag.warn(
                    field,
                    format!("'{}' does not end with '/', one is appended", target.public_path),
                );
            }
        }
    }
}

/// Output root and public URL prefix for one build mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputTarget {
    /// Directory receiving emitted files (relative to the project root).
    pub root: PathBuf,
    /// Prefix of every emitted asset's public URL.
    pub public_path: String,
}

impl Default for OutputTarget {
    fn default() -> Self {
        Self {
            root: "dist".into(),
            public_path: "/".into(),
        }
    }
}

impl OutputTarget {
    pub fn normalize(&mut self, root: &Path) {
        if self.root.is_relative() {
            self.root = root.join(&self.root);
        }
    }

    /// Public URL of an emitted path.
    pub fn url_for(&self, path: &str) -> String {
        if self.public_path.ends_with('/') {
            format!("{}{}", self.public_path, path)
        } else {
            format!("{}/{}", self.public_path, path)
        }
    }
}
