//! Build manifest: one entry per routed asset.
//!
//! Written as JSON under the output root so the bundling side can
//! substitute references without re-routing.
//!
//! ```json
//! {
//!   "mode": "production",
//!   "assets": {
//!     "images/hero.png": { "kind": "emit", "rule": "images", "path": "images/hero.a1b2c3d.png", ... },
//!     "images/logo.svg": { "kind": "inline", "rule": "images", "mime": "image/svg+xml", ... },
//!     "robots.txt":      { "kind": "pass_through", "path": "robots.txt" }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::BuildMode;

use super::route::Disposition;

#[derive(Debug, Serialize)]
pub struct Manifest {
    pub mode: BuildMode,
    /// Keyed by source path relative to its asset directory; sorted for stable output.
    pub assets: BTreeMap<String, Disposition>,
}

impl Manifest {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            assets: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, source: String, disposition: Disposition) {
        self.assets.insert(source, disposition);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize manifest")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = Manifest::new(BuildMode::Production);
        manifest.insert(
            "robots.txt".into(),
            Disposition::PassThrough {
                path: "robots.txt".into(),
            },
        );

        let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
        assert_eq!(value["mode"], "production");
        assert_eq!(value["assets"]["robots.txt"]["kind"], "pass_through");
        assert_eq!(value["assets"]["robots.txt"]["path"], "robots.txt");
    }
}
