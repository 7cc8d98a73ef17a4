//! Router configuration management for `stowage.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets] + [[assets.rules]]
//! │   ├── build      # [build]
//! │   ├── copy       # [[copy]]
//! │   ├── output     # [output.development] / [output.production]
//! │   └── transform  # [transform]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # StowageConfig (this file)
//! ```
//!
//! Loading order: parse → path safety checks → normalize against the
//! project root → full validation. Every section reports into one
//! `ConfigDiagnostics`, so all problems surface in a single run.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    AssetsConfig, BuildConfig, ComponentConfig, CopyEntry, LintConfig, OutputConfig,
    OutputTarget, RuleConfig, ScriptConfig, TransformConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, Severity};

use crate::{debug, log};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "stowage.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing stowage.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StowageConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Output roots and public paths per build mode
    #[serde(default)]
    pub output: OutputConfig,

    /// Asset source directories and manifest
    #[serde(default)]
    pub build: BuildConfig,

    /// Asset routing rules
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Transform dispatch
    #[serde(default)]
    pub transform: TransformConfig,

    /// Verbatim directory copies
    #[serde(default = "CopyEntry::defaults")]
    pub copy: Vec<CopyEntry>,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            config_path: None,
            root: PathBuf::new(),
            output: OutputConfig::default(),
            build: BuildConfig::default(),
            assets: AssetsConfig::default(),
            transform: TransformConfig::default(),
            copy: CopyEntry::defaults(),
        }
    }
}

impl StowageConfig {
    /// Load configuration.
    ///
    /// `explicit` is a path given on the command line and must exist.
    /// Otherwise `stowage.toml` is searched upward from `cwd`; when none is
    /// found the built-in defaults apply with `cwd` as project root.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        let found = match explicit {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    cwd.join(path)
                };
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => find_config_file(Path::new(CONFIG_FILE), cwd),
        };

        let (mut config, root) = match found {
            Some(path) => {
                let config = Self::from_path(&path)?;
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                debug!("config"; "using {}", path.display());
                (Self { config_path: Some(path), ..config }, root)
            }
            None => {
                debug!("config"; "no {} found, using defaults", CONFIG_FILE);
                (Self::default(), cwd.to_path_buf())
            }
        };

        // Validate raw paths before normalization
        config.validate_paths()?;

        config.finalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve every relative path against the project root.
    fn finalize(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        self.output.normalize(root);
        self.build.normalize(root);
        for entry in &mut self.copy {
            entry.normalize(root);
        }
    }

    /// Path safety checks that only make sense before normalization.
    fn validate_paths(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        CopyEntry::validate_paths(&self.copy, &mut diag);
        diag.into_result().map_err(ConfigError::Rejected)
    }

    /// Full validation after normalization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.output.validate(&mut diag);
        self.build.validate(&mut diag);
        self.assets.validate(&mut diag);
        self.transform.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Rejected)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// tests
// ============================================================================
