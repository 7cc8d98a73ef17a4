//! `[transform]` section configuration.
//!
//! Decides which external tool a script or component file is handed to.
//! The tools themselves are not run here.
//!
//! # Example
//!
//! ```toml
//! [transform]
//! # Pre-built bundles skipped by every compiler (regex over the path)
//! exclude = ['(^|/)jquery\.min\.js$', '(^|/)echarts\.min\.js$']
//!
//! [transform.lint]
//! enable = true
//! extensions = ["js", "vue"]
//! include = ["src", "test", "static"]
//! exclude = "node_modules"
//!
//! [transform.script]
//! extensions = ["js"]
//! exclude = "node_modules"
//! keep = '\.vue\.js'          # compiled anyway when `exclude` matched
//!
//! [transform.component]
//! extensions = ["vue"]
//! ```

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Exclusion patterns. A match bypasses every compiler.
    pub exclude: Vec<String>,
    pub lint: LintConfig,
    pub script: ScriptConfig,
    pub component: ComponentConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                r"(^|/)jquery\.min\.js$".into(),
                r"(^|/)echarts\.min\.js$".into(),
            ],
            lint: LintConfig::default(),
            script: ScriptConfig::default(),
            component: ComponentConfig::default(),
        }
    }
}

impl TransformConfig {
    pub const EXCLUDE: FieldPath = FieldPath::new("transform.exclude");
    pub const LINT_EXCLUDE: FieldPath = FieldPath::new("transform.lint.exclude");
    pub const SCRIPT_EXCLUDE: FieldPath = FieldPath::new("transform.script.exclude");
    pub const SCRIPT_KEEP: FieldPath = FieldPath::new("transform.script.keep");
    pub const SCRIPT_EXTENSIONS: FieldPath = FieldPath::new("transform.script.extensions");

    /// Check that every pattern compiles and compiler extensions don't overlap.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, pattern) in self.exclude.iter().enumerate() {
            check_pattern(pattern, Self::EXCLUDE, Some(idx), diag);
        }
        for (pattern, field) in [
            (&self.lint.exclude, Self::LINT_EXCLUDE),
            (&self.script.exclude, Self::SCRIPT_EXCLUDE),
            (&self.script.keep, Self::SCRIPT_KEEP),
        ] {
            if let Some(pattern) = pattern {
                check_pattern(pattern, field, None, diag);
            }
        }

        for ext in &self.script.extensions {
            if self.component.extensions.contains(ext) {
                diag.error(
                    Self::SCRIPT_EXTENSIONS,
                    format!("'{ext}' is also a component extension"),
                );
            }
        }
    }
}

fn check_pattern(pattern: &str, field: FieldPath, idx: Option<usize>, diag: &mut ConfigDiagnostics) {
    if let Err(e) = Regex::new(pattern) {
        let prefix = idx.map(|i| format!("[{i}] ")).unwrap_or_default();
        diag.error(field, format!("{prefix}invalid pattern '{pattern}': {e}"));
    }
}

/// Linter dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub enable: bool,
    pub extensions: Vec<String>,
    /// Only paths under these directories are linted (relative, `/`-separated).
    pub include: Vec<PathBuf>,
    pub exclude: Option<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enable: true,
            extensions: vec!["js".into(), "vue".into()],
            include: vec!["src".into(), "test".into(), "static".into()],
            exclude: Some("node_modules".into()),
        }
    }
}

/// Script compiler dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    pub extensions: Vec<String>,
    pub exclude: Option<String>,
    /// Re-includes paths matched by `exclude`.
    pub keep: Option<String>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["js".into()],
            exclude: Some("node_modules".into()),
            keep: Some(r"\.vue\.js".into()),
        }
    }
}

/// Single-file-component compiler dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentConfig {
    pub extensions: Vec<String>,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["vue".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let mut diag = ConfigDiagnostics::new();
        TransformConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_invalid_patterns() {
        let config: TransformConfig = toml::from_str(
            r#"
exclude = ['vendor/.*\.js$', '(unclosed']

[script]
keep = '[bad'
"#,
        )
        .unwrap();

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 2);
        assert!(diag.errors()[0].message.starts_with("[1] invalid pattern"));
    }

    #[test]
    fn test_overlapping_compiler_extensions() {
        let mut config = TransformConfig::default();
        config.script.extensions.push("vue".into());

        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert_eq!(diag.len(), 1);
    }
}
