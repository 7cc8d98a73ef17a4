//! `[assets]` section configuration.
//!
//! Declares the ordered rule table the router evaluates first-match-wins.
//! Leaving `rules` out keeps the built-in images/media/fonts table.
//!
//! # Example
//!
//! ```toml
//! [assets]
//! subdirectory = "static"       # prefix for every emitted path
//! limit = 10000                 # default inline threshold (bytes)
//!
//! [[assets.rules]]
//! name = "images"
//! extensions = ["png", "jpg", "jpeg", "gif", "svg"]
//! dir = "images"
//! template = "[name].[hash:7].[ext]"
//! limit = 4096                  # overrides `assets.limit` for this rule
//! ```

use rustc_hash::FxHashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asset::OutputTemplate;
use crate::config::{ConfigDiagnostics, FieldPath};
use crate::utils::path::unsafe_component;

/// Inline threshold shared by the built-in rules.
pub const DEFAULT_LIMIT: u64 = 10_000;

const DEFAULT_TEMPLATE: &str = "[name].[hash:7].[ext]";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory prepended to every emitted path (empty = none).
    pub subdirectory: String,

    /// Inline threshold for rules without their own `limit`.
    pub limit: u64,

    /// Ordered rule table.
    pub rules: Vec<RuleConfig>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            subdirectory: String::new(),
            limit: DEFAULT_LIMIT,
            rules: RuleConfig::defaults(),
        }
    }
}

impl AssetsConfig {
    pub const SUBDIRECTORY: FieldPath = FieldPath::new("assets.subdirectory");
    pub const RULES: FieldPath = FieldPath::new("assets.rules");

    /// Effective threshold of a rule.
    pub fn limit_for(&self, rule: &RuleConfig) -> u64 {
        rule.limit.unwrap_or(self.limit)
    }

    /// Validate the rule table.
    ///
    /// Checks:
    /// - rule names are unique and non-empty
    /// - extension lists are non-empty, dot-free, and pairwise disjoint
    /// - templates parse
    /// - `dir` and `subdirectory` stay inside the output root
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if let Some(reason) = unsafe_component(Path::new(&self.subdirectory)) {
            diag.error(
                Self::SUBDIRECTORY,
                format!("'{}': {reason}", self.subdirectory),
            );
        }

        if self.rules.is_empty() {
            diag.warn(Self::RULES, "no rules, every asset is passed through");
        }

        let mut names: FxHashMap<&str, usize> = FxHashMap::default();
        let mut owners: FxHashMap<&str, usize> = FxHashMap::default();

        for (idx, rule) in self.rules.iter().enumerate() {
            if rule.name.is_empty() {
                diag.error(Self::RULES, format!("[{idx}] rule name is empty"));
            } else if let Some(prev) = names.insert(&rule.name, idx) {
                diag.error(
                    Self::RULES,
                    format!("[{idx}] rule name '{}' already used by [{prev}]", rule.name),
                );
            }

            if rule.extensions.is_empty() {
                diag.error(Self::RULES, format!("[{idx}] '{}' has no extensions", rule.name));
            }

            for ext in &rule.extensions {
                if ext.is_empty() || ext.contains('.') {
                    diag.error_with_hint(
                        Self::RULES,
                        format!("[{idx}] invalid extension '{ext}'"),
                        "write extensions without dots, e.g. \"png\"",
                    );
                    continue;
                }
                match owners.get(ext.as_str()) {
                    Some(&prev) if prev != idx => diag.error_with_hint(
                        Self::RULES,
                        format!(
                            "[{idx}] extension '{ext}' already claimed by '{}'",
                            self.rules[prev].name
                        ),
                        "each extension may belong to one rule only",
                    ),
                    Some(_) => {}
                    None => {
                        owners.insert(ext, idx);
                    }
                }
            }

            if let Err(e) = OutputTemplate::parse(&rule.template) {
                diag.error(
                    Self::RULES,
                    format!("[{idx}] template '{}': {e}", rule.template),
                );
            }

            if let Some(reason) = unsafe_component(Path::new(&rule.dir)) {
                diag.error(Self::RULES, format!("[{idx}] dir '{}': {reason}", rule.dir));
            }
        }
    }
}

// ============================================================================
// Rule Entry
// ============================================================================

/// One `[[assets.rules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule name, used in logs and the manifest.
    pub name: String,

    /// Extensions without the dot. Matched case-sensitively.
    pub extensions: Vec<String>,

    /// Output subdirectory for emitted files.
    pub dir: String,

    /// File name template.
    #[serde(default = "default_template")]
    pub template: String,

    /// Inline threshold in bytes (falls back to `assets.limit`).
    #[serde(default)]
    pub limit: Option<u64>,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl RuleConfig {
    pub fn new(name: &str, extensions: &[&str], dir: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
            dir: dir.to_string(),
            template: default_template(),
            limit: None,
        }
    }

    /// The images / media / fonts table.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("images", &["png", "jpg", "jpeg", "gif", "svg"], "images"),
            Self::new(
                "media",
                &["mp4", "webm", "ogg", "mp3", "wav", "flac", "aac"],
                "media",
            ),
            Self::new("fonts", &["woff", "woff2", "eot", "ttf", "otf"], "fonts"),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: &AssetsConfig) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        diag
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AssetsConfig::default();
        assert_eq!(config.rules.len(), 3);
        assert!(config.rules.iter().all(|r| config.limit_for(r) == 10_000));
        assert!(!validate(&config).has_errors());
    }

    #[test]
    fn test_rule_limit_override() {
        let config: AssetsConfig = toml::from_str(
            r#"
limit = 2048

[[rules]]
name = "images"
extensions = ["png"]
dir = "img"
limit = 512

[[rules]]
name = "fonts"
extensions = ["woff2"]
dir = "fonts"
"#,
        )
        .unwrap();

        assert_eq!(config.limit_for(&config.rules[0]), 512);
        assert_eq!(config.limit_for(&config.rules[1]), 2048);
        assert_eq!(config.rules[1].template, "[name].[hash:7].[ext]");
    }

    #[test]
    fn test_overlapping_extensions_rejected() {
        let mut config = AssetsConfig::default();
        config.rules.push(RuleConfig::new("vectors", &["svg"], "vectors"));

        let diag = validate(&config);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("'svg' already claimed by 'images'"));
    }

    #[test]
    fn test_duplicate_extension_within_rule_allowed() {
        let mut config = AssetsConfig::default();
        config.rules[0].extensions.push("png".into());
        assert!(!validate(&config).has_errors());
    }

    #[test]
    fn test_invalid_entries() {
        let mut config = AssetsConfig::default();
        config.subdirectory = "../up".into();
        config.rules[0].extensions.push(".webp".into());
        config.rules[1].template = "[name].[sha].[ext]".into();
        config.rules[2].dir = "/fonts".into();
        config.rules.push(RuleConfig::new("fonts", &[], "more"));

        let diag = validate(&config);
        // subdirectory, dotted ext, template, absolute dir, duplicate name, empty ext list
        assert_eq!(diag.len(), 6);
    }
}
