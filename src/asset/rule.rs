//! Compiled asset rules.

use rustc_hash::FxHashSet;

use crate::config::{AssetsConfig, RuleConfig};

use super::template::{OutputTemplate, TemplateError};

/// One routing rule, immutable for the duration of a build.
#[derive(Debug, Clone)]
pub struct AssetRule {
    /// Rule name (`images`, `media`, `fonts`, ...).
    pub name: String,
    extensions: FxHashSet<String>,
    /// Assets strictly smaller than this are inlined.
    pub limit: u64,
    pub template: OutputTemplate,
    /// Output subdirectory of emitted files.
    pub dir: String,
}

impl AssetRule {
    pub fn new(
        name: impl Into<String>,
        extensions: &[&str],
        limit: u64,
        template: OutputTemplate,
        dir: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
            limit,
            template,
            dir: dir.into(),
        }
    }

    /// Compile a `[[assets.rules]]` entry.
    pub fn from_config(rule: &RuleConfig, assets: &AssetsConfig) -> Result<Self, TemplateError> {
        Ok(Self {
            name: rule.name.clone(),
            extensions: rule.extensions.iter().cloned().collect(),
            limit: assets.limit_for(rule),
            template: OutputTemplate::parse(&rule.template)?,
            dir: rule.dir.clone(),
        })
    }

    /// Case-sensitive extension match.
    #[inline]
    pub fn matches(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    /// Whether an asset of `size` bytes is inlined.
    #[inline]
    pub fn inlines(&self, size: u64) -> bool {
        size < self.limit
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}
