//! Disposition: what happens to one routed asset.

use std::path::PathBuf;

use serde::Serialize;

/// Outcome of routing one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Disposition {
    /// Embed the bytes at the reference site. Nothing is written.
    Inline(InlineAsset),
    /// Write a standalone, content-addressed file and reference it by URL.
    Emit(EmittedAsset),
    /// No rule matched: copy verbatim under the original path.
    PassThrough { path: String },
}

impl Disposition {
    /// Name used in logs and counters.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Inline(_) => "inlined",
            Self::Emit(_) => "emitted",
            Self::PassThrough { .. } => "passed",
        }
    }

    pub fn as_emit(&self) -> Option<&EmittedAsset> {
        match self {
            Self::Emit(emitted) => Some(emitted),
            _ => None,
        }
    }

    pub fn as_inline(&self) -> Option<&InlineAsset> {
        match self {
            Self::Inline(inline) => Some(inline),
            _ => None,
        }
    }

    pub const fn is_pass_through(&self) -> bool {
        matches!(self, Self::PassThrough { .. })
    }
}

/// Encoding of inlined bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Base64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineAsset {
    /// Rule that matched.
    pub rule: String,
    pub encoding: Encoding,
    pub mime: &'static str,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedAsset {
    /// Rule that matched.
    pub rule: String,
    /// Path relative to the active output root, e.g. `images/hero.a1b2c3d.png`.
    pub path: String,
    /// Hash fragment embedded in the file name (empty if the template has none).
    pub hash: String,
    /// Where the bytes must be written.
    pub location: OutputLocation,
    /// Public URL substituted at the reference site.
    pub url: String,
    /// True if the file name embeds the content hash, so an existing file
    /// at `location` already holds these bytes.
    #[serde(skip)]
    pub content_addressed: bool,
}

/// Absolute output path of an emitted asset, derived from the active root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLocation {
    pub absolute_path: PathBuf,
}
