//! Output file name templates.
//!
//! A template such as `[name].[hash:7].[ext]` is parsed once when the
//! configuration is loaded and rendered per asset.
//!
//! | Placeholder                    | Renders                               |
//! |--------------------------------|---------------------------------------|
//! | `[name]`                       | file name without its final extension |
//! | `[ext]`                        | extension, without the dot            |
//! | `[hash]` / `[contenthash]`     | first 20 hex chars of the content hash|
//! | `[hash:N]` / `[contenthash:N]` | first `N` hex chars, `1 <= N <= 64`   |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::hash::HEX_LEN;

/// Hash length used by `[hash]` without an explicit length.
pub const DEFAULT_HASH_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown placeholder `[{0}]`")]
    UnknownPlaceholder(String),

    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("invalid hash length `{0}` (expected 1..=64)")]
    HashLength(String),

    #[error("template must not contain path separators")]
    Separator,

    #[error("template is empty")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Ext,
    Hash(usize),
}

/// A parsed output file name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.is_empty() {
            return Err(TemplateError::Empty);
        }
        if source.contains(['/', '\\']) {
            return Err(TemplateError::Separator);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or(TemplateError::Unterminated(offset + open))?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Self::placeholder(&after[..close])?);

            let consumed = open + 1 + close + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    fn placeholder(token: &str) -> Result<Segment, TemplateError> {
        let (key, len) = match token.split_once(':') {
            Some((key, len)) => (key, Some(len)),
            None => (token, None),
        };

        match (key, len) {
            ("name", None) => Ok(Segment::Name),
            ("ext", None) => Ok(Segment::Ext),
            ("hash" | "contenthash", None) => Ok(Segment::Hash(DEFAULT_HASH_LEN)),
            ("hash" | "contenthash", Some(len)) => match len.parse::<usize>() {
                Ok(n) if (1..=HEX_LEN).contains(&n) => Ok(Segment::Hash(n)),
                _ => Err(TemplateError::HashLength(len.to_string())),
            },
            _ => Err(TemplateError::UnknownPlaceholder(token.to_string())),
        }
    }

    /// Longest hash prefix any placeholder needs (0 if the template has none).
    pub fn hash_len(&self) -> usize {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Hash(n) => Some(*n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Render a file name.
    ///
    /// `hash` must hold at least [`hash_len`](Self::hash_len) characters;
    /// shorter hashes are used whole.
    pub fn render(&self, name: &str, hash: &str, ext: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + name.len() + hash.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => out.push_str(name),
                Segment::Ext => out.push_str(ext),
                Segment::Hash(n) => out.push_str(&hash[..(*n).min(hash.len())]),
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for OutputTemplate {
    fn default() -> Self {
        Self {
            source: "[name].[hash:7].[ext]".to_string(),
            segments: vec![
                Segment::Name,
                Segment::Literal(".".to_string()),
                Segment::Hash(7),
                Segment::Literal(".".to_string()),
                Segment::Ext,
            ],
        }
    }
}

impl FromStr for OutputTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OutputTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
