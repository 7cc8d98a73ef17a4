//! Path normalization utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `to_slash` - relative paths rendered with `/` separators
//! - `unsafe_component` - reject paths that escape their root

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Render a relative path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Describe the first component that would let `path` escape its root.
///
/// Returns `None` for plain relative paths.
pub fn unsafe_component(path: &Path) -> Option<&'static str> {
    path.components().find_map(|comp| match comp {
        Component::ParentDir => Some("parent directory '..' not allowed"),
        Component::Prefix(_) | Component::RootDir => Some("absolute paths not allowed"),
        _ => None,
    })
}
