//! Freshness detection for copied files.
//!
//! Content-addressed outputs never need this: an existing file with the
//! hashed name already holds the same bytes. Verbatim copies (pass-through
//! assets, `[[copy]]` directories) compare modification times instead.

pub mod mtime;

pub use mtime::{is_newer_than, needs_copy};
