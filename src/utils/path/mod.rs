//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `to_slash`)
//! - [`asset`]: Asset path parsing (`split_query`, `file_parts`)

pub mod asset;
pub mod fs;

pub use asset::{file_parts, split_query};
pub use fs::{normalize_path, to_slash, unsafe_component};
