//! Core types - pure abstractions shared across the codebase.

mod mode;

pub use mode::BuildMode;
