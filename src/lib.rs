//! Stowage - an asset router for front-end builds.
//!
//! Small files are inlined as data URLs, larger ones are emitted under
//! content-hashed names, everything else passes through untouched.

pub mod asset;
pub mod cli;
pub mod config;
pub mod core;
pub mod freshness;
pub mod logger;
pub mod transform;
pub mod utils;
