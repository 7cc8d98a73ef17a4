//! Utility modules shared by routing and the build host.

pub mod mime;
pub mod path;
