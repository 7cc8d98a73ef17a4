//! Command-line interface module.

mod args;
pub mod build;
pub mod plan;
pub mod route;

pub use args::{Cli, Commands, ModeArgs};

use std::path::{Path, PathBuf};

use crate::config::StowageConfig;
use crate::utils::path::{normalize_path, to_slash};

/// Path as routed: relative to the project root when inside it, `/`-separated.
fn project_path(config: &StowageConfig, cwd: &Path, path: &Path) -> (PathBuf, String) {
    let abs = normalize_path(&cwd.join(path));
    let rel = to_slash(&config.root_relative(&abs));
    (abs, rel)
}
