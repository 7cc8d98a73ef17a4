//! `stowage plan`: print the transform dispatch for each path.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::StowageConfig;
use crate::transform::TransformDispatch;

use super::project_path;

pub fn run_plan(config: &StowageConfig, cwd: &Path, paths: &[PathBuf]) -> Result<()> {
    let dispatch = TransformDispatch::from_config(&config.transform)?;

    for path in paths {
        let (_, rel) = project_path(config, cwd, path);
        println!("{rel}: {}", dispatch.plan(&rel));
    }

    Ok(())
}
