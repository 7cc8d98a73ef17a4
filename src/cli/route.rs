//! `stowage route`: print the disposition of individual files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::asset::{AssetRouter, Disposition};
use crate::config::StowageConfig;
use crate::core::BuildMode;

use super::project_path;

pub fn run_route(config: &StowageConfig, mode: BuildMode, cwd: &Path, paths: &[PathBuf]) -> Result<()> {
    let router = AssetRouter::from_config(config)?;

    for path in paths {
        let (abs, rel) = project_path(config, cwd, path);
        let contents = fs::read(&abs).with_context(|| format!("failed to read {}", abs.display()))?;
        let size = i64::try_from(contents.len()).unwrap_or(i64::MAX);

        let disposition = router
            .route_file(&rel, size, &contents, mode)
            .with_context(|| format!("failed to route {}", abs.display()))?;
        println!("{}", describe(&rel, contents.len(), &disposition));
    }

    Ok(())
}

/// One line per file. Inline payloads are summarized, not printed.
fn describe(rel: &str, size: usize, disposition: &Disposition) -> String {
    match disposition {
        Disposition::Inline(inline) => {
            format!("{rel}: inline [{}] {} ({size} bytes)", inline.rule, inline.mime)
        }
        Disposition::Emit(emitted) => {
            format!("{rel}: emit [{}] {} -> {}", emitted.rule, emitted.path, emitted.url)
        }
        Disposition::PassThrough { path } => format!("{rel}: pass through {path}"),
    }
}
