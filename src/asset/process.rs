//! Asset placement with side effects (writing, copying).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::freshness::needs_copy;

use super::route::EmittedAsset;

/// Write an emitted asset at its output location.
///
/// An existing file is left alone when its name is content-addressed or
/// its bytes already match. Returns whether the file was written.
pub fn write_emitted(emitted: &EmittedAsset, contents: &[u8], clean: bool) -> Result<bool> {
    let dest = &emitted.location.absolute_path;
    if !clean && dest.exists() {
        if emitted.content_addressed {
            return Ok(false);
        }
        if fs::read(dest).is_ok_and(|existing| existing == contents) {
            return Ok(false);
        }
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(dest, contents).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(true)
}

/// Copy a file verbatim, skipping fresh destinations.
///
/// Returns whether the file was copied.
pub fn copy_file(source: &Path, dest: &Path, clean: bool) -> Result<bool> {
    if !needs_copy(source, dest, clean) {
        return Ok(false);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::copy(source, dest)
        .with_context(|| format!("failed to copy {} to {}", source.display(), dest.display()))?;
    Ok(true)
}

/// Recursively copy directory contents.
///
/// Returns the number of files copied.
pub fn copy_dir(src_dir: &Path, dest_dir: &Path, clean: bool) -> Result<usize> {
    let mut count = 0;
    copy_dir_recursive(src_dir, dest_dir, clean, &mut count)?;
    Ok(count)
}

fn copy_dir_recursive(src_dir: &Path, dest_dir: &Path, clean: bool, count: &mut usize) -> Result<()> {
    let entries =
        fs::read_dir(src_dir).with_context(|| format!("failed to read {}", src_dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest_dir.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path, clean, count)?;
        } else if copy_file(&src_path, &dest_path, clean)? {
            *count += 1;
        }
    }

    Ok(())
}
