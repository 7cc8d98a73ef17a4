//! Asset build orchestration.
//!
//! Build pipeline phases:
//! - **Init** - Resolve the active output target, optionally clean it
//! - **Collect** - Walk every asset source directory
//! - **Route** - Parallel routing through the per-build cache
//! - **Place** - Reject output collisions, then write emitted and
//!   pass-through files in parallel
//! - **Copy** - Verbatim `[[copy]]` directories
//! - **Finalize** - Manifest, summary

use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::asset::{
    AssetRouter, ContentHash, Disposition, Manifest, RouteCache, copy_dir, copy_file,
    write_emitted,
};
use crate::config::{OutputTarget, StowageConfig};
use crate::core::BuildMode;
use crate::logger::Tally;
use crate::utils::path::to_slash;
use crate::{debug, log};

/// Counter names, in summary order.
const COUNTERS: &[&str] = &["inlined", "emitted", "passed", "copied"];

/// Files never treated as assets.
const IGNORED_FILES: &[&str] = &[".DS_Store", "Thumbs.db", ".gitkeep"];

/// One file found under an asset source directory.
struct SourceFile {
    path: PathBuf,
    /// Relative to its source directory, `/`-separated.
    rel: String,
}

/// Build every asset for `mode`.
///
/// Pipeline: init -> collect -> route -> place -> copy -> finalize
pub fn build_assets(config: &StowageConfig, mode: BuildMode, clean: bool) -> Result<Manifest> {
    let target = config.output.target(mode);
    init_output(target, clean)?;
    log!("build"; "{} build into {}", mode, config.root_relative(&target.root).display());

    let files = collect_sources(&config.build.sources)?;
    debug!("build"; "{} asset files found", files.len());

    let router = AssetRouter::from_config(config)?;
    let cache = RouteCache::new(mode);
    let tally = Tally::new(COUNTERS);

    let routed = route_all(&router, &cache, &files, &tally)?;
    unique_outputs(&routed)?
        .par_iter()
        .try_for_each(|r| place(r, target, clean))?;

    for entry in &config.copy {
        let n = copy_entry(&entry.from, &target.root.join(&entry.to), clean)?;
        tally.add("copied", n);
    }

    let mut manifest = Manifest::new(mode);
    for r in routed {
        manifest.insert(r.file.rel.clone(), r.disposition);
    }
    manifest.write(&target.root.join(&config.build.manifest))?;

    tally.finish();
    Ok(manifest)
}

fn init_output(target: &OutputTarget, clean: bool) -> Result<()> {
    if clean && target.root.exists() {
        fs::remove_dir_all(&target.root)
            .with_context(|| format!("failed to clean {}", target.root.display()))?;
    }
    fs::create_dir_all(&target.root)
        .with_context(|| format!("failed to create {}", target.root.display()))
}

/// Walk source directories. Relative paths must be unique across sources.
fn collect_sources(sources: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();

    for source in sources {
        if !source.is_dir() {
            debug!("build"; "source {} missing, skipped", source.display());
            continue;
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(source)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(err) => {
                    debug!("build"; "skipped unreadable entry: {}", err);
                    None
                }
            })
            .filter(|e| {
                if e.file_type().is_symlink() {
                    debug!("build"; "skipped broken link {}", e.path().display());
                }
                e.file_type().is_file()
            })
            .filter(|e| {
                let name = e.file_name().to_str().unwrap_or_default();
                !IGNORED_FILES.contains(&name)
            })
            .map(|e| e.path())
            .collect();
        paths.sort();

        for path in paths {
            let rel = to_slash(path.strip_prefix(source).unwrap_or(&path));
            if let Some(first) = seen.insert(rel.clone(), path.clone()) {
                bail!(
                    "asset `{rel}` found in two sources: {} and {}",
                    first.display(),
                    path.display()
                );
            }
            files.push(SourceFile { path, rel });
        }
    }

    Ok(files)
}

/// One routed source file.
struct Routed<'a> {
    file: &'a SourceFile,
    disposition: Disposition,
    digest: ContentHash,
    /// Bytes still to be written, kept for emitted files only.
    contents: Option<Vec<u8>>,
}

impl Routed<'_> {
    /// Output path relative to the root, if anything is written.
    fn output_path(&self) -> Option<&str> {
        match &self.disposition {
            Disposition::Inline(_) => None,
            Disposition::Emit(emitted) => Some(emitted.path.as_str()),
            Disposition::PassThrough { path } => Some(path.as_str()),
        }
    }
}

/// Route every file in parallel. The first failure aborts.
fn route_all<'a>(
    router: &AssetRouter,
    cache: &RouteCache,
    files: &'a [SourceFile],
    tally: &Tally,
) -> Result<Vec<Routed<'a>>> {
    files
        .par_iter()
        .map(|file| {
            let contents = fs::read(&file.path)
                .with_context(|| format!("failed to read {}", file.path.display()))?;
            let size = i64::try_from(contents.len()).unwrap_or(i64::MAX);

            let disposition = cache
                .route_file(router, &file.rel, size, &contents)
                .with_context(|| format!("failed to route {}", file.path.display()))?;

            tally.inc(disposition.label());
            debug!("route"; "{} -> {}", file.rel, disposition.label());

            Ok(Routed {
                file,
                digest: ContentHash::of(&contents),
                contents: disposition.as_emit().is_some().then_some(contents),
                disposition,
            })
        })
        .collect()
}

/// One entry per output path.
///
/// Sources sharing an output path must have identical bytes; any other
/// overlap would leave the file to whichever writer finishes last.
fn unique_outputs<'r, 'a>(routed: &'r [Routed<'a>]) -> Result<Vec<&'r Routed<'a>>> {
    let mut owners: FxHashMap<&str, &Routed> = FxHashMap::default();
    let mut unique = Vec::with_capacity(routed.len());

    for r in routed {
        let Some(path) = r.output_path() else {
            continue;
        };
        match owners.entry(path) {
            Entry::Occupied(slot) => {
                let owner = *slot.get();
                if owner.digest != r.digest {
                    bail!(
                        "`{}` and `{}` both route to `{path}` with different contents",
                        owner.file.rel,
                        r.file.rel
                    );
                }
                debug!("route"; "{} shares {} with {}", r.file.rel, path, owner.file.rel);
            }
            Entry::Vacant(slot) => {
                slot.insert(r);
                unique.push(r);
            }
        }
    }

    Ok(unique)
}

fn place(routed: &Routed, target: &OutputTarget, clean: bool) -> Result<()> {
    match &routed.disposition {
        Disposition::Inline(_) => {}
        Disposition::Emit(emitted) => {
            write_emitted(emitted, routed.contents.as_deref().unwrap_or_default(), clean)?;
        }
        Disposition::PassThrough { path } => {
            copy_file(&routed.file.path, &target.root.join(path), clean)?;
        }
    }
    Ok(())
}

/// Copy one `[[copy]]` entry. Missing sources are skipped.
fn copy_entry(from: &Path, to: &Path, clean: bool) -> Result<usize> {
    if from.is_dir() {
        copy_dir(from, to, clean)
    } else if from.is_file() {
        Ok(usize::from(copy_file(from, to, clean)?))
    } else {
        debug!("copy"; "{} missing, skipped", from.display());
        Ok(0)
    }
}
