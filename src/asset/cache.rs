//! Per-build memo of routing results.
//!
//! Each asset is routed the first time it is seen; later lookups return the
//! stored disposition. The cache lives for one build and is bound to that
//! build's mode, so a restart (new cache) is the only way to recompute.

use dashmap::DashMap;

use crate::core::BuildMode;

use super::route::Disposition;
use super::router::{AssetRouter, RouteError};

pub struct RouteCache {
    mode: BuildMode,
    entries: DashMap<String, Disposition>,
}

impl RouteCache {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            entries: DashMap::new(),
        }
    }

    pub const fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Route a file on disk through the cache.
    ///
    /// Errors are not cached: a failing asset aborts the build anyway.
    pub fn route_file(
        &self,
        router: &AssetRouter,
        asset_path: &str,
        size: i64,
        contents: &[u8],
    ) -> Result<Disposition, RouteError> {
        if let Some(hit) = self.entries.get(asset_path) {
            return Ok(hit.clone());
        }

        let disposition = router.route_file(asset_path, size, contents, self.mode)?;
        self.entries
            .insert(asset_path.to_string(), disposition.clone());
        Ok(disposition)
    }

    pub fn get(&self, asset_path: &str) -> Option<Disposition> {
        self.entries.get(asset_path).map(|d| d.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
