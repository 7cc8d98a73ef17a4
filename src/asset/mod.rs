//! Asset routing and placement.
//!
//! Pure decision logic lives in [`AssetRouter`]; everything that touches
//! the filesystem lives in `process` and `manifest`.

mod cache;
mod exclude;
mod hash;
mod manifest;
mod process;
mod route;
mod router;
mod rule;
mod template;

// Types
pub use hash::ContentHash;
pub use route::{Disposition, EmittedAsset, Encoding, InlineAsset, OutputLocation};
pub use rule::AssetRule;
pub use template::{OutputTemplate, TemplateError};

// Routing (pure functions)
pub use exclude::ExclusionSet;
pub use router::{AssetRouter, CompileError, RouteError};

// Per-build memo
pub use cache::RouteCache;

// Processing (side effects)
pub use manifest::Manifest;
pub use process::{copy_dir, copy_file, write_emitted};
