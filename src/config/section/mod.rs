//! Configuration section definitions.
//!
//! Each module corresponds to a section in `stowage.toml`:
//!
//! | Module      | TOML Section     | Purpose                                  |
//! |-------------|------------------|------------------------------------------|
//! | `assets`    | `[assets]`       | Asset rules: extensions, limits, names   |
//! | `build`     | `[build]`        | Source directories, manifest name        |
//! | `copy`      | `[[copy]]`       | Directories copied verbatim              |
//! | `output`    | `[output.*]`     | Output root and public path per mode     |
//! | `transform` | `[transform]`    | Exclusions, lint and compiler dispatch   |

pub mod assets;
mod build;
mod copy;
mod output;
pub mod transform;

pub use assets::{AssetsConfig, RuleConfig};
pub use build::BuildConfig;
pub use copy::CopyEntry;
pub use output::{OutputConfig, OutputTarget};
pub use transform::{ComponentConfig, LintConfig, ScriptConfig, TransformConfig};
