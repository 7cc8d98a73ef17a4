//! Build mode: the single process-wide configuration axis.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target environment of one build invocation.
///
/// Chosen once at startup and passed explicitly to every routing call.
/// Selects which output root and public path prefix are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Local development output.
    #[value(alias = "dev")]
    Development,
    /// Optimized output for deployment.
    #[value(alias = "prod")]
    Production,
}

impl BuildMode {
    /// Environment variable consulted when no mode is given on the command line.
    pub const ENV_VAR: &'static str = "NODE_ENV";

    /// Resolve mode from an optional `NODE_ENV`-style value.
    ///
    /// Only the exact value `production` selects production.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Read `NODE_ENV` once. Callers must thread the result, never re-read it.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var(Self::ENV_VAR).ok().as_deref())
    }

    #[inline]
    pub const fn is_dev(self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
