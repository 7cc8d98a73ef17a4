//! Transform dispatch: which external tool a source file would be handed to.
//!
//! Only the decision is made here. Linters and compilers are never run.
//!
//! ```text
//! vendor/jquery.min.js         ──▶ excluded (no lint, no compiler)
//! src/App.vue                  ──▶ lint + component
//! node_modules/x/index.js      ──▶ script skipped
//! node_modules/x/Foo.vue.js    ──▶ script (kept)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::asset::ExclusionSet;
use crate::config::{FieldPath, TransformConfig};
use crate::utils::path::{file_parts, split_query};

#[derive(Debug, Error)]
#[error("invalid pattern in `{}`: {source}", .field.as_str())]
pub struct PatternError {
    field: FieldPath,
    #[source]
    source: regex::Error,
}

/// Compiler a file would be handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compiler {
    Script,
    Component,
}

impl Compiler {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Component => "component",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch decision for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TransformPlan {
    pub excluded: bool,
    pub lint: bool,
    pub compiler: Option<Compiler>,
}

impl TransformPlan {
    const EXCLUDED: Self = Self {
        excluded: true,
        lint: false,
        compiler: None,
    };

    /// True if no tool would touch the file.
    pub const fn is_noop(&self) -> bool {
        !self.lint && self.compiler.is_none()
    }
}

impl fmt::Display for TransformPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.excluded {
            return f.write_str("excluded");
        }
        let mut parts = Vec::with_capacity(2);
        if self.lint {
            parts.push("lint");
        }
        if let Some(compiler) = self.compiler {
            parts.push(compiler.as_str());
        }
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join(" + "))
        }
    }
}

#[derive(Debug, Clone)]
struct Lint {
    extensions: Vec<String>,
    include: Vec<PathBuf>,
    exclude: Option<Regex>,
}

#[derive(Debug, Clone)]
struct Script {
    extensions: Vec<String>,
    exclude: Option<Regex>,
    keep: Option<Regex>,
}

/// Compiled `[transform]` tables.
#[derive(Debug, Clone)]
pub struct TransformDispatch {
    exclusions: ExclusionSet,
    lint: Option<Lint>,
    script: Script,
    component: Vec<String>,
}

impl TransformDispatch {
    pub fn from_config(config: &TransformConfig) -> Result<Self, PatternError> {
        let exclusions = ExclusionSet::new(&config.exclude).map_err(|source| PatternError {
            field: TransformConfig::EXCLUDE,
            source,
        })?;

        let lint = config
            .lint
            .enable
            .then(|| -> Result<Lint, PatternError> {
                Ok(Lint {
                    extensions: config.lint.extensions.clone(),
                    include: config.lint.include.clone(),
                    exclude: compile(config.lint.exclude.as_deref(), TransformConfig::LINT_EXCLUDE)?,
                })
            })
            .transpose()?;

        let script = Script {
            extensions: config.script.extensions.clone(),
            exclude: compile(config.script.exclude.as_deref(), TransformConfig::SCRIPT_EXCLUDE)?,
            keep: compile(config.script.keep.as_deref(), TransformConfig::SCRIPT_KEEP)?,
        };

        Ok(Self {
            exclusions,
            lint,
            script,
            component: config.component.extensions.clone(),
        })
    }

    /// Decide which tools would process `path` (relative, `/`-separated).
    ///
    /// Exclusion is checked first and short-circuits everything else.
    pub fn plan(&self, path: &str) -> TransformPlan {
        let path = split_query(path).0;
        if self.exclusions.is_match(path) {
            return TransformPlan::EXCLUDED;
        }

        let Some((_, ext)) = file_parts(path) else {
            return TransformPlan::default();
        };

        TransformPlan {
            excluded: false,
            lint: self.lints(path, ext),
            compiler: self.compiler_for(path, ext),
        }
    }

    fn lints(&self, path: &str, ext: &str) -> bool {
        let Some(lint) = &self.lint else {
            return false;
        };
        if !lint.extensions.iter().any(|e| e == ext) {
            return false;
        }
        if lint.exclude.as_ref().is_some_and(|re| re.is_match(path)) {
            return false;
        }
        let rel = Path::new(path);
        lint.include.iter().any(|dir| rel.starts_with(dir))
    }

    fn compiler_for(&self, path: &str, ext: &str) -> Option<Compiler> {
        if self.component.iter().any(|e| e == ext) {
            return Some(Compiler::Component);
        }
        if !self.script.extensions.iter().any(|e| e == ext) {
            return None;
        }

        let excluded = self.script.exclude.as_ref().is_some_and(|re| re.is_match(path));
        let kept = self.script.keep.as_ref().is_some_and(|re| re.is_match(path));
        (!excluded || kept).then_some(Compiler::Script)
    }
}

fn compile(pattern: Option<&str>, field: FieldPath) -> Result<Option<Regex>, PatternError> {
    pattern
        .map(Regex::new)
        .transpose()
        .map_err(|source| PatternError { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch() -> TransformDispatch {
        TransformDispatch::from_config(&TransformConfig::default()).unwrap()
    }

    #[test]
    fn test_vendor_bundles_excluded() {
        let d = dispatch();
        for path in ["vendor/jquery.min.js", "static/js/echarts.min.js", "jquery.min.js"] {
            let plan = d.plan(path);
            assert!(plan.excluded, "{path}");
            assert!(plan.is_noop(), "{path}");
        }
        assert!(!d.plan("src/app.js").excluded);
        assert!(!d.plan("src/myjquery.min.js.map").excluded);
    }

    #[test]
    fn test_component_is_linted_and_compiled() {
        let plan = dispatch().plan("src/components/App.vue");
        assert_eq!(
            plan,
            TransformPlan {
                excluded: false,
                lint: true,
                compiler: Some(Compiler::Component),
            }
        );
        assert_eq!(plan.to_string(), "lint + component");
    }

    #[test]
    fn test_lint_only_under_include_dirs() {
        let d = dispatch();
        assert!(d.plan("test/unit/spec.js").lint);
        assert!(d.plan("static/js/app.js").lint);
        assert!(!d.plan("build/dev-server.js").lint);
        // Prefix must be a whole component
        assert!(!d.plan("srcs/app.js").lint);
    }

    #[test]
    fn test_node_modules_scripts() {
        let d = dispatch();
        let plain = d.plan("node_modules/lib/index.js");
        assert!(!plain.lint);
        assert_eq!(plain.compiler, None);

        let kept = d.plan("node_modules/ui/Button.vue.js");
        assert_eq!(kept.compiler, Some(Compiler::Script));
        assert!(!kept.lint);
    }

    #[test]
    fn test_unrelated_files() {
        let d = dispatch();
        assert_eq!(d.plan("src/style.css"), TransformPlan::default());
        assert_eq!(d.plan("src/Makefile"), TransformPlan::default());
        assert_eq!(d.plan("src/Makefile").to_string(), "none");
    }

    #[test]
    fn test_query_suffix_ignored() {
        assert_eq!(dispatch().plan("src/App.vue?type=script").compiler, Some(Compiler::Component));
    }

    #[test]
    fn test_lint_disabled() {
        let mut config = TransformConfig::default();
        config.lint.enable = false;
        let d = TransformDispatch::from_config(&config).unwrap();
        let plan = d.plan("src/app.js");
        assert!(!plan.lint);
        assert_eq!(plan.compiler, Some(Compiler::Script));
    }

    #[test]
    fn test_bad_pattern_names_field() {
        let mut config = TransformConfig::default();
        config.script.keep = Some("(".into());
        let err = TransformDispatch::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("transform.script.keep"));
    }
}
