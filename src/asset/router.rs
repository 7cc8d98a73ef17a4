//! The asset router: classify one asset and decide its disposition.
//!
//! Routing is a pure function of the path, the declared size, the content
//! bytes, and the build mode, evaluated against immutable rule tables.
//! The router holds no mutable state and can be shared across threads.
//!
//! ```text
//! logo.svg    4 KiB  ──▶ images rule, under limit ──▶ Inline (data URL)
//! hero.png   52 KiB  ──▶ images rule, over limit  ──▶ Emit images/hero.a1b2c3d.png
//! data.txt    100 B  ──▶ no rule                  ──▶ PassThrough data.txt
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::config::{OutputConfig, StowageConfig};
use crate::core::BuildMode;
use crate::utils::mime;
use crate::utils::path::{file_parts, split_query};

use super::exclude::ExclusionSet;
use super::hash::ContentHash;
use super::route::{Disposition, EmittedAsset, Encoding, InlineAsset, OutputLocation};
use super::rule::AssetRule;
use super::template::TemplateError;

/// Routing failures. Both are caller bugs and abort the build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid asset path `{0}`: no file extension")]
    InvalidAssetPath(String),

    #[error("negative size {size} for asset `{path}`")]
    NegativeSize { path: String, size: i64 },
}

/// Errors compiling a validated configuration into rule tables.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("rule `{rule}`: {source}")]
    Template {
        rule: String,
        #[source]
        source: TemplateError,
    },

    #[error("transform exclusion patterns: {0}")]
    Exclusion(#[from] regex::Error),
}

/// Immutable rule tables plus the per-mode output targets.
#[derive(Debug, Clone)]
pub struct AssetRouter {
    rules: Vec<AssetRule>,
    exclusions: ExclusionSet,
    /// Prefix prepended to every emitted path (empty = none).
    subdirectory: String,
    output: OutputConfig,
}

impl AssetRouter {
    pub fn new(rules: Vec<AssetRule>, exclusions: ExclusionSet, output: OutputConfig) -> Self {
        Self {
            rules,
            exclusions,
            subdirectory: String::new(),
            output,
        }
    }

    /// Prefix every emitted path with `dir`.
    pub fn with_subdirectory(mut self, dir: impl Into<String>) -> Self {
        self.subdirectory = dir.into().trim_matches('/').to_string();
        self
    }

    /// Compile the rule tables of a loaded configuration.
    pub fn from_config(config: &StowageConfig) -> Result<Self, CompileError> {
        let rules = config
            .assets
            .rules
            .iter()
            .map(|rule| {
                AssetRule::from_config(rule, &config.assets).map_err(|source| {
                    CompileError::Template {
                        rule: rule.name.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let exclusions = ExclusionSet::new(&config.transform.exclude)?;

        Ok(Self::new(rules, exclusions, config.output.clone())
            .with_subdirectory(config.assets.subdirectory.as_str()))
    }

    pub fn rules(&self) -> &[AssetRule] {
        &self.rules
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// First rule claiming `ext`.
    pub fn rule_for(&self, ext: &str) -> Option<&AssetRule> {
        self.rules.iter().find(|rule| rule.matches(ext))
    }

    /// Route one asset reference.
    ///
    /// `asset_path` may carry a `?query` suffix, which is ignored for
    /// classification. `size` decides inline vs emit; `contents` feed the
    /// hash and the inline payload.
    pub fn route(
        &self,
        asset_path: &str,
        size: i64,
        contents: &[u8],
        mode: BuildMode,
    ) -> Result<Disposition, RouteError> {
        let (path, _query) = split_query(asset_path);
        self.classify(asset_path, path, size, contents, mode)
    }

    /// Route a file found on disk.
    ///
    /// `rel_path` is a `/`-separated file path, not a reference: `?` is an
    /// ordinary file name character here.
    pub fn route_file(
        &self,
        rel_path: &str,
        size: i64,
        contents: &[u8],
        mode: BuildMode,
    ) -> Result<Disposition, RouteError> {
        self.classify(rel_path, rel_path, size, contents, mode)
    }

    /// `path` is the classified form of `asset_path` (query removed or not).
    fn classify(
        &self,
        asset_path: &str,
        path: &str,
        size: i64,
        contents: &[u8],
        mode: BuildMode,
    ) -> Result<Disposition, RouteError> {
        let (name, ext) =
            file_parts(path).ok_or_else(|| RouteError::InvalidAssetPath(asset_path.to_string()))?;

        let size = u64::try_from(size).map_err(|_| RouteError::NegativeSize {
            path: asset_path.to_string(),
            size,
        })?;

        let Some(rule) = self.rule_for(ext) else {
            return Ok(Disposition::PassThrough {
                path: asset_path.to_string(),
            });
        };

        if rule.inlines(size) {
            return Ok(Disposition::Inline(Self::inline(rule, ext, contents)));
        }

        Ok(Disposition::Emit(self.emit(rule, name, ext, contents, mode)))
    }

    /// True iff `asset_path` matches an exclusion pattern.
    ///
    /// Independent of build mode and asset size.
    pub fn is_excluded_from_transform(&self, asset_path: &str) -> bool {
        self.exclusions.is_match(split_query(asset_path).0)
    }

    fn inline(rule: &AssetRule, ext: &str, contents: &[u8]) -> InlineAsset {
        let mime = mime::from_extension(ext);
        InlineAsset {
            rule: rule.name.clone(),
            encoding: Encoding::Base64,
            mime,
            data_url: format!("data:{mime};base64,{}", STANDARD.encode(contents)),
        }
    }

    fn emit(
        &self,
        rule: &AssetRule,
        name: &str,
        ext: &str,
        contents: &[u8],
        mode: BuildMode,
    ) -> EmittedAsset {
        let hash = ContentHash::of(contents).short(rule.template.hash_len());
        let file_name = rule.template.render(name, &hash, ext);
        let path = self.join_output_path(&rule.dir, &file_name);

        let target = self.output.target(mode);
        EmittedAsset {
            rule: rule.name.clone(),
            location: OutputLocation {
                absolute_path: target.root.join(&path),
            },
            url: target.url_for(&path),
            content_addressed: rule.template.hash_len() > 0,
            path,
            hash,
        }
    }

    /// `subdirectory/dir/file`, skipping empty segments.
    fn join_output_path(&self, dir: &str, file_name: &str) -> String {
        [self.subdirectory.as_str(), dir.trim_matches('/'), file_name]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::OutputTemplate;
    use crate::config::OutputTarget;
    use std::path::{Path, PathBuf};

    const LIMIT: u64 = 10_000;

    const ROUTED_EXTENSIONS: [&str; 17] = [
        "png", "jpg", "jpeg", "gif", "svg", "mp4", "webm", "ogg", "mp3", "wav", "flac", "aac",
        "woff", "woff2", "eot", "ttf", "otf",
    ];

    fn router() -> AssetRouter {
        let config = StowageConfig::default();
        AssetRouter::from_config(&config).unwrap()
    }

    fn router_with_targets() -> AssetRouter {
        let output = OutputConfig {
            development: OutputTarget {
                root: "/work/dev".into(),
                public_path: "/".into(),
            },
            production: OutputTarget {
                root: "/work/dist".into(),
                public_path: "https://cdn.example.com/app/".into(),
            },
        };
        let config = StowageConfig {
            output,
            ..StowageConfig::default()
        };
        AssetRouter::from_config(&config).unwrap()
    }

    fn bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_small_svg_is_inlined() {
        let contents = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        let disposition = router()
            .route("logo.svg", 4096, contents, BuildMode::Production)
            .unwrap();

        let inline = disposition.as_inline().expect("inline");
        assert_eq!(inline.encoding, Encoding::Base64);
        assert_eq!(inline.mime, "image/svg+xml");
        assert_eq!(inline.rule, "images");
        assert_eq!(
            inline.data_url,
            format!("data:image/svg+xml;base64,{}", STANDARD.encode(contents))
        );
    }

    #[test]
    fn test_large_png_is_emitted_with_hash() {
        let contents = bytes(52_000);
        let disposition = router()
            .route("hero.png", 52_000, &contents, BuildMode::Production)
            .unwrap();

        let emitted = disposition.as_emit().expect("emit");
        let hash = ContentHash::of(&contents).short(7);
        assert_eq!(emitted.hash, hash);
        assert_eq!(emitted.path, format!("images/hero.{hash}.png"));
        assert_eq!(emitted.rule, "images");
    }

    #[test]
    fn test_emit_path_layout() {
        // images/<name>.<7 hex>.<ext>, same layout the template renders
        let r = router();
        let rule = &r.rules()[0];
        assert_eq!(rule.template.render("hero", "a1b2c3d", "png"), "hero.a1b2c3d.png");
        assert_eq!(r.join_output_path(&rule.dir, "hero.a1b2c3d.png"), "images/hero.a1b2c3d.png");
    }

    #[test]
    fn test_threshold_boundary() {
        let r = router();
        let small = r.route("theme.woff2", 9_999, &bytes(9_999), BuildMode::Development).unwrap();
        assert!(small.as_inline().is_some());

        let contents = bytes(10_000);
        let exact = r.route("theme.woff2", 10_000, &contents, BuildMode::Development).unwrap();
        let emitted = exact.as_emit().expect("size == limit must emit");
        assert_eq!(
            emitted.path,
            format!("fonts/theme.{}.woff2", ContentHash::of(&contents).short(7))
        );
    }

    #[test]
    fn test_size_decides_not_content_length() {
        // Declared size wins over the byte count
        let r = router();
        let d = r.route("a.png", LIMIT as i64, b"tiny", BuildMode::Production).unwrap();
        assert!(d.as_emit().is_some());
        let d = r.route("a.png", 0, &bytes(20_000), BuildMode::Production).unwrap();
        assert!(d.as_inline().is_some());
    }

    #[test]
    fn test_unmatched_extension_passes_through() {
        let d = router().route("data.txt", 100, b"hello", BuildMode::Production).unwrap();
        assert_eq!(
            d,
            Disposition::PassThrough {
                path: "data.txt".into()
            }
        );
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        let d = router().route("PHOTO.PNG", 50_000, &bytes(10), BuildMode::Production).unwrap();
        assert!(d.is_pass_through());
    }

    #[test]
    fn test_query_suffix_ignored() {
        let contents = bytes(20_000);
        let r = router();
        let with_query = r
            .route("fonts/icons.woff?v=4.7.0", 20_000, &contents, BuildMode::Production)
            .unwrap();
        let without = r
            .route("fonts/icons.woff", 20_000, &contents, BuildMode::Production)
            .unwrap();
        assert_eq!(with_query, without);
        assert!(with_query.as_emit().unwrap().path.starts_with("fonts/icons."));
    }

    #[test]
    fn test_file_route_keeps_question_mark() {
        let r = router();
        let contents = bytes(20_000);

        let emitted = r.route_file("what?.png", 20_000, &contents, BuildMode::Production).unwrap();
        let hash = ContentHash::of(&contents).short(7);
        assert_eq!(emitted.as_emit().unwrap().path, format!("images/what?.{hash}.png"));

        let passed = r.route_file("foo?bar.txt", 3, b"abc", BuildMode::Production).unwrap();
        assert_eq!(passed, Disposition::PassThrough { path: "foo?bar.txt".into() });

        // As a reference the same string loses its query
        assert!(r.route("foo?bar.txt", 3, b"abc", BuildMode::Production).is_err());
    }

    #[test]
    fn test_content_addressed_flag() {
        let r = router();
        let d = r.route("hero.png", 20_000, &bytes(20_000), BuildMode::Production).unwrap();
        assert!(d.as_emit().unwrap().content_addressed);

        let rules = vec![AssetRule::new(
            "gifs",
            &["gif"],
            1,
            "[name].[ext]".parse::<OutputTemplate>().unwrap(),
            "gifs",
        )];
        let r = AssetRouter::new(rules, ExclusionSet::empty(), OutputConfig::default());
        let d = r.route("spin.gif", 10, b"version-one", BuildMode::Production).unwrap();
        let emitted = d.as_emit().unwrap();
        assert_eq!(emitted.path, "gifs/spin.gif");
        assert!(emitted.hash.is_empty());
        assert!(!emitted.content_addressed);
    }

    #[test]
    fn test_name_keeps_inner_dots() {
        let contents = bytes(20_000);
        let d = router().route("lib/chart.bundle.svg", 20_000, &contents, BuildMode::Production).unwrap();
        let path = &d.as_emit().unwrap().path;
        assert!(path.starts_with("images/chart.bundle."));
        assert!(path.ends_with(".svg"));
    }

    #[test]
    fn test_route_is_idempotent() {
        let r = router();
        let contents = bytes(30_000);
        let a = r.route("clip.mp4", 30_000, &contents, BuildMode::Production).unwrap();
        let b = r.route("clip.mp4", 30_000, &contents, BuildMode::Production).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_emit().unwrap().path, b.as_emit().unwrap().path);
    }

    #[test]
    fn test_one_byte_changes_hash() {
        let r = router();
        let mut contents = bytes(30_000);
        let before = r.route("song.mp3", 30_000, &contents, BuildMode::Production).unwrap();
        contents[12_345] ^= 0x01;
        let after = r.route("song.mp3", 30_000, &contents, BuildMode::Production).unwrap();

        let (before, after) = (before.as_emit().unwrap(), after.as_emit().unwrap());
        assert_ne!(before.hash, after.hash);
        assert_ne!(before.path, after.path);
    }

    #[test]
    fn test_each_extension_matches_at_most_one_rule() {
        let r = router();
        for ext in ROUTED_EXTENSIONS {
            let count = r.rules().iter().filter(|rule| rule.matches(ext)).count();
            assert_eq!(count, 1, "extension {ext}");
        }
        for ext in ["txt", "js", "css", "webp", "json", "Png", "woff3"] {
            let count = r.rules().iter().filter(|rule| rule.matches(ext)).count();
            assert_eq!(count, 0, "extension {ext}");
            let path = format!("file.{ext}");
            assert!(r.route(&path, 50_000, b"x", BuildMode::Production).unwrap().is_pass_through());
        }
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = vec![
            AssetRule::new("first", &["png"], 0, OutputTemplate::default(), "a"),
            AssetRule::new("second", &["png"], 0, OutputTemplate::default(), "b"),
        ];
        let r = AssetRouter::new(rules, ExclusionSet::empty(), OutputConfig::default());
        let d = r.route("x.png", 1, b"x", BuildMode::Production).unwrap();
        assert_eq!(d.as_emit().unwrap().rule, "first");
    }

    #[test]
    fn test_invalid_asset_path() {
        let r = router();
        for path in ["", "README", ".gitignore", "dir.d/Makefile", "?v=1"] {
            assert_eq!(
                r.route(path, 10, b"", BuildMode::Production),
                Err(RouteError::InvalidAssetPath(path.to_string())),
                "path {path:?}"
            );
        }
    }

    #[test]
    fn test_negative_size() {
        let err = router().route("hero.png", -1, b"", BuildMode::Production).unwrap_err();
        assert_eq!(
            err,
            RouteError::NegativeSize {
                path: "hero.png".into(),
                size: -1
            }
        );
        assert!(err.to_string().contains("hero.png"));
    }

    #[test]
    fn test_negative_size_checked_for_unmatched_extension() {
        let err = router().route("data.txt", -5, b"", BuildMode::Production).unwrap_err();
        assert!(matches!(err, RouteError::NegativeSize { size: -5, .. }));
    }

    #[test]
    fn test_mode_selects_root_and_public_path() {
        let r = router_with_targets();
        let contents = bytes(20_000);

        let dev = r.route("hero.png", 20_000, &contents, BuildMode::Development).unwrap();
        let prod = r.route("hero.png", 20_000, &contents, BuildMode::Production).unwrap();
        let (dev, prod) = (dev.as_emit().unwrap(), prod.as_emit().unwrap());

        // Relative path is mode-independent
        assert_eq!(dev.path, prod.path);
        assert_eq!(dev.location.absolute_path, Path::new("/work/dev").join(&dev.path));
        assert_eq!(prod.location.absolute_path, PathBuf::from("/work/dist").join(&prod.path));
        assert_eq!(dev.url, format!("/{}", dev.path));
        assert_eq!(prod.url, format!("https://cdn.example.com/app/{}", prod.path));
    }

    #[test]
    fn test_subdirectory_prefix() {
        let r = router().with_subdirectory("/static/");
        let d = r.route("a.ttf", 20_000, &bytes(20_000), BuildMode::Production).unwrap();
        assert!(d.as_emit().unwrap().path.starts_with("static/fonts/a."));
    }

    #[test]
    fn test_exclusion() {
        let r = router();
        assert!(r.is_excluded_from_transform("vendor/jquery.min.js"));
        assert!(r.is_excluded_from_transform("node_modules/echarts/dist/echarts.min.js?x=1"));
        assert!(!r.is_excluded_from_transform("src/app.js"));
    }

    #[test]
    fn test_template_without_hash() {
        let rules = vec![AssetRule::new(
            "plain",
            &["gif"],
            0,
            OutputTemplate::parse("[name].[ext]").unwrap(),
            "gifs",
        )];
        let r = AssetRouter::new(rules, ExclusionSet::empty(), OutputConfig::default());
        let d = r.route("spin.gif", 1, b"GIF89a", BuildMode::Development).unwrap();
        let emitted = d.as_emit().unwrap();
        assert_eq!(emitted.path, "gifs/spin.gif");
        assert_eq!(emitted.hash, "");
    }
}
