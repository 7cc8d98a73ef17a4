//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::BuildMode;

/// Stowage asset router CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: stowage.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Route every asset source and write the output tree
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        mode: ModeArgs,

        /// Clean output directory completely before building
        #[arg(short, long)]
        clean: bool,
    },

    /// Print the disposition of individual files
    #[command(visible_alias = "r")]
    Route {
        #[command(flatten)]
        mode: ModeArgs,

        /// Files to route
        #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::FilePath)]
        paths: Vec<PathBuf>,
    },

    /// Print which linter and compiler would process each path
    #[command(visible_alias = "p")]
    Plan {
        /// Paths to plan (need not exist)
        #[arg(value_name = "PATH", required = true, value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,
    },
}

/// Build mode selection shared by `build` and `route`.
#[derive(clap::Args, Debug, Clone)]
pub struct ModeArgs {
    /// Build mode (default: from NODE_ENV, `production` or development)
    #[arg(short, long, value_enum)]
    pub mode: Option<BuildMode>,
}

impl ModeArgs {
    /// Resolve once: the flag wins, otherwise `NODE_ENV`.
    pub fn resolve(&self) -> BuildMode {
        self.mode.unwrap_or_else(BuildMode::from_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["stowage", "-v", "build", "-m", "prod", "--clean"]);
        assert!(cli.verbose);
        let Commands::Build { mode, clean } = cli.command else {
            panic!("expected build");
        };
        assert!(clean);
        assert_eq!(mode.resolve(), BuildMode::Production);
    }

    #[test]
    fn test_parse_route_requires_paths() {
        assert!(Cli::try_parse_from(["stowage", "route"]).is_err());

        let cli = Cli::parse_from(["stowage", "route", "a.png", "b.svg", "-C", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        let Commands::Route { paths, mode } = cli.command else {
            panic!("expected route");
        };
        assert_eq!(paths.len(), 2);
        assert!(mode.mode.is_none());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
