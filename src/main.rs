//! Stowage - an asset router for front-end builds.

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use stowage::cli::{self, Cli, Commands};
use stowage::config::StowageConfig;
use stowage::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = StowageConfig::load(cli.config.as_deref(), &cwd)?;

    match &cli.command {
        Commands::Build { mode, clean } => {
            cli::build::build_assets(&config, mode.resolve(), *clean).map(|_| ())
        }
        Commands::Route { mode, paths } => cli::route::run_route(&config, mode.resolve(), &cwd, paths),
        Commands::Plan { paths } => cli::plan::run_plan(&config, &cwd, paths),
    }
}
