//! Feedsmith - localized RSS 2.0 feeds for a multilingual blog.

mod cli;
mod config;
mod content;
mod generator;
mod logger;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(cli.config.as_deref(), &cli.overrides(), |key| {
        std::env::var(key).ok()
    })?;

    match &cli.command {
        Commands::Build { .. } => cli::build::build_all(&config),
        Commands::Tags { json, .. } => cli::tags::list_feeds(&config, *json),
    }
}
