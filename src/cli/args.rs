//! Command-line interface definitions.

use crate::config::Overrides;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Localized RSS 2.0 feed generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: feedsmith.toml, searched upward)
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
    /// Generate every main and tag feed
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Output directory (relative to the config file)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Override site URL.
        ///
        /// Takes precedence over FEEDSMITH_BASE_URL and `[site].url`.
        /// Example: feedsmith build --base-url "https://blog.example.com"
        #[arg(short = 'U', long = "base-url", value_hint = clap::ValueHint::Url)]
        base_url: Option<String>,
    },

    /// List the feeds a build would write, without writing them
    #[command(visible_alias = "t")]
    Tags {
        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of a table
        #[arg(short, long)]
        json: bool,
    },
}

/// Where posts come from and how many of them each feed takes.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Content directory (relative to the config file)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Locale to build; repeat for several (replaces `[feed].locales`)
    #[arg(short, long = "locale", value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Maximum items per feed
    #[arg(short = 'n', long)]
    pub max_items: Option<usize>,
}

impl Cli {
    /// Config values given on the command line.
    pub fn overrides(&self) -> Overrides {
        match &self.command {
            Commands::Build {
                source,
                output,
                base_url,
            } => Overrides {
                base_url: base_url.clone(),
                output: output.clone(),
                ..source.overrides()
            },
            Commands::Tags { source, .. } => source.overrides(),
        }
    }
}

impl SourceArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            content: self.content.clone(),
            max_items: self.max_items,
            locales: self.locales.clone(),
            ..Default::default()
        }
    }
}
