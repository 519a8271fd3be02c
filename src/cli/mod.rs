//! CLI adapter for docrag
//!
//! Provides the command-line interface for building the index and
//! querying it. Depends on `core/`; nothing in `core/` depends on it.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +------------------+
//! ```

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::core::services::Services;

/// docrag - lexical retrieval over project docs and code
///
/// Build a BM25 index over the project's Markdown documents and
/// selected source files, then ask questions in Chinese or English.
#[derive(Parser, Debug)]
#[command(name = "docrag")]
#[command(version)]
#[command(about = "BM25 retrieval over project docs and code", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Project root (defaults to the configured root)
    #[arg(long, global = true, env = "DOCRAG_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the index from scratch
    Build(commands::BuildArgs),

    /// Search the index
    Search(commands::SearchArgs),

    /// Show index statistics
    Info(commands::InfoArgs),

    /// Show the effective configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  docrag completions bash > ~/.local/share/bash-completion/completions/docrag
    ///   zsh:   docrag completions zsh > ~/.zfunc/_docrag
    ///   fish:  docrag completions fish > ~/.config/fish/completions/docrag.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let mut config = Config::load()?;
    if let Some(root) = cli.root {
        config.root = root;
    }

    let services = Arc::new(Services::new(config));

    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &services, cli.format),
        Commands::Search(args) => commands::search::execute(args, &services, cli.format),
        Commands::Info(args) => commands::info::execute(args, &services, cli.format),
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format),
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
