//! docrag CLI - lexical retrieval over project docs and code
//!
//! # Examples
//!
//! ```bash
//! # Build the index for the project in the current directory
//! docrag build
//!
//! # Ask a question
//! docrag search "如何添加Orchestrator" --type orchestrator -k 3
//!
//! # Inspect the index
//! docrag info
//! ```
//!
//! Logs go to stderr. Set `RUST_LOG` to change the level and
//! `DOCRAG_LOG_FORMAT=json` for JSON lines.

use std::env;
use std::io;

use clap::Parser;
use docrag::cli::{run, Cli};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "docrag=info".into());
    let json = env::var("DOCRAG_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
            .init();
    }
}

fn main() {
    init_logging();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
