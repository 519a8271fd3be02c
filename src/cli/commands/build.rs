//! Build command - rebuild the index from the configured sources

use crate::cli::output::{colors, format_duration, print_json, print_success, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Suppress the banner and configuration summary
    ///
    /// Per-file log lines follow RUST_LOG as usual.
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Build result response
#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub root: String,
    pub index_dir: String,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunks_created: usize,
    pub duration_secs: f64,
}

/// Execute the build command
pub fn execute(
    args: BuildArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if !args.quiet {
        services.config.log_config();

        if format == OutputFormat::Human {
            eprintln!(
                "Building index for {}...",
                colors::file_path(&services.config.root.display().to_string())
            );
        }
    }

    let stats = services.build_index()?;

    let response = BuildResponse {
        root: services.config.root.to_string_lossy().into_owned(),
        index_dir: services.store.dir().to_string_lossy().into_owned(),
        files_indexed: stats.files_indexed,
        files_skipped: stats.files_skipped,
        chunks_created: stats.chunks_created,
        duration_secs: stats.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            print_success(&format!(
                "Indexed {} files ({} chunks) in {}",
                response.files_indexed,
                response.chunks_created,
                format_duration(response.duration_secs)
            ));
            if response.files_skipped > 0 {
                println!(
                    "  {} {} files",
                    colors::dim("Skipped"),
                    response.files_skipped
                );
            }
            println!("  Index: {}", colors::file_path(&response.index_dir));

            if response.chunks_created == 0 {
                print_warning("no chunks were created; check the [sources] section of the config");
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
