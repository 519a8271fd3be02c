//! Search command - query the index

use crate::cli::output::{colors, print_json, truncate_chars};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Question or keywords, Chinese or English
    pub query: String,

    /// Maximum number of results (defaults to the configured default_k)
    #[arg(long, short = 'k')]
    pub top: Option<usize>,

    /// Only search chunks whose type contains this text (e.g. "orch", "doc")
    #[arg(long = "type", short = 't')]
    pub type_filter: Option<String>,

    /// Show a shorter excerpt of each result
    #[arg(long, short = 'b')]
    pub brief: bool,
}

/// Execute the search command
pub fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let search_config = &services.config.search;
    let top = args.top.unwrap_or(search_config.default_k);

    let engine = services.open_search()?;
    let response = engine.search(&args.query, top, args.type_filter.as_deref())?;

    match format {
        OutputFormat::Human => {
            if response.results.is_empty() {
                println!("No results found for '{}'", colors::label(&args.query));
                return Ok(());
            }

            let excerpt_chars = if args.brief {
                search_config.brief_chars
            } else {
                search_config.full_chars
            };

            println!(
                "Found {} result(s) for '{}':\n",
                colors::number(&response.count.to_string()),
                colors::label(&args.query)
            );

            for (i, hit) in response.results.iter().enumerate() {
                let chunk = &hit.chunk;
                let title = if chunk.title.is_empty() {
                    chunk.source.as_str()
                } else {
                    chunk.title.as_str()
                };

                println!(
                    "[{}] {} {} {}",
                    colors::rank(&(i + 1).to_string()),
                    colors::label(title),
                    colors::chunk_type(&format!("[{}]", chunk.chunk_type)),
                    colors::score(&format!("(score: {:.3})", hit.score))
                );
                println!("    {}", colors::file_path(&chunk.source));
                for line in truncate_chars(&chunk.content, excerpt_chars).lines() {
                    println!("    {}", colors::dim(line));
                }
                println!();
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
