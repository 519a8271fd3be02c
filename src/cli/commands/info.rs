//! Info command - show what the current index contains

use crate::cli::output::{colors, format_age, format_bytes, print_json, print_section};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{BuildMetadata, Index};
use chrono::Utc;
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Number of sources to list, by chunk count
    #[arg(long, default_value = "10")]
    pub top_sources: usize,
}

/// Index statistics
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub index_dir: String,
    pub size_bytes: u64,
    pub chunk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BuildMetadata>,
    pub chunks_by_type: BTreeMap<String, usize>,
    pub top_sources: Vec<SourceCount>,
}

/// Chunks contributed by one source file
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SourceCount {
    pub source: String,
    pub chunks: usize,
}

/// Execute the info command
pub fn execute(
    args: InfoArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = services.store.load()?;
    let metadata = services.store.load_metadata()?;

    let response = InfoResponse {
        index_dir: services.store.dir().to_string_lossy().into_owned(),
        size_bytes: services.store.size_bytes(),
        chunk_count: index.len(),
        metadata,
        chunks_by_type: chunks_by_type(&index),
        top_sources: top_sources(&index, args.top_sources),
    };

    match format {
        OutputFormat::Human => {
            print_section("Index", response.chunk_count);
            println!("  Location: {}", colors::file_path(&response.index_dir));
            println!("  Size: {}", format_bytes(response.size_bytes));
            println!(
                "  Chunks: {}",
                colors::number(&response.chunk_count.to_string())
            );

            if let Some(meta) = &response.metadata {
                println!(
                    "  Built: {} ({})",
                    meta.built_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    colors::dim(&format_age(&meta.built_at, &Utc::now()))
                );
                println!("  Root: {}", meta.root);
                println!("  Tokenizer: {}", meta.tokenizer);
                println!(
                    "  Files: {} indexed, {} skipped",
                    meta.files_indexed, meta.files_skipped
                );
            }

            println!();
            print_section("Chunks by type", response.chunks_by_type.len());
            for (chunk_type, count) in &response.chunks_by_type {
                println!("  {:<14} {}", colors::chunk_type(chunk_type), count);
            }

            if !response.top_sources.is_empty() {
                println!();
                print_section("Top sources", response.top_sources.len());
                for entry in &response.top_sources {
                    println!(
                        "  {:>4}  {}",
                        colors::number(&entry.chunks.to_string()),
                        colors::file_path(&entry.source)
                    );
                }
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}

/// Chunk counts per type name, sorted by name
pub fn chunks_by_type(index: &Index) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for chunk in index.chunks() {
        *counts.entry(chunk.chunk_type.to_string()).or_insert(0) += 1;
    }
    counts
}

/// The `limit` sources with the most chunks, ties by path
pub fn top_sources(index: &Index, limit: usize) -> Vec<SourceCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for chunk in index.chunks() {
        *counts.entry(chunk.source.as_str()).or_insert(0) += 1;
    }

    let mut sources: Vec<SourceCount> = counts
        .into_iter()
        .map(|(source, chunks)| SourceCount {
            source: source.to_string(),
            chunks,
        })
        .collect();
    // Stable sort keeps the path order from the map for equal counts
    sources.sort_by(|a, b| b.chunks.cmp(&a.chunks));
    sources.truncate(limit);
    sources
}
