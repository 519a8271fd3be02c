//! Tests for the info CLI command

use crate::cli::test_helpers::{create_cli_test_services, create_indexed_services, docrag_error};
use docrag::cli::commands::info::{chunks_by_type, execute, top_sources, InfoArgs};
use docrag::cli::OutputFormat;

/// Test info in both formats
#[test]
fn test_info_formats() {
    let (services, _repo) = create_indexed_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(InfoArgs { top_sources: 5 }, &services, format);
        assert!(result.is_ok(), "Info should succeed: {:?}", result.err());
    }
}

/// Test info before any build
#[test]
fn test_info_index_not_found() {
    let (services, _repo) = create_cli_test_services();

    let err = docrag_error(execute(InfoArgs { top_sources: 5 }, &services, OutputFormat::Json));
    assert!(err.is_not_found());
}

/// Test the per-type breakdown
#[test]
fn test_chunks_by_type() {
    let (services, _repo) = create_indexed_services();
    let index = services.store.load().unwrap();

    let by_type = chunks_by_type(&index);

    assert_eq!(by_type.values().sum::<usize>(), index.len());
    for name in ["doc", "orchestrator", "controller", "api", "store", "config", "util"] {
        assert!(by_type.get(name).copied().unwrap_or(0) > 0, "no {name} chunks");
    }
}

/// Test the top sources listing
#[test]
fn test_top_sources() {
    let (services, _repo) = create_indexed_services();
    let index = services.store.load().unwrap();

    let top = top_sources(&index, 3);

    assert_eq!(top.len(), 3);
    assert_eq!(top[0].source, "docs/architecture.md");
    for pair in top.windows(2) {
        assert!(pair[0].chunks >= pair[1].chunks);
    }
    assert!(top_sources(&index, 0).is_empty());
}
