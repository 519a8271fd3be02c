// Integration tests for full index builds

use crate::common::fixtures::CART_STORE;
use crate::common::{
    assert_valid_stats, create_test_services, long_section, shared_overlap, TestRepo,
};
use docrag::core::config::Config;
use docrag::core::services::Services;
use docrag::core::tokenizer::TokenizerKind;
use docrag::core::types::{ChunkType, Index};
use std::path::Path;

const GUIDE: &str = "## Setup\n\
Clone the repository and install the toolchain listed in the readme.\n\
\n\
## Usage\n\
Run the build command, then ask questions with the search command.\n";

/// Build in memory with the default sources
fn build_in_memory(root: &Path) -> (Index, docrag::BuildStats) {
    let services = create_test_services(root);
    let pipeline = services.create_pipeline().expect("Failed to create pipeline");
    pipeline.build(root).expect("Build failed")
}

fn sources_in_order(index: &Index) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for chunk in index.chunks() {
        if sources.last() != Some(&chunk.source) {
            sources.push(chunk.source.clone());
        }
    }
    sources
}

#[test]
fn test_short_and_long_documents() {
    let handbook = long_section("# Handbook", 40);
    assert!(handbook.chars().count() > 2000);

    let repo = TestRepo::with_files(&[("docs/guide.md", GUIDE), ("docs/handbook.md", &handbook)]);
    let (index, stats) = build_in_memory(repo.path());

    assert_valid_stats(&stats);
    assert_eq!(stats.files_indexed, 2);

    let guide: Vec<_> = index
        .chunks()
        .iter()
        .filter(|c| c.source == "docs/guide.md")
        .collect();
    assert_eq!(guide.len(), 2);
    assert_eq!(guide[0].title, "Setup");
    assert_eq!(guide[1].title, "Usage");

    let long: Vec<_> = index
        .chunks()
        .iter()
        .filter(|c| c.source == "docs/handbook.md")
        .collect();
    assert!(long.len() >= 3, "Expected >= 3 chunks, got {}", long.len());
    assert!(long.iter().all(|c| c.title == "Handbook"));
    assert!(long.iter().all(|c| c.chunk_type == ChunkType::Doc));
}

#[test]
fn test_document_chunks_overlap() {
    let repo = TestRepo::with_files(&[("docs/handbook.md", &long_section("# Handbook", 60))]);
    let (index, _stats) = build_in_memory(repo.path());

    let chunks = index.chunks();
    assert!(chunks.len() >= 3);

    for pair in chunks.windows(2) {
        let overlap = shared_overlap(&pair[0].content, &pair[1].content);
        assert!(
            overlap >= 100,
            "Chunks {} and {} share only {} characters",
            pair[0].id,
            pair[1].id,
            overlap
        );
    }

    // Every source line survives somewhere
    for i in 0..60 {
        let needle = format!("Line {i:03}:");
        assert!(
            chunks.iter().any(|c| c.content.contains(&needle)),
            "{needle} missing"
        );
    }
}

#[test]
fn test_code_chunks_overlap() {
    let mut java = String::from("package com.shop.billing;\n\npublic class BillingOrchestrator {\n");
    for i in 0..60 {
        java.push_str(&format!("    public int amountFor{i}() {{ return {i} * 100; }}\n"));
    }
    java.push_str("}\n");

    let repo = TestRepo::with_files(&[(
        "backend/src/main/java/com/shop/billing/BillingOrchestrator.java",
        &java,
    )]);
    let (index, _stats) = build_in_memory(repo.path());

    let chunks = index.chunks();
    assert!(chunks.len() >= 3, "Expected >= 3 chunks, got {}", chunks.len());
    // Titles follow the latest declaration seen before each emit
    assert!(chunks.iter().all(|c| c.title.starts_with("method amountFor")));
    assert!(chunks
        .iter()
        .all(|c| c.chunk_type == ChunkType::Orchestrator));

    for pair in chunks.windows(2) {
        assert!(
            shared_overlap(&pair[0].content, &pair[1].content) > 0,
            "Chunks {} and {} do not overlap",
            pair[0].id,
            pair[1].id
        );
    }
}

#[test]
fn test_ids_dense_and_aligned() {
    let repo = TestRepo::shop();
    let (index, stats) = build_in_memory(repo.path());

    assert_eq!(stats.chunks_created, index.len());
    assert_eq!(index.tokens().len(), index.len());

    let tokenizer = create_test_services(repo.path()).tokenizer();
    for (i, chunk) in index.chunks().iter().enumerate() {
        assert_eq!(chunk.id, i);
        assert_eq!(index.tokens()[i], tokenizer.tokenize(&chunk.indexed_text()));
        assert!(!index.tokens()[i].is_empty(), "Chunk {i} has no tokens");
    }
}

#[test]
fn test_build_order_follows_sources() {
    let repo = TestRepo::shop();
    let (index, _stats) = build_in_memory(repo.path());

    assert_eq!(
        sources_in_order(&index),
        vec![
            "系统状态.md",
            "README.md",
            "docs/architecture.md",
            "docs/库存管理.md",
            "backend/src/main/java/com/shop/order/OrderOrchestrator.java",
            "backend/src/main/java/com/shop/stock/StockOrchestrator.java",
            "backend/src/main/java/com/shop/order/OrderController.java",
            "frontend/src/services/order.ts",
            "frontend/src/stores/cart.ts",
            "frontend/src/routeConfig.ts",
            "frontend/src/utils/format.ts",
        ]
    );
}

#[test]
fn test_chunk_types_follow_rules() {
    let repo = TestRepo::shop();
    let (index, _stats) = build_in_memory(repo.path());

    let type_of = |source: &str| {
        index
            .chunks()
            .iter()
            .find(|c| c.source == source)
            .map(|c| c.chunk_type)
    };

    assert_eq!(type_of("README.md"), Some(ChunkType::Doc));
    assert_eq!(
        type_of("backend/src/main/java/com/shop/order/OrderController.java"),
        Some(ChunkType::Controller)
    );
    assert_eq!(type_of("frontend/src/services/order.ts"), Some(ChunkType::Api));
    assert_eq!(type_of("frontend/src/stores/cart.ts"), Some(ChunkType::Store));
    assert_eq!(type_of("frontend/src/routeConfig.ts"), Some(ChunkType::Config));
    assert_eq!(type_of("frontend/src/utils/format.ts"), Some(ChunkType::Util));
}

#[test]
fn test_test_paths_skipped() {
    let repo = TestRepo::shop();
    let (index, stats) = build_in_memory(repo.path());

    assert!(index
        .chunks()
        .iter()
        .all(|c| !c.source.to_lowercase().contains("test")));
    assert!(stats.files_skipped >= 1);
}

#[test]
fn test_marker_is_case_insensitive() {
    let repo = TestRepo::with_files(&[
        ("docs/guide.md", GUIDE),
        ("docs/TestPlan.md", GUIDE),
        ("docs/e2e/LATEST.md", GUIDE),
    ]);
    let (index, stats) = build_in_memory(repo.path());

    assert_eq!(sources_in_order(&index), vec!["docs/guide.md"]);
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.files_skipped, 2);
}

#[test]
fn test_file_listed_twice_indexed_once() {
    let repo = TestRepo::with_files(&[("docs/guide.md", GUIDE)]);

    let mut config = Config::default();
    config.root = repo.path().to_path_buf();
    config.indexing.tokenizer = TokenizerKind::Regex;
    config.sources.doc_files = vec!["docs/guide.md".to_string()];
    let services = Services::new(config);

    let stats = services.build_index().expect("Build failed");
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.chunks_created, 2);
}

#[test]
fn test_files_outside_sources_ignored() {
    let repo = TestRepo::with_files(&[
        ("docs/guide.md", GUIDE),
        ("notes/guide.md", GUIDE),
        ("frontend/src/components/Cart.ts", CART_STORE),
        ("backend/src/main/java/com/shop/order/OrderService.java", GUIDE),
    ]);
    let (index, _stats) = build_in_memory(repo.path());

    assert_eq!(sources_in_order(&index), vec!["docs/guide.md"]);
}

#[test]
fn test_empty_project_builds_empty_index() {
    let repo = TestRepo::with_files(&[]);
    let (index, stats) = build_in_memory(repo.path());

    assert!(index.is_empty());
    assert_eq!(stats.files_indexed, 0);
    assert_eq!(stats.chunks_created, 0);
}
