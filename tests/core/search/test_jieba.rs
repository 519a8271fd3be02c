// End-to-end tests with the dictionary tokenizer

use crate::common::{create_services_with_tokenizer, TestRepo};
use docrag::core::tokenizer::TokenizerKind;

#[test]
fn test_jieba_tokens_match_chunks() {
    let repo = TestRepo::shop();
    let services = create_services_with_tokenizer(repo.path(), TokenizerKind::Jieba);
    let stats = services.build_index().expect("Build failed");
    assert!(stats.chunks_created > 0);

    let metadata = services.store.load_metadata().unwrap().unwrap();
    assert_eq!(metadata.tokenizer, "jieba");

    let tokenizer = services.tokenizer();
    let index = services.store.load().unwrap();
    for (chunk, tokens) in index.chunks().iter().zip(index.tokens()) {
        let expected = tokenizer.tokenize(&format!("{} {}", chunk.title, chunk.content));
        assert_eq!(tokens, &expected, "chunk {} of {}", chunk.id, chunk.source);
    }
}

#[test]
fn test_jieba_mixed_query_with_type_filter() {
    let repo = TestRepo::shop();
    let services = create_services_with_tokenizer(repo.path(), TokenizerKind::Jieba);
    services.build_index().expect("Build failed");
    let engine = services.open_search().unwrap();

    let response = engine
        .search("如何添加Orchestrator", 3, Some("orchestrator"))
        .unwrap();

    assert!(response.tokens.contains(&"orchestrator".to_string()));
    assert!(!response.results.is_empty());
    assert!(response.results.len() <= 3);
    for hit in &response.results {
        assert!(hit.chunk.chunk_type.as_str().contains("orchestrator"));
        assert!(hit.score >= 0.01);
    }
    for pair in response.results.windows(2) {
        assert!(
            pair[0].score > pair[1].score
                || (pair[0].score == pair[1].score && pair[0].chunk.id < pair[1].chunk.id)
        );
    }
    assert_eq!(
        response.results[0].chunk.source,
        "backend/src/main/java/com/shop/order/OrderOrchestrator.java"
    );
}

#[test]
fn test_jieba_segments_chinese_documents() {
    let repo = TestRepo::shop();
    let services = create_services_with_tokenizer(repo.path(), TokenizerKind::Jieba);
    services.build_index().expect("Build failed");
    let engine = services.open_search().unwrap();

    let response = engine.search("仓库 调拨", 5, Some("doc")).unwrap();

    assert!(!response.results.is_empty());
    assert_eq!(response.results[0].chunk.source, "docs/库存管理.md");
}
