// Integration tests for the persisted index artifacts

use crate::common::{build_test_index, create_test_services, long_section, TestRepo};
use docrag::core::storage::SCHEMA_VERSION;
use docrag::DocragError;
use std::fs;

#[test]
fn test_build_writes_artifacts() {
    let repo = TestRepo::shop();
    let (services, stats) = build_test_index(repo.path());

    let store = &services.store;
    assert_eq!(store.dir(), repo.path().join("rag"));
    assert!(store.index_path().is_file());
    assert!(store.tokens_path().is_file());
    assert!(store.meta_path().is_file());

    let metadata = store.load_metadata().unwrap().unwrap();
    assert_eq!(metadata.schema_version, SCHEMA_VERSION);
    assert_eq!(metadata.tokenizer, "regex");
    assert_eq!(metadata.chunk_count, stats.chunks_created);
    assert_eq!(metadata.files_indexed, stats.files_indexed);
    assert_eq!(metadata.files_skipped, stats.files_skipped);
}

#[test]
fn test_artifact_layout() {
    let repo = TestRepo::shop();
    let (services, stats) = build_test_index(repo.path());

    let chunks: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(services.store.index_path()).unwrap()).unwrap();
    let tokens: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(services.store.tokens_path()).unwrap()).unwrap();

    let chunks = chunks.as_array().unwrap();
    let tokens = tokens.as_array().unwrap();
    assert_eq!(chunks.len(), stats.chunks_created);
    assert_eq!(tokens.len(), stats.chunks_created);

    let first = &chunks[0];
    assert_eq!(first["id"], 0);
    assert_eq!(first["source"], "系统状态.md");
    assert_eq!(first["type"], "doc");
    assert_eq!(first["title"], "系统状态");
    assert!(first["content"].as_str().unwrap().starts_with("# 系统状态"));

    assert!(tokens.iter().all(|t| t.is_array()));

    // Non-ASCII text is stored as-is, not escaped
    let raw = fs::read_to_string(services.store.index_path()).unwrap();
    assert!(raw.contains("库存管理"));
}

#[test]
fn test_round_trip() {
    let repo = TestRepo::shop();
    let root = fs::canonicalize(repo.path()).unwrap();
    let services = create_test_services(&root);

    let (index, _stats) = services.create_pipeline().unwrap().build(&root).unwrap();
    services.build_index().unwrap();

    assert_eq!(services.store.load().unwrap(), index);
}

#[test]
fn test_rebuild_replaces_index() {
    let repo = TestRepo::shop();
    let (services, first) = build_test_index(repo.path());

    fs::remove_file(repo.path().join("docs/architecture.md")).unwrap();
    let second = services.build_index().unwrap();

    assert!(second.chunks_created < first.chunks_created);
    let index = services.store.load().unwrap();
    assert_eq!(index.len(), second.chunks_created);
    assert!(index
        .chunks()
        .iter()
        .all(|c| c.source != "docs/architecture.md"));

    // Only the three artifacts remain, no temporary files
    let mut names: Vec<String> = fs::read_dir(services.store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["index.json", "meta.json", "tokens.json"]);
}

#[test]
fn test_missing_index() {
    let repo = TestRepo::shop();
    let services = create_test_services(repo.path());

    let err = services.open_search().err().unwrap();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("docrag build"));
}

#[test]
fn test_missing_tokens_artifact() {
    let repo = TestRepo::shop();
    let (services, _stats) = build_test_index(repo.path());

    fs::remove_file(services.store.tokens_path()).unwrap();

    assert!(matches!(
        services.store.load(),
        Err(DocragError::IndexNotFound(_))
    ));
}

#[test]
fn test_corrupt_tokens_artifact() {
    let repo = TestRepo::shop();
    let (services, _stats) = build_test_index(repo.path());

    fs::write(services.store.tokens_path(), "[[\"order\"], [\"sto").unwrap();

    let err = services.open_search().err().unwrap();
    assert!(matches!(err, DocragError::IndexCorrupt(_)));
    assert!(err.to_string().contains("tokens.json"));
}

#[test]
fn test_misaligned_artifacts() {
    let repo = TestRepo::shop();
    let (services, _stats) = build_test_index(repo.path());

    let mut tokens: Vec<Vec<String>> =
        serde_json::from_str(&fs::read_to_string(services.store.tokens_path()).unwrap()).unwrap();
    tokens.pop();
    fs::write(
        services.store.tokens_path(),
        serde_json::to_string(&tokens).unwrap(),
    )
    .unwrap();

    assert!(matches!(
        services.store.load(),
        Err(DocragError::IndexCorrupt(_))
    ));
}

#[test]
fn test_tokens_from_another_build_rejected() {
    let first = TestRepo::shop();
    let second = TestRepo::shop();
    let (services, stats) = build_test_index(first.path());

    // Same line lengths, so the same chunks, but different tokens
    fs::write(
        second.path().join("docs/architecture.md"),
        long_section("## 系统架构", 40).replace("warehouse", "storeroom"),
    )
    .unwrap();
    let (other, other_stats) = build_test_index(second.path());
    assert_eq!(other_stats.chunks_created, stats.chunks_created);

    fs::copy(other.store.tokens_path(), services.store.tokens_path()).unwrap();

    let err = services.open_search().err().unwrap();
    assert!(matches!(err, DocragError::IndexCorrupt(_)));
}

#[test]
fn test_unknown_schema_version() {
    let repo = TestRepo::shop();
    let (services, _stats) = build_test_index(repo.path());

    let mut meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(services.store.meta_path()).unwrap()).unwrap();
    meta["schema_version"] = serde_json::json!(SCHEMA_VERSION + 1);
    fs::write(services.store.meta_path(), meta.to_string()).unwrap();

    assert!(matches!(
        services.store.load(),
        Err(DocragError::IndexCorrupt(_))
    ));
}

#[test]
fn test_tokenizer_mismatch_still_opens() {
    let repo = TestRepo::shop();
    let (services, _stats) = build_test_index(repo.path());

    let mut meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(services.store.meta_path()).unwrap()).unwrap();
    meta["tokenizer"] = serde_json::json!("jieba");
    fs::write(services.store.meta_path(), meta.to_string()).unwrap();

    let engine = services.open_search().expect("Mismatch should only warn");
    assert!(!engine.search("orchestrator", 5, None).unwrap().results.is_empty());
}

#[test]
fn test_index_without_metadata_loads() {
    let repo = TestRepo::shop();
    let (services, stats) = build_test_index(repo.path());

    fs::remove_file(services.store.meta_path()).unwrap();

    assert!(services.store.load_metadata().unwrap().is_none());
    assert_eq!(services.store.load().unwrap().len(), stats.chunks_created);
}
