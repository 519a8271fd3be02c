//! Unified service container for docrag
//!
//! Provides shared access to all core services.

use std::fs;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::OnceCell;

use crate::core::config::Config;
use crate::core::error::{DocragError, Result};
use crate::core::indexer::IndexingPipeline;
use crate::core::search::SearchEngine;
use crate::core::storage::{IndexStore, SCHEMA_VERSION};
use crate::core::tokenizer::{select_tokenizer, Tokenizer};
use crate::core::types::{BuildMetadata, BuildStats};

/// Unified services container
///
/// Every command goes through this struct, so builds and queries
/// always share one tokenizer selection and one index location.
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,

    /// Index artifacts under the configured index directory
    pub store: Arc<IndexStore>,

    /// Created on first use; the jieba dictionary is slow to load
    tokenizer: OnceCell<Arc<dyn Tokenizer>>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let store = Arc::new(IndexStore::new(config.index_dir()));

        Self {
            config: Arc::new(config),
            store,
            tokenizer: OnceCell::new(),
        }
    }

    /// The tokenizer selected by the configuration
    pub fn tokenizer(&self) -> Arc<dyn Tokenizer> {
        Arc::clone(
            self.tokenizer
                .get_or_init(|| select_tokenizer(self.config.indexing.tokenizer)),
        )
    }

    /// Create an IndexingPipeline from the configured sources
    pub fn create_pipeline(&self) -> Result<IndexingPipeline> {
        IndexingPipeline::new(
            self.config.sources.clone(),
            &self.config.indexing,
            self.tokenizer(),
        )
    }

    /// Build the index from scratch and persist it
    ///
    /// The previous index is replaced only once the new one has
    /// been built in full.
    pub fn build_index(&self) -> Result<BuildStats> {
        let root = fs::canonicalize(&self.config.root).map_err(|e| {
            DocragError::ConfigError(format!("Invalid root {:?}: {e}", self.config.root))
        })?;
        if !root.is_dir() {
            return Err(DocragError::ConfigError(format!(
                "Root {root:?} is not a directory"
            )));
        }

        let pipeline = self.create_pipeline()?;
        let (index, stats) = pipeline.build(&root)?;

        let metadata = BuildMetadata {
            schema_version: SCHEMA_VERSION,
            built_at: Utc::now(),
            root: root.to_string_lossy().into_owned(),
            tokenizer: pipeline.tokenizer_name().to_string(),
            files_indexed: stats.files_indexed,
            files_skipped: stats.files_skipped,
            chunk_count: index.len(),
            duration_ms: stats.duration_ms,
            index_hash: String::new(),
            tokens_hash: String::new(),
        };
        self.store.save(&index, &metadata)?;

        tracing::info!("Index written to {:?}", self.store.dir());

        Ok(stats)
    }

    /// Load the persisted index for querying
    pub fn open_search(&self) -> Result<SearchEngine> {
        SearchEngine::open(&self.store, self.tokenizer(), &self.config.search)
    }
}
