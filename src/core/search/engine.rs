//! Query execution over a loaded index.
//!
//! This module provides the SearchEngine, which tokenizes a query,
//! scores the candidate chunks with BM25, applies the source
//! downweight and returns the ranked top-N.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::core::config::SearchConfig;
use crate::core::error::{DocragError, Result};
use crate::core::indexer::chunker::char_len;
use crate::core::search::bm25::{Bm25Corpus, Bm25Params};
use crate::core::storage::IndexStore;
use crate::core::tokenizer::Tokenizer;
use crate::core::types::{Index, SearchHit, SearchResponse};

/// Ranked retrieval over one in-memory index
pub struct SearchEngine {
    index: Index,
    tokenizer: Arc<dyn Tokenizer>,
    params: Bm25Params,
    max_k: usize,
    max_query_length: usize,
    min_score: f64,
    downweight_factor: f64,
    downweight_sources: HashSet<String>,
}

impl SearchEngine {
    /// Create an engine over an index already in memory
    pub fn new(index: Index, tokenizer: Arc<dyn Tokenizer>, config: &SearchConfig) -> Self {
        Self {
            index,
            tokenizer,
            params: Bm25Params::default(),
            max_k: config.max_k,
            max_query_length: config.max_query_length,
            min_score: config.min_score,
            downweight_factor: config.downweight_factor,
            downweight_sources: config.downweight_sources.iter().cloned().collect(),
        }
    }

    /// Load the persisted index and create an engine over it
    ///
    /// Warns when the index was built with a different tokenizer,
    /// since query tokens would not line up with the stored ones.
    pub fn open(
        store: &IndexStore,
        tokenizer: Arc<dyn Tokenizer>,
        config: &SearchConfig,
    ) -> Result<Self> {
        let index = store.load()?;

        if let Some(metadata) = store.load_metadata()? {
            if metadata.tokenizer != tokenizer.name() {
                tracing::warn!(
                    "Index was built with the '{}' tokenizer but queries use '{}'; \
                     results may be poor until the index is rebuilt",
                    metadata.tokenizer,
                    tokenizer.name()
                );
            }
        }

        Ok(Self::new(index, tokenizer, config))
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Execute a search query
    ///
    /// An empty query, or one without any usable token, returns no
    /// results. `top_n` is capped at the configured maximum.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` if the query is longer than the configured
    /// maximum length.
    pub fn search(
        &self,
        query: &str,
        top_n: usize,
        type_filter: Option<&str>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();

        let query_len = char_len(query);
        if query_len > self.max_query_length {
            return Err(DocragError::InvalidQuery(format!(
                "Query too long: {} characters (max {})",
                query_len, self.max_query_length
            )));
        }

        let tokens = self.tokenizer.tokenize(query);
        let results = if tokens.is_empty() {
            tracing::debug!("Query {:?} has no tokens", query);
            Vec::new()
        } else {
            self.rank(&tokens, top_n.min(self.max_k), type_filter)
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let count = results.len();

        tracing::debug!(
            "Query {:?} -> {} results in {}ms",
            query,
            count,
            duration_ms
        );

        Ok(SearchResponse {
            query: query.to_string(),
            tokens,
            results,
            count,
            duration_ms,
        })
    }

    fn rank(&self, tokens: &[String], top_n: usize, type_filter: Option<&str>) -> Vec<SearchHit> {
        let chunks = self.index.chunks();

        let candidates: Vec<usize> = (0..chunks.len())
            .filter(|&i| type_filter.map_or(true, |f| chunks[i].chunk_type.matches_filter(f)))
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let corpus = Bm25Corpus::new(
            candidates.iter().map(|&i| self.index.tokens()[i].as_slice()),
            self.params,
        );

        let mut scored: Vec<(usize, f64, f64)> = candidates
            .iter()
            .zip(corpus.scores(tokens))
            .map(|(&i, raw)| (i, self.adjust(&chunks[i].source, raw), raw))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(top_n);

        scored
            .into_iter()
            .filter(|&(_, score, _)| score >= self.min_score)
            .map(|(i, score, raw_score)| SearchHit {
                score,
                raw_score,
                downweighted: self.is_downweighted(&chunks[i].source),
                chunk: chunks[i].clone(),
            })
            .collect()
    }

    fn is_downweighted(&self, source: &str) -> bool {
        self.downweight_sources.contains(source)
    }

    fn adjust(&self, source: &str, raw: f64) -> f64 {
        if self.is_downweighted(source) {
            raw * self.downweight_factor
        } else {
            raw
        }
    }
}
