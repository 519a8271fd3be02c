//! Core data types for docrag.
//!
//! This module defines the data structures shared by the
//! indexer, the index store and the search engine: chunks,
//! the aligned index, build statistics and search responses.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{DocragError, Result};

/// Category tag attached to every chunk
///
/// `Doc` covers all Markdown-derived chunks; the remaining
/// variants classify code by its role in the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    Doc,
    Orchestrator,
    Controller,
    Api,
    Store,
    Util,
    Config,
}

impl ChunkType {
    /// All variants, in declaration order
    pub const ALL: [ChunkType; 7] = [
        ChunkType::Doc,
        ChunkType::Orchestrator,
        ChunkType::Controller,
        ChunkType::Api,
        ChunkType::Store,
        ChunkType::Util,
        ChunkType::Config,
    ];

    /// Serialized name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Doc => "doc",
            ChunkType::Orchestrator => "orchestrator",
            ChunkType::Controller => "controller",
            ChunkType::Api => "api",
            ChunkType::Store => "store",
            ChunkType::Util => "util",
            ChunkType::Config => "config",
        }
    }

    /// Whether this chunk came from a Markdown document
    pub fn is_doc(&self) -> bool {
        matches!(self, ChunkType::Doc)
    }

    /// Substring match used by the query-time type filter
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.as_str().contains(filter)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkType {
    type Err = DocragError;

    fn from_str(s: &str) -> Result<Self> {
        ChunkType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DocragError::ConfigError(format!("Unknown chunk type '{s}'")))
    }
}

/// A single retrievable span of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the build's chunk sequence
    pub id: usize,

    /// Source file path, relative to the project root, `/`-separated
    pub source: String,

    /// Category tag
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,

    /// Heading text or detected class/function name
    pub title: String,

    /// The literal text span
    pub content: String,
}

impl Chunk {
    /// Create a chunk whose id is assigned later by the pipeline
    pub fn new(
        source: impl Into<String>,
        chunk_type: ChunkType,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            source: source.into(),
            chunk_type,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Text the token list of this chunk is computed from
    pub fn indexed_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

/// Chunks plus their token lists, index-aligned
///
/// `chunks[i].id == i` and `tokens[i]` belongs to `chunks[i]` for
/// every `i`. Both constructors enforce this.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    chunks: Vec<Chunk>,
    tokens: Vec<Vec<String>>,
}

impl Index {
    /// Pair chunks with their token lists, validating alignment
    pub fn new(chunks: Vec<Chunk>, tokens: Vec<Vec<String>>) -> Result<Self> {
        if chunks.len() != tokens.len() {
            return Err(DocragError::IndexCorrupt(format!(
                "{} chunks but {} token lists",
                chunks.len(),
                tokens.len()
            )));
        }

        if let Some((pos, chunk)) = chunks.iter().enumerate().find(|(i, c)| c.id != *i) {
            return Err(DocragError::IndexCorrupt(format!(
                "chunk at position {pos} has id {}",
                chunk.id
            )));
        }

        Ok(Self { chunks, tokens })
    }

    /// An index with no chunks
    pub fn empty() -> Self {
        Self {
            chunks: Vec::new(),
            tokens: Vec::new(),
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn tokens(&self) -> &[Vec<String>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Split back into the two artifacts
    pub fn into_parts(self) -> (Vec<Chunk>, Vec<Vec<String>>) {
        (self.chunks, self.tokens)
    }
}

/// Statistics from a build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    /// Files that were read and chunked
    pub files_indexed: usize,

    /// Files filtered out (test paths, too small) or unreadable
    pub files_skipped: usize,

    /// Total chunks created
    pub chunks_created: usize,

    /// Build duration in milliseconds
    pub duration_ms: u64,
}

/// Metadata persisted next to the index artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMetadata {
    pub schema_version: u32,
    pub built_at: DateTime<Utc>,
    pub root: String,
    pub tokenizer: String,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub chunk_count: usize,
    pub duration_ms: u64,

    /// blake3 digest of `index.json`, filled in by the store
    pub index_hash: String,

    /// blake3 digest of `tokens.json`, filled in by the store
    pub tokens_hash: String,
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Final score after any downweight
    pub score: f64,

    /// BM25 score before the downweight
    pub raw_score: f64,

    /// Whether the source downweight was applied
    pub downweighted: bool,

    /// The matching chunk
    pub chunk: Chunk,
}

/// Response from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Original query string
    pub query: String,

    /// Query tokens after tokenization
    pub tokens: Vec<String>,

    /// Ranked hits, best first
    pub results: Vec<SearchHit>,

    /// Number of results returned
    pub count: usize,

    /// Query duration in milliseconds
    pub duration_ms: u64,
}
