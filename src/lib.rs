//! docrag - lexical retrieval over project docs and code
//!
//! Splits a project's Markdown documents and selected source files
//! into overlapping chunks, tokenizes mixed Chinese/English text,
//! persists a flat-file index and answers BM25-ranked queries.
//!
//! # Architecture
//!
//! - **core**: Domain logic
//!   - config, error, types, xdg
//!   - tokenizer (jieba or regex)
//!   - indexer (walking, Markdown and code chunking, pipeline)
//!   - storage (atomic JSON artifacts)
//!   - search (BM25 with source downweighting)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Character-based chunking (never splits a UTF-8 sequence)
//! - Heading-aware document chunks, declaration-aware code chunks
//! - Deterministic ranking (ties broken by chunk id)
//! - All-or-nothing index rebuilds

// Core domain logic
pub mod core;

// CLI adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{DocragError, Result};
pub use core::services::Services;
pub use core::types::*;
