//! Core domain logic (independent of the CLI)
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **tokenizer**: Mixed CJK/Latin tokenization strategies
//! - **indexer**: File walking, chunking and the build pipeline
//! - **storage**: Flat-file index persistence
//! - **search**: BM25 ranking
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod indexer;
pub mod search;
pub mod services;
pub mod storage;
pub mod tokenizer;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{DocragError, Result};
pub use services::Services;
