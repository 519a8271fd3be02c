//! Search module for BM25 ranked retrieval.
//!
//! This module scores the chunks of a loaded index against a
//! query with a from-scratch Okapi BM25 implementation.

mod bm25;
mod engine;

pub use bm25::{Bm25Corpus, Bm25Params};
pub use engine::SearchEngine;
