//! Document and code indexing module.
//!
//! Turns the configured allow-list of project files into an
//! [`Index`](crate::core::types::Index). Key features:
//!
//! - Heading-aware Markdown chunking with character overlap
//! - Declaration-aware code chunking with line overlap
//! - File system walking with glob matching
//! - Indexing pipeline orchestration
//!
//! # Safety
//!
//! All lengths are counted in characters and every cut goes
//! through `char_indices()`, so chunking never panics on
//! multi-byte text (CJK, emoji).

pub mod chunker;
pub mod code;
pub mod markdown;
pub mod pipeline;
pub mod walker;

pub use code::CodeChunker;
pub use markdown::MarkdownChunker;
pub use pipeline::IndexingPipeline;
pub use walker::FileWalker;
