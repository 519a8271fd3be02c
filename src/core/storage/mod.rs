//! Storage layer for the flat-file index.
//!
//! The index is a pair of aligned JSON artifacts plus a
//! metadata record, replaced wholesale on every build.
//!
//! # Index Directory Structure
//!
//! ```text
//! {root}/{index_dir}/
//! ├── index.json    # Chunk objects, pretty-printed
//! ├── tokens.json   # One token list per chunk
//! └── meta.json     # Build metadata
//! ```

mod store;

pub use store::{IndexStore, SCHEMA_VERSION};
