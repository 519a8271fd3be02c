//! Flat-file index storage.
//!
//! Persists an [`Index`] as two JSON artifacts plus a metadata
//! record, and loads them back with alignment checks.

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::core::error::{DocragError, Result};
use crate::core::types::{BuildMetadata, Chunk, Index};

/// Metadata schema version
///
/// Bump when the artifact layout changes; older indexes must be rebuilt.
pub const SCHEMA_VERSION: u32 = 1;

const INDEX_FILE: &str = "index.json";
const TOKENS_FILE: &str = "tokens.json";
const META_FILE: &str = "meta.json";

/// Reads and writes the index artifacts in one directory
#[derive(Debug, Clone)]
pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    /// Create a store rooted at `dir` (not created until saved)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the chunk artifact
    pub fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Path of the token artifact
    pub fn tokens_path(&self) -> PathBuf {
        self.dir.join(TOKENS_FILE)
    }

    /// Path of the metadata record
    pub fn meta_path(&self) -> PathBuf {
        self.dir.join(META_FILE)
    }

    /// Check if both index artifacts are present
    pub fn exists(&self) -> bool {
        self.index_path().is_file() && self.tokens_path().is_file()
    }

    /// Persist an index and its metadata
    ///
    /// Each artifact is written to a temporary file in the index
    /// directory and renamed over its target, so a reader never
    /// sees a half-written file. The metadata record goes last and
    /// carries a digest of both artifacts: tokens and chunks from
    /// different saves never load together, even when the chunk
    /// counts agree. The digests in `metadata` are overwritten.
    pub fn save(&self, index: &Index, metadata: &BuildMetadata) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let tokens = serde_json::to_vec(index.tokens())?;
        let chunks = serde_json::to_vec_pretty(index.chunks())?;

        let mut metadata = metadata.clone();
        metadata.tokens_hash = digest(&tokens);
        metadata.index_hash = digest(&chunks);

        self.write_atomic(&self.tokens_path(), &tokens)?;
        self.write_atomic(&self.index_path(), &chunks)?;
        self.write_atomic(&self.meta_path(), &serde_json::to_vec_pretty(&metadata)?)?;

        tracing::debug!("Saved {} chunks to {:?}", index.len(), self.dir);

        Ok(())
    }

    /// Load and validate the persisted index
    ///
    /// # Errors
    ///
    /// `IndexNotFound` if either artifact is missing, `IndexCorrupt`
    /// if the artifacts fail to parse or disagree with each other or
    /// with the metadata record.
    pub fn load(&self) -> Result<Index> {
        if !self.exists() {
            return Err(DocragError::IndexNotFound(self.dir.clone()));
        }

        let chunk_bytes = fs::read(self.index_path())?;
        let token_bytes = fs::read(self.tokens_path())?;

        let chunks: Vec<Chunk> = parse_json(INDEX_FILE, &chunk_bytes)?;
        let tokens: Vec<Vec<String>> = parse_json(TOKENS_FILE, &token_bytes)?;
        let index = Index::new(chunks, tokens)?;

        if let Some(metadata) = self.load_metadata()? {
            if metadata.chunk_count != index.len() {
                return Err(DocragError::IndexCorrupt(format!(
                    "metadata records {} chunks but {} were loaded",
                    metadata.chunk_count,
                    index.len()
                )));
            }
            if metadata.index_hash != digest(&chunk_bytes)
                || metadata.tokens_hash != digest(&token_bytes)
            {
                return Err(DocragError::IndexCorrupt(format!(
                    "{INDEX_FILE} and {TOKENS_FILE} do not match the build recorded in {META_FILE}"
                )));
            }
        }

        tracing::debug!("Loaded {} chunks from {:?}", index.len(), self.dir);

        Ok(index)
    }

    /// Load the metadata record, if one was written
    pub fn load_metadata(&self) -> Result<Option<BuildMetadata>> {
        let path = self.meta_path();
        if !path.is_file() {
            return Ok(None);
        }

        let metadata: BuildMetadata = read_json(&path)?;
        if metadata.schema_version != SCHEMA_VERSION {
            return Err(DocragError::IndexCorrupt(format!(
                "index uses schema version {} (current: v{})",
                metadata.schema_version, SCHEMA_VERSION
            )));
        }

        Ok(Some(metadata))
    }

    /// Total size of the artifacts on disk, in bytes
    pub fn size_bytes(&self) -> u64 {
        [self.index_path(), self.tokens_path(), self.meta_path()]
            .iter()
            .filter_map(|p| fs::metadata(p).ok())
            .map(|m| m.len())
            .sum()
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path)?;
        Ok(())
    }
}

/// Hex blake3 digest of an artifact's bytes
fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Parse one artifact; parse failures are reported as corruption
fn parse_json<T: DeserializeOwned>(name: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| DocragError::IndexCorrupt(format!("{name}: {e}")))
}

/// Read the metadata record
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        DocragError::IndexCorrupt(format!("{name}: {e}"))
    })
}
