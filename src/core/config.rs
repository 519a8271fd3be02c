//! Configuration management for docrag.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with defaults matching the layout of
//! the project docrag was written for.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{DocragError, Result};
use crate::core::tokenizer::TokenizerKind;
use crate::core::types::ChunkType;
use crate::core::xdg::XdgDirs;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Project root every source path is relative to
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Which files are indexed
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    /// Markdown files, relative to the root, in index order
    #[serde(default = "default_doc_files")]
    pub doc_files: Vec<String>,

    /// Directories searched recursively for `*.md`
    #[serde(default = "default_doc_dirs")]
    pub doc_dirs: Vec<String>,

    /// Code rules, in index order
    #[serde(default = "default_code_globs")]
    pub code_globs: Vec<CodeGlob>,
}

/// One code rule: files under `base` matching `pattern` get `type`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CodeGlob {
    pub base: String,
    pub pattern: String,
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
}

impl CodeGlob {
    fn new(base: &str, pattern: &str, chunk_type: ChunkType) -> Self {
        Self {
            base: base.to_string(),
            pattern: pattern.to_string(),
            chunk_type,
        }
    }
}

/// Indexing configuration
///
/// All sizes are in characters (not bytes!).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Markdown sections longer than this are re-chunked
    #[serde(default = "default_doc_max_chars")]
    pub doc_max_chars: usize,

    /// Characters carried between consecutive document chunks
    #[serde(default = "default_doc_overlap_chars")]
    pub doc_overlap_chars: usize,

    /// Document chunks at or below this length are dropped
    #[serde(default = "default_doc_min_chars")]
    pub doc_min_chars: usize,

    /// Code buffer length that triggers a new chunk
    #[serde(default = "default_code_max_chars")]
    pub code_max_chars: usize,

    /// Lines carried between consecutive code chunks
    #[serde(default = "default_code_overlap_lines")]
    pub code_overlap_lines: usize,

    /// Code chunks at or below this length are dropped
    #[serde(default = "default_code_min_chars")]
    pub code_min_chars: usize,

    /// Files shorter than this are skipped
    #[serde(default = "default_min_file_chars")]
    pub min_file_chars: usize,

    /// Files whose relative path contains this (any case) are skipped
    #[serde(default = "default_skip_marker")]
    pub skip_marker: String,

    /// Tokenizer strategy
    #[serde(default)]
    pub tokenizer: TokenizerKind,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Index directory, relative to the root unless absolute
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Default number of results to return
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum results per query
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Maximum query string length
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Results scoring below this are dropped
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Multiplier applied to downweighted sources
    #[serde(default = "default_downweight_factor")]
    pub downweight_factor: f64,

    /// Sources that score highly for almost any query
    #[serde(default = "default_downweight_sources")]
    pub downweight_sources: Vec<String>,

    /// Content shown per result with `--brief`
    #[serde(default = "default_brief_chars")]
    pub brief_chars: usize,

    /// Content shown per result otherwise
    #[serde(default = "default_full_chars")]
    pub full_chars: usize,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_doc_files() -> Vec<String> {
    [
        "开发指南.md",
        "系统状态.md",
        "业务流程说明.md",
        "设计系统完整规范-2026.md",
        "快速测试指南.md",
        "INVENTORY_SYSTEM_GUIDE.md",
        "README.md",
        ".github/copilot-instructions.md",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_doc_dirs() -> Vec<String> {
    vec!["docs".to_string(), "deployment".to_string()]
}

fn default_code_globs() -> Vec<CodeGlob> {
    vec![
        CodeGlob::new("backend/src/main/java", "**/*Orchestrator.java", ChunkType::Orchestrator),
        CodeGlob::new("backend/src/main/java", "**/*Controller.java", ChunkType::Controller),
        CodeGlob::new("frontend/src/services", "**/*.ts", ChunkType::Api),
        CodeGlob::new("frontend/src/stores", "**/*.ts", ChunkType::Store),
        CodeGlob::new("frontend/src", "routeConfig.ts", ChunkType::Config),
        CodeGlob::new("frontend/src/utils", "**/*.ts", ChunkType::Util),
    ]
}

fn default_doc_max_chars() -> usize {
    800
}

fn default_doc_overlap_chars() -> usize {
    100
}

fn default_doc_min_chars() -> usize {
    30
}

fn default_code_max_chars() -> usize {
    600
}

fn default_code_overlap_lines() -> usize {
    10
}

fn default_code_min_chars() -> usize {
    50
}

fn default_min_file_chars() -> usize {
    100
}

fn default_skip_marker() -> String {
    "test".to_string()
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("rag")
}

fn default_k() -> usize {
    5
}

fn default_max_k() -> usize {
    50
}

fn default_max_query_length() -> usize {
    500
}

fn default_min_score() -> f64 {
    0.01
}

fn default_downweight_factor() -> f64 {
    0.4
}

fn default_downweight_sources() -> Vec<String> {
    vec![
        "系统状态.md".to_string(),
        ".github/copilot-instructions.md".to_string(),
    ]
}

fn default_brief_chars() -> usize {
    200
}

fn default_full_chars() -> usize {
    600
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            sources: SourcesConfig::default(),
            indexing: IndexingConfig::default(),
            storage: StorageConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            doc_files: default_doc_files(),
            doc_dirs: default_doc_dirs(),
            code_globs: default_code_globs(),
        }
    }
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            doc_max_chars: default_doc_max_chars(),
            doc_overlap_chars: default_doc_overlap_chars(),
            doc_min_chars: default_doc_min_chars(),
            code_max_chars: default_code_max_chars(),
            code_overlap_lines: default_code_overlap_lines(),
            code_min_chars: default_code_min_chars(),
            min_file_chars: default_min_file_chars(),
            skip_marker: default_skip_marker(),
            tokenizer: TokenizerKind::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            max_k: default_max_k(),
            max_query_length: default_max_query_length(),
            min_score: default_min_score(),
            downweight_factor: default_downweight_factor(),
            downweight_sources: default_downweight_sources(),
            brief_chars: default_brief_chars(),
            full_chars: default_full_chars(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            DocragError::ConfigError(format!("Failed to read config file {path:?}: {e}"))
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. DOCRAG_CONFIG env var
    /// 2. XDG config file (~/.config/docrag/config.toml)
    /// 3. ./docrag.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("DOCRAG_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("docrag.toml").exists() {
                Self::from_file("docrag.toml")?
            } else {
                Self::default()
            }
        };

        // Override with environment variables
        config.merge_env();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        if let Ok(root) = env::var("DOCRAG_ROOT") {
            self.root = PathBuf::from(root);
        }

        if let Ok(tokenizer) = env::var("DOCRAG_TOKENIZER") {
            match tokenizer.parse() {
                Ok(kind) => self.indexing.tokenizer = kind,
                Err(e) => tracing::warn!("Ignoring DOCRAG_TOKENIZER: {}", e),
            }
        }

        if let Ok(index_dir) = env::var("DOCRAG_INDEX_DIR") {
            self.storage.index_dir = PathBuf::from(index_dir);
        }

        if let Ok(default_k) = env::var("DOCRAG_DEFAULT_K") {
            if let Ok(k) = default_k.parse() {
                self.search.default_k = k;
            }
        }
        if let Ok(min_score) = env::var("DOCRAG_MIN_SCORE") {
            if let Ok(score) = min_score.parse() {
                self.search.min_score = score;
            }
        }
    }

    /// Directory holding the index artifacts
    pub fn index_dir(&self) -> PathBuf {
        if self.storage.index_dir.is_absolute() {
            self.storage.index_dir.clone()
        } else {
            self.root.join(&self.storage.index_dir)
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let indexing = &self.indexing;
        if indexing.doc_max_chars == 0 || indexing.code_max_chars == 0 {
            return Err(DocragError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if indexing.doc_overlap_chars >= indexing.doc_max_chars {
            return Err(DocragError::ConfigError(
                "Document overlap must be less than document chunk size".to_string(),
            ));
        }

        let search = &self.search;
        if search.default_k == 0 {
            return Err(DocragError::ConfigError(
                "Default k must be non-zero".to_string(),
            ));
        }

        if search.default_k > search.max_k {
            return Err(DocragError::ConfigError(
                "Default k cannot exceed max k".to_string(),
            ));
        }

        if search.max_query_length == 0 {
            return Err(DocragError::ConfigError(
                "Max query length must be non-zero".to_string(),
            ));
        }

        if search.min_score.is_nan() || search.min_score < 0.0 {
            return Err(DocragError::ConfigError(
                "Min score must be zero or positive".to_string(),
            ));
        }

        let factor = search.downweight_factor;
        if factor.is_nan() || factor <= 0.0 || factor > 1.0 {
            return Err(DocragError::ConfigError(
                "Downweight factor must be in (0, 1]".to_string(),
            ));
        }

        if search.brief_chars == 0 || search.full_chars == 0 {
            return Err(DocragError::ConfigError(
                "Display lengths must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Root: {:?}", self.root);
        tracing::info!(
            "  Sources: {} doc files, {} doc dirs, {} code rules",
            self.sources.doc_files.len(),
            self.sources.doc_dirs.len(),
            self.sources.code_globs.len()
        );
        tracing::info!(
            "  Doc chunks: {} chars, {} overlap",
            self.indexing.doc_max_chars,
            self.indexing.doc_overlap_chars
        );
        tracing::info!(
            "  Code chunks: {} chars, {} overlap lines",
            self.indexing.code_max_chars,
            self.indexing.code_overlap_lines
        );
        tracing::info!("  Tokenizer: {}", self.indexing.tokenizer);
        tracing::info!("  Index dir: {:?}", self.index_dir());
        tracing::info!("  Default k: {}", self.search.default_k);
        tracing::info!("  Min score: {}", self.search.min_score);
        tracing::info!(
            "  Downweight: x{} for {} sources",
            self.search.downweight_factor,
            self.search.downweight_sources.len()
        );
    }
}
