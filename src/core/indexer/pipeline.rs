//! Index build orchestration.
//!
//! Coordinates the end-to-end build:
//! 1. Resolve the configured allow-list into an ordered file list
//! 2. Read and filter each file
//! 3. Chunk documents and code with their chunker
//! 4. Assign ids and tokenize every chunk
//!
//! Order is deterministic: named documents in listed order, then
//! document directories, then each code rule in listed order,
//! files within a directory or rule in sorted path order.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::core::config::{IndexingConfig, SourcesConfig};
use crate::core::error::{DocragError, Result};
use crate::core::indexer::chunker::char_len;
use crate::core::indexer::walker::to_slash_path;
use crate::core::indexer::{CodeChunker, FileWalker, MarkdownChunker};
use crate::core::tokenizer::Tokenizer;
use crate::core::types::{BuildStats, Chunk, ChunkType, Index};

/// How a collected file is chunked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputKind {
    Doc,
    Code(ChunkType),
}

/// A file scheduled for chunking
#[derive(Debug, Clone)]
struct Input {
    path: PathBuf,
    source: String,
    kind: InputKind,
}

/// Orchestrates an index build
pub struct IndexingPipeline {
    sources: SourcesConfig,
    doc_walker: FileWalker,
    code_walkers: Vec<(FileWalker, String, ChunkType)>,
    markdown: MarkdownChunker,
    code: CodeChunker,
    min_file_chars: usize,
    skip_marker: String,
    tokenizer: Arc<dyn Tokenizer>,
}

impl IndexingPipeline {
    /// Create a new pipeline
    ///
    /// Glob patterns are parsed up front, so a bad pattern fails
    /// here rather than halfway through a build.
    pub fn new(
        sources: SourcesConfig,
        indexing: &IndexingConfig,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self> {
        let doc_walker = FileWalker::new("**/*.md")?;
        let code_walkers = sources
            .code_globs
            .iter()
            .map(|rule| {
                FileWalker::new(&rule.pattern)
                    .map(|walker| (walker, rule.base.clone(), rule.chunk_type))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            sources,
            doc_walker,
            code_walkers,
            markdown: MarkdownChunker::new(
                indexing.doc_max_chars,
                indexing.doc_overlap_chars,
                indexing.doc_min_chars,
            ),
            code: CodeChunker::new(
                indexing.code_max_chars,
                indexing.code_overlap_lines,
                indexing.code_min_chars,
            ),
            min_file_chars: indexing.min_file_chars,
            skip_marker: indexing.skip_marker.to_lowercase(),
            tokenizer,
        })
    }

    /// Name of the tokenizer the token lists are built with
    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    /// Build an index over the project at `root`
    ///
    /// Unreadable files are logged and skipped; they never abort
    /// the build.
    pub fn build(&self, root: &Path) -> Result<(Index, BuildStats)> {
        let start = Instant::now();

        tracing::info!("Building index for {:?}", root);
        let inputs = self.collect_inputs(root);
        tracing::info!("Found {} candidate files", inputs.len());

        let mut chunks = Vec::new();
        let mut files_indexed = 0;
        let mut files_skipped = 0;

        for input in &inputs {
            match self.process_file(input) {
                Ok(Some(file_chunks)) => {
                    match input.kind {
                        InputKind::Doc => tracing::info!(
                            "[doc] {} -> {} chunks",
                            input.source,
                            file_chunks.len()
                        ),
                        InputKind::Code(t) => tracing::info!(
                            "[code/{}] {} -> {} chunks",
                            t,
                            input.source,
                            file_chunks.len()
                        ),
                    }
                    files_indexed += 1;
                    chunks.extend(file_chunks);
                }
                Ok(None) => {
                    files_skipped += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to process {:?}: {}", input.path, e);
                    files_skipped += 1;
                    // Continue processing other files
                }
            }
        }

        // The only place ids are assigned
        for (id, chunk) in chunks.iter_mut().enumerate() {
            chunk.id = id;
        }

        let tokens = chunks
            .iter()
            .map(|c| self.tokenizer.tokenize(&c.indexed_text()))
            .collect();
        let index = Index::new(chunks, tokens)?;

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Build complete: {} files indexed, {} skipped, \
             {} chunks created in {}ms",
            files_indexed,
            files_skipped,
            index.len(),
            duration_ms
        );

        let stats = BuildStats {
            files_indexed,
            files_skipped,
            chunks_created: index.len(),
            duration_ms,
        };

        Ok((index, stats))
    }

    /// Resolve the allow-list into files, in build order
    fn collect_inputs(&self, root: &Path) -> Vec<Input> {
        let mut inputs = Vec::new();
        let mut seen = HashSet::new();

        let mut push = |path: PathBuf, kind: InputKind, inputs: &mut Vec<Input>| {
            if !seen.insert(path.clone()) {
                tracing::debug!("Already scheduled: {:?}", path);
                return;
            }
            let source = path
                .strip_prefix(root)
                .map(to_slash_path)
                .unwrap_or_else(|_| to_slash_path(&path));
            inputs.push(Input { path, source, kind });
        };

        for rel in &self.sources.doc_files {
            let path = root.join(rel);
            if !path.is_file() {
                tracing::debug!("[skip] {} (not found)", rel);
                continue;
            }
            push(path, InputKind::Doc, &mut inputs);
        }

        for rel in &self.sources.doc_dirs {
            let dir = root.join(rel);
            if !dir.is_dir() {
                tracing::debug!("[skip] {} (no such directory)", rel);
                continue;
            }
            for path in self.doc_walker.collect_files(&dir) {
                push(path, InputKind::Doc, &mut inputs);
            }
        }

        for (walker, base, chunk_type) in &self.code_walkers {
            let dir = root.join(base);
            if !dir.is_dir() {
                tracing::debug!("[skip] {} (no such directory)", base);
                continue;
            }
            for path in walker.collect_files(&dir) {
                push(path, InputKind::Code(*chunk_type), &mut inputs);
            }
        }

        inputs
    }

    /// Read, filter and chunk one file
    ///
    /// `Ok(None)` means the file was filtered out on purpose.
    fn process_file(&self, input: &Input) -> Result<Option<Vec<Chunk>>> {
        if self.is_test_path(&input.source) {
            tracing::debug!("[skip] {} (test file)", input.source);
            return Ok(None);
        }

        let contents = read_text(&input.path)?;

        if char_len(&contents) < self.min_file_chars {
            tracing::debug!("[skip] {} (too small)", input.source);
            return Ok(None);
        }

        let chunks = match input.kind {
            InputKind::Doc => self.markdown.chunk(&contents, &input.source),
            InputKind::Code(chunk_type) => self.code.chunk(&contents, &input.source, chunk_type),
        };

        Ok(Some(chunks))
    }

    fn is_test_path(&self, source: &str) -> bool {
        !self.skip_marker.is_empty() && source.to_lowercase().contains(&self.skip_marker)
    }
}

/// Read a file as text; invalid UTF-8 sequences are replaced
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| DocragError::IoError(std::io::Error::new(e.kind(), format!("{path:?}: {e}"))))?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::debug!("Replacing invalid UTF-8 in {:?}", path);
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}
