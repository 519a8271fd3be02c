//! Boundary-aware chunking for source files.
//!
//! Code is chunked line by line. A running title tracks the most
//! recent class, method or function declaration so each chunk can
//! be understood on its own. Declarations are recognized with
//! regex heuristics for Java-like and TypeScript-like syntax; a
//! missed declaration only means a less specific title, and no
//! input makes the chunker fail.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::indexer::chunker::{bounded_lines, char_len, lines_len};
use crate::core::types::{Chunk, ChunkType};

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|abstract|final|static|sealed|export|default)\s+)*(?:class|interface|enum)\s+(\w+)",
    )
    .unwrap()
});

static METHOD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)+(?:<[^>]*>\s+)?[\w<>\[\],.? ]*?[\w>\]]\s+(\w+)\s*\(",
    )
    .unwrap()
});

static FUNCTION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:const|function\*?|async\s+function\*?)\s+(\w+)")
        .unwrap()
});

/// Splits source text into titled, line-overlapping chunks
#[derive(Debug, Clone)]
pub struct CodeChunker {
    /// Buffer length that triggers an emit
    max_chars: usize,

    /// Lines carried into the next buffer
    overlap_lines: usize,

    /// Trimmed chunks at or below this length are dropped
    min_chars: usize,
}

impl CodeChunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `max_chars` is 0.
    pub fn new(max_chars: usize, overlap_lines: usize, min_chars: usize) -> Self {
        assert!(max_chars > 0, "max_chars must be > 0");

        Self {
            max_chars,
            overlap_lines,
            min_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap_lines(&self) -> usize {
        self.overlap_lines
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Chunk a source file. Ids are left at 0 for the pipeline to assign.
    pub fn chunk(&self, content: &str, source: &str, chunk_type: ChunkType) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut title = file_name(source).to_string();

        let mut buf: Vec<&str> = Vec::new();
        let mut buf_len = 0;
        let mut fresh = false;

        for line in bounded_lines(content, self.max_chars) {
            if is_line_comment(line) {
                continue;
            }

            if let Some(next) = detect_title(line, buf_len) {
                title = next;
            }

            buf.push(line);
            buf_len += char_len(line);
            fresh = true;

            if buf_len >= self.max_chars {
                self.emit(&mut chunks, &buf, source, chunk_type, &title);

                let keep_from = buf.len().saturating_sub(self.overlap_lines);
                buf.drain(..keep_from);
                buf_len = lines_len(&buf);

                // The carried window alone must not re-trigger an emit
                while buf_len >= self.max_chars && !buf.is_empty() {
                    buf_len -= char_len(buf.remove(0));
                }
                fresh = false;
            }
        }

        if fresh {
            self.emit(&mut chunks, &buf, source, chunk_type, &title);
        }

        chunks
    }

    fn emit(
        &self,
        chunks: &mut Vec<Chunk>,
        buf: &[&str],
        source: &str,
        chunk_type: ChunkType,
        title: &str,
    ) {
        let text = buf.join("\n");
        let text = text.trim();
        if char_len(text) > self.min_chars {
            chunks.push(Chunk::new(source, chunk_type, title, text));
        }
    }
}

/// `//` comments are dropped; `///` doc comments are kept
fn is_line_comment(line: &str) -> bool {
    let stripped = line.trim();
    stripped.starts_with("//") && !stripped.starts_with("///")
}

/// Title for a declaration on `line`, if it opens one
///
/// Method declarations only relabel once the buffer holds more
/// than 50 characters, so a run of short signatures does not
/// rename the chunk on every line.
fn detect_title(line: &str, buf_len: usize) -> Option<String> {
    if let Some(caps) = CLASS_DECL.captures(line) {
        return Some(format!("class {}", &caps[1]));
    }
    if buf_len > 50 {
        if let Some(caps) = METHOD_DECL.captures(line) {
            return Some(format!("method {}", &caps[1]));
        }
    }
    FUNCTION_DECL
        .captures(line)
        .map(|caps| format!("fn {}", &caps[1]))
}

/// Bare file name of a `/`-separated source path
fn file_name(source: &str) -> &str {
    source.rsplit('/').next().unwrap_or(source)
}
