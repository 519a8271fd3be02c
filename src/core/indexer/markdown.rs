//! Heading-aware chunking for Markdown documents.
//!
//! A document is split at every `#`, `##` or `###` heading into
//! sections. Short sections are dropped as noise; sections within
//! the bound become one chunk each; longer sections are re-chunked
//! line by line, and each new chunk starts with the trailing lines
//! of the previous one (at least `overlap_chars` characters) so a
//! passage cut at a chunk boundary still appears whole somewhere.
//!
//! # Example
//!
//! ```
//! use docrag::core::indexer::MarkdownChunker;
//!
//! let chunker = MarkdownChunker::new(800, 100, 30);
//! let doc = "# Orders\nOrders move through draft, confirmed and shipped states.\n\
//!            ## Returns\nReturns are accepted within thirty days of delivery.";
//! let chunks = chunker.chunk(doc, "docs/orders.md");
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].title, "Orders");
//! assert_eq!(chunks[1].title, "Returns");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::indexer::chunker::{bounded_lines, char_len, char_suffix, lines_len};
use crate::core::types::{Chunk, ChunkType};

static HEADING_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,3}\s+(.+)").unwrap());

/// Splits Markdown into heading-bounded, overlapping chunks
#[derive(Debug, Clone)]
pub struct MarkdownChunker {
    /// Section length above which a section is re-chunked
    max_chars: usize,

    /// Minimum characters carried into the next chunk
    overlap_chars: usize,

    /// Trimmed sections at or below this length are dropped
    min_chars: usize,
}

impl MarkdownChunker {
    /// Create a new chunker.
    ///
    /// # Panics
    ///
    /// Panics if `max_chars` is 0 or if `overlap_chars >= max_chars`.
    pub fn new(max_chars: usize, overlap_chars: usize, min_chars: usize) -> Self {
        assert!(max_chars > 0, "max_chars must be > 0");
        assert!(overlap_chars < max_chars, "overlap_chars must be < max_chars");

        Self {
            max_chars,
            overlap_chars,
            min_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    /// Chunk a Markdown document. Ids are left at 0 for the pipeline to assign.
    pub fn chunk(&self, content: &str, source: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for section in split_sections(content) {
            let section = section.trim();
            if char_len(section) <= self.min_chars {
                continue;
            }

            let title = section_title(section);

            if char_len(section) <= self.max_chars {
                chunks.push(Chunk::new(source, ChunkType::Doc, title, section));
                continue;
            }

            for text in self.split_long_section(section) {
                chunks.push(Chunk::new(source, ChunkType::Doc, title.clone(), text));
            }
        }

        chunks
    }

    /// Re-chunk an oversized section with a trailing-lines overlap
    fn split_long_section(&self, section: &str) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut buf: Vec<&str> = Vec::new();
        let mut buf_len = 0;
        // Whether buf holds lines that were not emitted yet
        let mut fresh = false;

        for line in bounded_lines(section, self.max_chars) {
            buf.push(line);
            buf_len += char_len(line);
            fresh = true;

            if buf_len >= self.max_chars {
                pieces.push(buf.join("\n"));

                let keep_from = self.overlap_start(&buf);
                buf.drain(..keep_from);
                buf_len = lines_len(&buf);

                // A window this long would re-trigger at once
                if buf_len >= self.max_chars {
                    buf = self.overlap_tail(&buf);
                    buf_len = lines_len(&buf);
                }
                fresh = false;
            }
        }

        if fresh {
            let text = buf.join("\n");
            let text = text.trim();
            if char_len(text) > self.min_chars {
                pieces.push(text.to_string());
            }
        }

        pieces
    }

    /// The last `overlap_chars` characters of `buf`, as lines
    ///
    /// Only the first returned line can be a partial one.
    fn overlap_tail<'a>(&self, buf: &[&'a str]) -> Vec<&'a str> {
        let mut tail = Vec::new();
        let mut collected = 0;
        for line in buf.iter().rev() {
            let needed = self.overlap_chars - collected;
            if char_len(line) >= needed {
                tail.push(char_suffix(line, needed));
                break;
            }
            tail.push(*line);
            collected += char_len(line);
        }
        tail.reverse();
        tail
    }

    /// Index of the first line of the overlap window
    ///
    /// Walks backward until the collected lines hold at least
    /// `overlap_chars` characters.
    fn overlap_start(&self, buf: &[&str]) -> usize {
        let mut collected = 0;
        for (idx, line) in buf.iter().enumerate().rev() {
            collected += char_len(line);
            if collected >= self.overlap_chars {
                return idx;
            }
        }
        0
    }
}

/// Whether `line` opens a section: 1 to 3 `#` followed by a space
fn is_heading(line: &str) -> bool {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    (1..=3).contains(&hashes) && line[hashes..].starts_with(' ')
}

/// Split a document before every heading line
fn split_sections(content: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for (idx, line) in content.split('\n').enumerate() {
        if idx > 0 && is_heading(line) {
            sections.push(current.join("\n"));
            current.clear();
        }
        current.push(line);
    }
    sections.push(current.join("\n"));

    sections
}

/// Heading text of a trimmed section, or empty when it has none
fn section_title(section: &str) -> String {
    HEADING_TITLE
        .captures(section)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
