//! Regex tokenizer, used when no segmentation dictionary is available.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{normalize, Tokenizer};

// A run of CJK ideographs, or an ASCII identifier
static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{4e00}-\u{9fff}]+|[a-zA-Z][a-zA-Z0-9_]*").unwrap());

/// Splits on CJK runs and identifier runs; everything else is a separator
#[derive(Debug, Clone, Default)]
pub struct RegexTokenizer;

impl RegexTokenizer {
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for RegexTokenizer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        normalize(WORD_PATTERN.find_iter(text).map(|m| m.as_str()))
    }
}
