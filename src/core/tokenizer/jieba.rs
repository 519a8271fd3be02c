//! Dictionary-based tokenizer for mixed Chinese/English text.

use jieba_rs::Jieba;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{normalize, Tokenizer};

// lowercase followed by uppercase: the camelCase boundary
static CAMEL_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// jieba segmentation with a camelCase pre-split
///
/// Loading the default dictionary takes a noticeable moment, so
/// build one instance per process and share it.
pub struct JiebaTokenizer {
    jieba: Jieba,
}

impl JiebaTokenizer {
    pub fn new() -> Self {
        tracing::debug!("Loading jieba dictionary");
        Self {
            jieba: Jieba::new(),
        }
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for JiebaTokenizer {
    fn name(&self) -> &'static str {
        "jieba"
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let split = CAMEL_BOUNDARY.replace_all(text, "$1 $2");
        normalize(self.jieba.cut(&split, true))
    }
}
