//! Text tokenization shared by indexing and querying.
//!
//! Two strategies implement [`Tokenizer`]:
//!
//! - **jieba**: dictionary segmentation for mixed Chinese/English
//!   text (cargo feature `jieba`)
//! - **regex**: CJK runs and ASCII identifiers, always available
//!
//! Both emit lowercase tokens longer than one character. The
//! strategy is picked once per process by [`select_tokenizer`]
//! and the same instance must tokenize the chunks at build time
//! and the query at search time.

#[cfg(feature = "jieba")]
mod jieba;
mod fallback;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::error::{DocragError, Result};

#[cfg(feature = "jieba")]
pub use self::jieba::JiebaTokenizer;
pub use self::fallback::RegexTokenizer;

/// Converts text into normalized tokens
pub trait Tokenizer: Send + Sync {
    /// Stable strategy name, recorded in the build metadata
    fn name(&self) -> &'static str;

    /// Lowercase tokens of at least two characters
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Which strategy to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// jieba when compiled in, regex otherwise
    #[default]
    Auto,
    Jieba,
    Regex,
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenizerKind::Auto => "auto",
            TokenizerKind::Jieba => "jieba",
            TokenizerKind::Regex => "regex",
        };
        f.write_str(name)
    }
}

impl FromStr for TokenizerKind {
    type Err = DocragError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(TokenizerKind::Auto),
            "jieba" => Ok(TokenizerKind::Jieba),
            "regex" => Ok(TokenizerKind::Regex),
            other => Err(DocragError::ConfigError(format!(
                "Unknown tokenizer '{other}' (expected auto, jieba or regex)"
            ))),
        }
    }
}

/// Whether the jieba strategy was compiled in
pub fn jieba_available() -> bool {
    cfg!(feature = "jieba")
}

/// Build the tokenizer for this process
pub fn select_tokenizer(kind: TokenizerKind) -> Arc<dyn Tokenizer> {
    match kind {
        TokenizerKind::Regex => Arc::new(RegexTokenizer::new()),
        TokenizerKind::Auto | TokenizerKind::Jieba => jieba_or_fallback(kind),
    }
}

#[cfg(feature = "jieba")]
fn jieba_or_fallback(_kind: TokenizerKind) -> Arc<dyn Tokenizer> {
    Arc::new(JiebaTokenizer::new())
}

#[cfg(not(feature = "jieba"))]
fn jieba_or_fallback(kind: TokenizerKind) -> Arc<dyn Tokenizer> {
    if kind == TokenizerKind::Jieba {
        tracing::warn!("jieba tokenizer requested but not compiled in; using regex tokenizer");
    }
    Arc::new(RegexTokenizer::new())
}

/// Drop tokens of one character or less and lowercase the rest
pub(crate) fn normalize<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    raw.into_iter()
        .map(str::trim)
        .filter(|t| t.chars().count() > 1)
        .map(str::to_lowercase)
        .collect()
}
