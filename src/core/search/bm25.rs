//! Okapi BM25 over pre-tokenized documents.
//!
//! The corpus is whatever set of token lists the caller hands in,
//! so a type-filtered search computes document frequencies and the
//! average length over the filtered candidates only.

use std::collections::{HashMap, HashSet};

/// BM25 tuning constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation
    pub k1: f64,

    /// Document length normalization
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Term statistics for one corpus of token lists
#[derive(Debug)]
pub struct Bm25Corpus {
    params: Bm25Params,
    term_freqs: Vec<HashMap<String, u32>>,
    doc_lens: Vec<usize>,
    doc_freqs: HashMap<String, usize>,
    avg_doc_len: f64,
}

impl Bm25Corpus {
    /// Collect statistics over `docs`, one token list per document
    pub fn new<'a, I>(docs: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut term_freqs = Vec::new();
        let mut doc_lens = Vec::new();
        let mut doc_freqs: HashMap<String, usize> = HashMap::new();

        for tokens in docs {
            let mut tf: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *doc_freqs.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(tokens.len());
            term_freqs.push(tf);
        }

        let total: usize = doc_lens.iter().sum();
        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            total as f64 / doc_lens.len() as f64
        };

        Self {
            params,
            term_freqs,
            doc_lens,
            doc_freqs,
            avg_doc_len,
        }
    }

    /// Number of documents in the corpus
    pub fn len(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lens.is_empty()
    }

    /// Inverse document frequency, never negative
    ///
    /// `ln(1 + (N - df + 0.5) / (df + 0.5))`
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.len() as f64;
        let df = self.doc_freqs.get(term).copied().unwrap_or(0) as f64;
        ((n - df + 0.5) / (df + 0.5)).ln_1p()
    }

    /// Score every document against `query`, in corpus order
    ///
    /// Repeated query tokens contribute once.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        let mut seen = HashSet::new();
        let terms: Vec<(&str, f64)> = query
            .iter()
            .filter(|t| seen.insert(t.as_str()))
            .map(|t| (t.as_str(), self.idf(t)))
            .collect();

        (0..self.len()).map(|doc| self.score_doc(doc, &terms)).collect()
    }

    fn score_doc(&self, doc: usize, terms: &[(&str, f64)]) -> f64 {
        let Bm25Params { k1, b } = self.params;
        let tf_map = &self.term_freqs[doc];
        if tf_map.is_empty() || self.avg_doc_len <= 0.0 {
            return 0.0;
        }

        let length_norm = 1.0 - b + b * self.doc_lens[doc] as f64 / self.avg_doc_len;

        terms
            .iter()
            .filter_map(|(term, idf)| {
                tf_map.get(*term).map(|&tf| {
                    let tf = tf as f64;
                    idf * tf * (k1 + 1.0) / (tf + k1 * length_norm)
                })
            })
            .sum()
    }
}
