//! File system walker with glob filtering.
//!
//! Walks a base directory and keeps the files whose path,
//! relative to that base, matches a glob pattern. `**/` matches
//! zero or more directories and `*` never crosses a `/`, so
//! `routeConfig.ts` only matches at the top of the base while
//! `**/*.ts` matches at any depth. Hidden directories are never
//! entered. Walk errors (permission denied, etc.) are logged
//! and skipped.

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocragError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// File system walker for one glob pattern
#[derive(Debug, Clone)]
pub struct FileWalker {
    pattern: Pattern,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Returns
    ///
    /// A new `FileWalker` or `InvalidPattern` if the glob does
    /// not parse
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|e| DocragError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { pattern })
    }

    /// The glob this walker matches
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Collect matching files under `base`, sorted by path
    pub fn collect_files(&self, base: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(base)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !is_hidden_dir(e, base))
        {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if self.matches(path, base) {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    // Continue walking despite errors
                }
            }
        }

        files.sort();
        files
    }

    /// Check the path relative to `base` against the pattern
    fn matches(&self, path: &Path, base: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(base) else {
            return false;
        };

        let relative = to_slash_path(relative);
        self.pattern.matches_with(&relative, MATCH_OPTIONS)
    }
}

/// Hidden directories (starting with '.') are skipped, never the root
fn is_hidden_dir(entry: &DirEntry, root: &Path) -> bool {
    if entry.path() == root || !entry.file_type().is_dir() {
        return false;
    }

    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Render a relative path with `/` separators on every platform
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
