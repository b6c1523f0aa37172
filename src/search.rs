//! Ripgrep-backed file search
//!
//! This module answers the two coarse questions the partial locator asks of
//! the template tree:
//!
//! 1. Which template files under a directory contain a pattern?
//! 2. Which files of a given set contain another pattern?
//!
//! # Features
//!
//! - Respects `.gitignore` automatically via the `ignore` crate
//! - Read failures are errors, never silent non-matches
//! - Optional depth limit (depth 1 = files directly inside the root)
//! - Stops reading a file at its first match
//!
//! # Example
//!
//! ```ignore
//! use cache_check::search::{RipgrepSearcher, SearchOptions};
//!
//! let searcher = RipgrepSearcher::new();
//! let options = SearchOptions::new(r"=\s*render\s+partial:")
//!     .with_max_depth(1)
//!     .with_file_types(vec!["haml".into()]);
//!
//! let files = searcher.files_matching(Path::new("app/views/posts"), &options)?;
//! ```

use std::io;
use std::path::{Path, PathBuf};

use grep_regex::RegexMatcher;
use grep_searcher::sinks::UTF8;
use grep_searcher::{BinaryDetection, SearcherBuilder};
use ignore::WalkBuilder;

use crate::error::{CacheCheckError, Result};

/// Search options for configuring ripgrep behavior
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// The search pattern (regex)
    pub pattern: String,

    /// Maximum directory depth below the root, `None` for unlimited
    pub max_depth: Option<usize>,

    /// File extension filters (e.g., "haml")
    pub file_types: Vec<String>,
}

impl SearchOptions {
    /// Create new search options with a pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            max_depth: None,
            file_types: Vec::new(),
        }
    }

    /// Limit the walk depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set file type filters
    pub fn with_file_types(mut self, types: Vec<String>) -> Self {
        self.file_types = types;
        self
    }
}

/// Ripgrep-based file searcher
#[derive(Debug, Clone, Default)]
pub struct RipgrepSearcher;

impl RipgrepSearcher {
    /// Create a new ripgrep searcher
    pub fn new() -> Self {
        Self
    }

    /// Files under `root` whose content matches the pattern, sorted by path
    ///
    /// A missing root yields no files. Any other walk or read failure is an
    /// error rather than a non-match.
    pub fn files_matching(&self, root: &Path, options: &SearchOptions) -> Result<Vec<PathBuf>> {
        let matcher = self.build_matcher(&options.pattern)?;
        let mut files = Vec::new();

        if !root.exists() {
            return Ok(files);
        }

        for result in self.build_walker(root, options) {
            let entry = result.map_err(|e| CacheCheckError::SearchError {
                message: format!("Failed to walk {}: {}", root.display(), e),
            })?;

            if entry.file_type().map(|t| t.is_dir()).unwrap_or(true) {
                continue;
            }

            let path = entry.path();
            if !Self::has_wanted_extension(path, &options.file_types) {
                continue;
            }

            if self.file_matches(path, &matcher)? {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// The subset of `files` whose content matches `pattern`, order preserved
    pub fn filter_files(&self, files: &[PathBuf], pattern: &str) -> Result<Vec<PathBuf>> {
        let matcher = self.build_matcher(pattern)?;
        let mut matching = Vec::new();

        for path in files {
            if self.file_matches(path, &matcher)? {
                matching.push(path.clone());
            }
        }

        Ok(matching)
    }

    fn has_wanted_extension(path: &Path, file_types: &[String]) -> bool {
        if file_types.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| file_types.iter().any(|t| t == ext))
            .unwrap_or(false)
    }

    /// Build a regex matcher from a pattern
    fn build_matcher(&self, pattern: &str) -> Result<RegexMatcher> {
        RegexMatcher::new(pattern).map_err(|e| CacheCheckError::SearchError {
            message: format!("Invalid regex pattern: {}", e),
        })
    }

    /// Build a file walker from options
    fn build_walker(&self, root: &Path, options: &SearchOptions) -> ignore::Walk {
        let mut builder = WalkBuilder::new(root);

        builder.max_depth(options.max_depth);

        // Do not follow symlinks
        builder.follow_links(false);

        builder.hidden(true);

        builder.sort_by_file_name(|a, b| a.cmp(b));

        builder.build()
    }

    /// Whether a single file contains at least one match
    ///
    /// Binary files stop at the first NUL byte and count as a non-match.
    fn file_matches(&self, path: &Path, matcher: &RegexMatcher) -> Result<bool> {
        let mut searcher = SearcherBuilder::new()
            .binary_detection(BinaryDetection::quit(b'\x00'))
            .line_number(true)
            .build();

        let mut found = false;

        searcher
            .search_path(
                matcher,
                path,
                UTF8(|_, _| {
                    found = true;
                    Ok(false) // Stop searching
                }),
            )
            .map_err(|e: io::Error| CacheCheckError::SearchError {
                message: format!("Failed to search {}: {}", path.display(), e),
            })?;

        Ok(found)
    }
}
