//! Locating the templates that may render a changed partial under a cache
//!
//! A partial at `posts/admin/_row.haml` can be referenced as `row` from
//! `posts/admin/`, as `admin/row` from `posts/`, as `posts/admin/row` from the
//! template root, and as `posts/admin/row` from anywhere in the tree. Each of
//! those is a [`CandidateAlias`]; the locator keeps the files that both
//! render the alias and declare a cache somewhere.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::search::{RipgrepSearcher, SearchOptions};

/// Leading character of a partial's file name
pub const PARTIAL_MARKER: char = '_';

/// Coarse filter for files that declare a cache block
const CACHE_PATTERN: &str = r"[-=]\s*cache\s+";

/// A partial template modified by the change under review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedPartial {
    /// Repository-relative path
    pub path: PathBuf,
    dirs: Vec<String>,
    name: String,
}

impl ChangedPartial {
    /// Recognise a changed path as a partial under `template_root`
    ///
    /// Returns `None` for files outside the root, without the partial marker,
    /// or with another extension.
    pub fn from_path(path: &str, template_root: &Path, extension: &str) -> Option<Self> {
        let relative = Path::new(path).strip_prefix(template_root).ok()?;
        let file_name = relative.file_name()?.to_str()?;

        if !file_name.ends_with(&format!(".{}", extension)) {
            return None;
        }

        let name = file_name
            .strip_prefix(PARTIAL_MARKER)?
            .split('.')
            .next()
            .filter(|name| !name.is_empty())?
            .to_string();

        let dirs = relative
            .parent()
            .map(|parent| {
                parent
                    .components()
                    .filter_map(|c| match c {
                        Component::Normal(part) => part.to_str().map(str::to_string),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            path: PathBuf::from(path),
            dirs,
            name,
        })
    }

    /// Alias relative to the template root, e.g. `posts/admin/row`
    pub fn alias(&self) -> String {
        self.joined(0)
    }

    fn joined(&self, from_dir: usize) -> String {
        self.dirs[from_dir..]
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Every (scope, alias) pair that could reference this partial, nearest scope first
    pub fn candidates(&self) -> Vec<CandidateAlias> {
        let depth = self.dirs.len();

        let mut candidates: Vec<CandidateAlias> = (0..=depth)
            .map(|i| CandidateAlias {
                scope: SearchScope::Directory(self.dirs[..depth - i].join("/")),
                alias: self.joined(depth - i),
            })
            .collect();

        candidates.push(CandidateAlias {
            scope: SearchScope::Global,
            alias: self.alias(),
        });

        candidates
    }
}

/// Where a candidate alias is looked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchScope {
    /// Files directly inside this directory (relative to the template root)
    Directory(String),
    /// The whole template tree
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateAlias {
    pub scope: SearchScope,
    pub alias: String,
}

impl CandidateAlias {
    /// Content pattern for a `render partial:`/`render layout:` call of this alias
    pub fn render_pattern(&self) -> String {
        format!(
            r#"=\s*render\s+(?:partial|layout):\s*["']{}["']"#,
            regex::escape(&self.alias)
        )
    }
}

/// Container files grouped with the aliases they are expected to render
pub type Containers = BTreeMap<PathBuf, BTreeSet<String>>;

/// Finds cached containers for changed partials within one repository
#[derive(Debug, Clone)]
pub struct PartialLocator {
    repo_root: PathBuf,
    template_root: PathBuf,
    extension: String,
    searcher: RipgrepSearcher,
}

impl PartialLocator {
    pub fn new(repo_root: &Path, template_root: &Path, extension: &str) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            template_root: template_root.to_path_buf(),
            extension: extension.to_string(),
            searcher: RipgrepSearcher::new(),
        }
    }

    /// Repository-relative files that render `candidate` and declare a cache
    pub fn containers_for(&self, candidate: &CandidateAlias) -> Result<Vec<PathBuf>> {
        let templates = self.repo_root.join(&self.template_root);
        let mut options = SearchOptions::new(candidate.render_pattern())
            .with_file_types(vec![self.extension.clone()]);

        let root = match &candidate.scope {
            SearchScope::Directory(dir) => {
                options = options.with_max_depth(1);
                if dir.is_empty() {
                    templates
                } else {
                    templates.join(dir)
                }
            }
            SearchScope::Global => templates,
        };

        let renders = self.searcher.files_matching(&root, &options)?;
        let cached = self.searcher.filter_files(&renders, CACHE_PATTERN)?;

        Ok(cached
            .into_iter()
            .map(|path| {
                path.strip_prefix(&self.repo_root)
                    .map(Path::to_path_buf)
                    .unwrap_or(path)
            })
            .collect())
    }

    /// Group candidate containers of every changed partial
    pub fn locate(&self, partials: &[ChangedPartial]) -> Result<Containers> {
        let mut containers = Containers::new();

        for partial in partials {
            for candidate in partial.candidates() {
                for file in self.containers_for(&candidate)? {
                    tracing::debug!(
                        "{} may render {} as '{}'",
                        file.display(),
                        partial.path.display(),
                        candidate.alias
                    );
                    containers
                        .entry(file)
                        .or_default()
                        .insert(candidate.alias.clone());
                }
            }
        }

        Ok(containers)
    }
}
