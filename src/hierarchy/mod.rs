//! Cache hierarchy reconstruction for container templates
//!
//! A container file is scanned once, top to bottom. Indentation acts as block
//! scoping: variable bindings and cache-key declarations live in
//! depth-indexed tables that are trimmed whenever the template dedents. Every
//! `render partial:`/`render layout:` line then resolves to the set of source
//! lines that make up its effective cache key.

pub mod patterns;
pub mod scope;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CacheCheckError, Result};
use patterns::CacheKey;
use scope::{CacheTable, ScopeTable};

/// A partial render governed by at least one cache key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSite {
    pub file: PathBuf,
    pub line: usize,
    pub alias: String,
    /// Lines that must change whenever the rendered partial changes
    pub required_lines: BTreeSet<usize>,
}

/// Single-pass parser state for one container file
#[derive(Debug)]
pub struct HierarchyParser<'a> {
    file: &'a Path,
    scopes: ScopeTable,
    caches: CacheTable,
    last_indentation: usize,
}

impl<'a> HierarchyParser<'a> {
    pub fn new(file: &'a Path) -> Self {
        Self {
            file,
            scopes: ScopeTable::new(),
            caches: CacheTable::new(),
            last_indentation: 0,
        }
    }

    /// Parse a whole template source and return its cache-governed render sites
    pub fn parse(file: &'a Path, source: &str) -> Result<Vec<RenderSite>> {
        let mut parser = Self::new(file);
        let mut sites = Vec::new();

        for (index, line) in source.lines().enumerate() {
            if let Some(site) = parser.feed(index + 1, line)? {
                sites.push(site);
            }
        }

        Ok(sites)
    }

    /// Process one line; `line_number` is 1-based
    pub fn feed(&mut self, line_number: usize, line: &str) -> Result<Option<RenderSite>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        let indentation = patterns::indentation(line);

        if indentation < self.last_indentation {
            self.scopes.clear_from(indentation + 1);
            self.caches.clear_from(indentation);
        }
        self.last_indentation = indentation;

        if let Some(name) = patterns::variable_binding(line) {
            self.scopes.bind(indentation, name, line_number);
        }

        if let Some(key) = patterns::cache_declaration(line) {
            let key_line = self.resolve_key(key, indentation, line_number)?;
            self.caches.set(indentation, key_line);
        }

        let Some(render) = patterns::partial_render(line) else {
            return Ok(None);
        };

        let mut required_lines = self.caches.governing(indentation);
        if let Some(predicate) = render.predicate {
            required_lines.insert(self.resolve_key(predicate, indentation, line_number)?);
        }

        if required_lines.is_empty() {
            return Ok(None);
        }

        Ok(Some(RenderSite {
            file: self.file.to_path_buf(),
            line: line_number,
            alias: render.alias.to_string(),
            required_lines,
        }))
    }

    /// Line number a cache key depends on
    fn resolve_key(&self, key: CacheKey<'_>, indentation: usize, line_number: usize) -> Result<usize> {
        match key {
            CacheKey::Inline => Ok(line_number),
            CacheKey::Variable(name) => self
                .scopes
                .resolve(name, indentation + 1)
                .map(|binding| binding.line)
                .ok_or_else(|| CacheCheckError::UnresolvedCacheVariable {
                    file: self.file.to_path_buf(),
                    line: line_number,
                    variable: name.to_string(),
                }),
        }
    }
}

/// Read a container file from disk and parse it
///
/// `display_path` is what ends up in render sites and diagnostics.
pub fn parse_file(path: &Path, display_path: &Path) -> Result<Vec<RenderSite>> {
    let source = fs::read_to_string(path)?;
    HierarchyParser::parse(display_path, &source)
}
