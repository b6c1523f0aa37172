//! Indentation-scoped symbol tables
//!
//! Both tables are keyed by indentation depth. Clearing everything at or
//! beyond a depth is a single `BTreeMap::split_off`, so a dedent never costs
//! more than the number of frames it discards.

use std::collections::{BTreeMap, BTreeSet};

/// A variable binding visible from its depth onwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub line: usize,
}

/// Variable bindings per indentation depth, in insertion order
#[derive(Debug, Default)]
pub struct ScopeTable {
    frames: BTreeMap<usize, Vec<Binding>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, depth: usize, name: &str, line: usize) {
        self.frames.entry(depth).or_default().push(Binding {
            name: name.to_string(),
            line,
        });
    }

    /// Drop every frame at `depth` or deeper
    pub fn clear_from(&mut self, depth: usize) {
        self.frames.split_off(&depth);
    }

    /// Find the nearest enclosing binding of `name` among frames at `max_depth` or shallower
    ///
    /// Deeper frames are searched first, and within a frame the most recent
    /// binding wins.
    pub fn resolve(&self, name: &str, max_depth: usize) -> Option<&Binding> {
        self.frames
            .range(..=max_depth)
            .rev()
            .flat_map(|(_, bindings)| bindings.iter().rev())
            .find(|binding| binding.name == name)
    }

    pub fn depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }
}

/// The line establishing the active cache key at each depth
#[derive(Debug, Default)]
pub struct CacheTable {
    frames: BTreeMap<usize, usize>,
}

impl CacheTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, depth: usize, line: usize) {
        self.frames.insert(depth, line);
    }

    /// Drop every frame at `depth` or deeper
    pub fn clear_from(&mut self, depth: usize) {
        self.frames.split_off(&depth);
    }

    /// Lines of every cache key governing `depth`
    pub fn governing(&self, depth: usize) -> BTreeSet<usize> {
        self.frames.range(..=depth).map(|(_, line)| *line).collect()
    }

    pub fn depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.keys().copied()
    }
}
