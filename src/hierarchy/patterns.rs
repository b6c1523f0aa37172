//! Line matchers for HAML templates
//!
//! Each matcher classifies a single line independently and returns its
//! captures, if any. A line may match several categories at once (a render
//! call that also binds a cache predicate, for instance).

use once_cell::sync::Lazy;
use regex::Regex;

static VARIABLE_BINDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*(@?\w+)\s*=").expect("valid regex"));

static INLINE_CACHE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\s*[-=]\s*cache\s*(?:\[['":]|%)"#).expect("valid regex"));

static VARIABLE_CACHE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*[-=]\s*cache\s+\["\w*#\{(\w+)\}"#).expect("valid regex"));

static PARTIAL_RENDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"=\s*render\s+(?:partial|layout):\s*["']([\w/]+)["']"#).expect("valid regex")
});

static INLINE_CACHED_PREDICATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"cached:\s+->\s*\(\w+\)\s+\{\s+\[['":]"#).expect("valid regex")
});

static VARIABLE_CACHED_PREDICATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"cached:\s+->\s*\(\w+\)\s+\{\s+\[(@?\w+)").expect("valid regex")
});

/// How a cache key is established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKey<'a> {
    /// The key is spelled out on the line itself
    Inline,
    /// The key interpolates a variable bound earlier in the template
    Variable(&'a str),
}

/// A `render partial:` or `render layout:` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialRender<'a> {
    pub alias: &'a str,
    /// Cache predicate passed via `cached: ->(x) { [...] }`
    pub predicate: Option<CacheKey<'a>>,
}

/// Number of leading whitespace characters
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// `- name = value`
pub fn variable_binding(line: &str) -> Option<&str> {
    VARIABLE_BINDING
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `- cache [...]`, `- cache ["key#{var}"]` or `- cache %w(...)`
///
/// The variable-keyed form wins when a line could be read either way.
pub fn cache_declaration(line: &str) -> Option<CacheKey<'_>> {
    if let Some(var) = VARIABLE_CACHE.captures(line).and_then(|caps| caps.get(1)) {
        return Some(CacheKey::Variable(var.as_str()));
    }
    INLINE_CACHE.is_match(line).then_some(CacheKey::Inline)
}

/// `= render partial: 'alias'` with an optional `cached:` predicate
pub fn partial_render(line: &str) -> Option<PartialRender<'_>> {
    let alias = PARTIAL_RENDER.captures(line)?.get(1)?.as_str();

    let predicate = if INLINE_CACHED_PREDICATE.is_match(line) {
        Some(CacheKey::Inline)
    } else {
        VARIABLE_CACHED_PREDICATE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| CacheKey::Variable(m.as_str()))
    };

    Some(PartialRender { alias, predicate })
}
