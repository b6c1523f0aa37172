//! Unified diff hunk headers to changed line numbers

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static ADDED_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+(\d+)(?:,(\d+))?").expect("valid regex"));

/// How the `+start,count` range of a hunk header is expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HunkMode {
    /// `start..=start+count`, one line past the hunk; matches historical reports
    #[default]
    Inherited,
    /// `start..start+count`, exactly the added lines
    Strict,
}

impl HunkMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Inherited
        }
    }
}

/// Expand one hunk header into the new-file line numbers it covers
///
/// Returns `None` when the header has no `+start[,count]` token or the range
/// overflows. A missing count means a single line in both modes.
pub fn parse_hunk_header(header: &str, mode: HunkMode) -> Option<BTreeSet<usize>> {
    let caps = ADDED_RANGE.captures(header)?;
    let start: usize = caps.get(1)?.as_str().parse().ok()?;
    let count: Option<usize> = match caps.get(2) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    let lines = match (mode, count) {
        (_, None) => BTreeSet::from([start]),
        (HunkMode::Inherited, Some(count)) => (start..=start.checked_add(count)?).collect(),
        (HunkMode::Strict, Some(count)) => (start..start.checked_add(count)?).collect(),
    };

    Some(lines)
}

/// Collect changed lines from every hunk header in a diff
///
/// Headers that fail to parse are logged and skipped.
pub fn changed_lines_from_diff(diff: &str, mode: HunkMode) -> BTreeSet<usize> {
    let mut lines = BTreeSet::new();

    for header in diff.lines().filter(|line| line.starts_with("@@")) {
        match parse_hunk_header(header, mode) {
            Some(hunk) => lines.extend(hunk),
            None => tracing::warn!("Malformed hunk header, ignoring: {}", header),
        }
    }

    lines
}
