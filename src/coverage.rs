//! Cache-key coverage checking
//!
//! A render site is covered when every line of its effective cache key was
//! touched by the current change.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::hierarchy::RenderSite;

/// A cached render site whose key did not change alongside its partial
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Violation {
    pub file: PathBuf,
    pub alias: String,
    pub uncovered_lines: BTreeSet<usize>,
}

impl Violation {
    /// Human-readable comment body for this violation
    pub fn message(&self) -> String {
        format!(
            "Cache not invalidated: you changed the partial '{}', but the cache key in {} at lines [{}] was left untouched.",
            self.alias,
            self.file.display(),
            self.lines_label()
        )
    }

    fn lines_label(&self) -> String {
        self.uncovered_lines
            .iter()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({})", self.file.display(), self.lines_label(), self.alias)
    }
}

/// Check one container's render sites against the lines changed in it
///
/// Only sites whose alias is exactly one of `aliases` are considered.
pub fn check_container<'a, I>(
    sites: &[RenderSite],
    aliases: I,
    changed_lines: &BTreeSet<usize>,
) -> Vec<Violation>
where
    I: IntoIterator<Item = &'a str>,
{
    let aliases: BTreeSet<&str> = aliases.into_iter().collect();

    sites
        .iter()
        .filter(|site| aliases.contains(site.alias.as_str()))
        .filter_map(|site| {
            let uncovered_lines: BTreeSet<usize> =
                site.required_lines.difference(changed_lines).copied().collect();

            (!uncovered_lines.is_empty()).then(|| Violation {
                file: site.file.clone(),
                alias: site.alias.clone(),
                uncovered_lines,
            })
        })
        .collect()
}
