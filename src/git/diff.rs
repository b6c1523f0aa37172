//! Git diff operations

use std::collections::BTreeSet;
use std::path::Path;

use super::git_command;
use super::hunks::{self, HunkMode};
use crate::error::Result;

/// Get the paths changed between `base_ref` and the working tree
///
/// Paths are relative to the repository root, one per line of
/// `git diff --name-only` output.
pub fn get_changed_files(base_ref: &str, cwd: Option<&Path>) -> Result<Vec<String>> {
    let output = git_command(&["diff", "--name-only", base_ref], cwd)?;
    Ok(parse_name_only_output(&output))
}

fn parse_name_only_output(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Get the zero-context diff of one file since it diverged from `base_ref`
pub fn get_file_diff(base_ref: &str, file: &Path, cwd: Option<&Path>) -> Result<String> {
    let range = format!("{}...", base_ref);
    let file = file.to_string_lossy();
    git_command(&["diff", "-U0", &range, "--", &file], cwd)
}

/// Lines of `file` added or changed since `base_ref`
pub fn changed_lines(
    base_ref: &str,
    file: &Path,
    mode: HunkMode,
    cwd: Option<&Path>,
) -> Result<BTreeSet<usize>> {
    let diff = get_file_diff(base_ref, file, cwd)?;
    Ok(hunks::changed_lines_from_diff(&diff, mode))
}
