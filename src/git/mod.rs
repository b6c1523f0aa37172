//! Git operations for diff analysis
//!
//! This module provides the git integration the check needs: which files
//! changed against the base reference, and which lines changed inside one
//! file. It uses subprocess calls to git for maximum compatibility.

mod diff;
pub mod hunks;

pub use diff::{changed_lines, get_changed_files, get_file_diff};
pub use hunks::{parse_hunk_header, HunkMode};

use std::path::Path;
use std::process::Command;

use crate::error::{CacheCheckError, Result};

/// Run a git command and return stdout as string
pub fn git_command(args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut cmd = Command::new("git");
    cmd.args(args);

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().map_err(|e| CacheCheckError::GitError {
        message: format!("Failed to execute git: {}", e),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CacheCheckError::GitError {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
