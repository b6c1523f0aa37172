//! TestRepo builder for integration testing against real git history

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

use cache_check::notify::CommentSink;
use cache_check::{CacheCheck, CheckConfig};

/// Name of the branch marking the base of the change under test
pub const BASE_BRANCH: &str = "base";

/// Builder for creating test repository structures
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new git repository with user identity configured
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.email", "test@test.com"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    /// Get the path to the test repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add or overwrite a file with the given content
    pub fn add_file(&self, relative_path: &str, content: &str) -> &Self {
        let full_path = self.dir.path().join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        self
    }

    /// Commit everything and mark the commit as the base of the change
    pub fn commit_base(&self) -> &Self {
        self.commit("base");
        self.git(&["branch", BASE_BRANCH]);
        self
    }

    /// Create a git commit with all files
    pub fn commit(&self, message: &str) -> &Self {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self
    }

    /// Analysis configured against the base branch
    pub fn check(&self) -> CacheCheck {
        let config = CheckConfig {
            base_ref: BASE_BRANCH.to_string(),
            ..CheckConfig::default()
        };
        CacheCheck::new(self.path(), config)
    }

    /// Run the cache-check binary inside the repository
    pub fn run_cli(&self, args: &[&str], envs: &[(&str, &str)]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_cache-check"));
        cmd.current_dir(self.path())
            .args(args)
            .env_remove("GITHUB_EVENT_PATH")
            .env_remove("RUST_LOG")
            .env("CACHE_CHECK_BASE_REF", BASE_BRANCH);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        cmd.output().expect("Failed to run CLI")
    }

    fn git(&self, args: &[&str]) {
        let output = Command::new("git")
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Comment sink that keeps every body in memory
#[derive(Default)]
pub struct RecordingSink {
    pub bodies: Vec<String>,
}

impl CommentSink for RecordingSink {
    fn post(&mut self, body: &str) -> cache_check::Result<()> {
        self.bodies.push(body.to_string());
        Ok(())
    }
}
