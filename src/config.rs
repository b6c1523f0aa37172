//! cache-check configuration management.
//!
//! Settings come from an optional `.cache-check.toml` at the repository root,
//! then from `CACHE_CHECK_*` environment variables, which win.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CacheCheckError;
use crate::git::HunkMode;

/// File name looked up at the repository root
pub const CONFIG_FILE_NAME: &str = ".cache-check.toml";

pub const BASE_REF_ENV: &str = "CACHE_CHECK_BASE_REF";
pub const TEMPLATE_ROOT_ENV: &str = "CACHE_CHECK_TEMPLATE_ROOT";
pub const STRICT_HUNKS_ENV: &str = "CACHE_CHECK_STRICT_HUNKS";
pub const LOG_ENV: &str = "CACHE_CHECK_LOG";

/// cache-check configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Reference the change is compared against
    #[serde(default = "default_base_ref")]
    pub base_ref: String,

    /// Directory holding the templates, relative to the repository root
    #[serde(default = "default_template_root")]
    pub template_root: PathBuf,

    /// Extension of template files, without the dot
    #[serde(default = "default_template_extension")]
    pub template_extension: String,

    /// Expand hunk headers to exactly the added lines
    #[serde(default)]
    pub strict_hunks: bool,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_ref() -> String {
    "origin/master".to_string()
}

fn default_template_root() -> PathBuf {
    PathBuf::from("app/views")
}

fn default_template_extension() -> String {
    "haml".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            base_ref: default_base_ref(),
            template_root: default_template_root(),
            template_extension: default_template_extension(),
            strict_hunks: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl CheckConfig {
    /// Load configuration for the repository at `repo_root`, applying environment overrides
    pub fn load(repo_root: &Path) -> Result<Self, CacheCheckError> {
        let mut config = Self::load_from(&repo_root.join(CONFIG_FILE_NAME))?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, CacheCheckError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;

        toml::from_str(&content).map_err(|e| CacheCheckError::ConfigError {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_ref) = lookup(BASE_REF_ENV) {
            self.base_ref = base_ref;
        }
        if let Some(root) = lookup(TEMPLATE_ROOT_ENV) {
            self.template_root = PathBuf::from(root);
        }
        if let Some(strict) = lookup(STRICT_HUNKS_ENV) {
            self.strict_hunks = matches!(strict.trim(), "1" | "true" | "yes");
        }
        if let Some(level) = lookup(LOG_ENV) {
            self.logging.level = level;
        }
    }

    pub fn hunk_mode(&self) -> HunkMode {
        HunkMode::from_strict(self.strict_hunks)
    }
}
