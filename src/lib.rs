//! cache-check: stale fragment cache detection for HAML templates
//!
//! Given a change against a base reference, this library finds every cached
//! template fragment that renders a modified partial while its cache key was
//! left untouched. Such a fragment would keep serving the old partial.
//!
//! The analysis is purely syntactic: indentation is treated as block scope,
//! and a handful of line matchers pick out variable bindings, cache blocks,
//! and partial renders.
//!
//! # Example
//!
//! ```ignore
//! use cache_check::{CacheCheck, CheckConfig};
//!
//! let check = CacheCheck::new(".", CheckConfig::default());
//! for violation in check.analyze()?.violations {
//!     println!("{}", violation);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod coverage;
pub mod error;
pub mod git;
pub mod hierarchy;
pub mod locator;
pub mod notify;
pub mod runner;
pub mod search;

// Re-export commonly used types
pub use cli::Cli;
pub use config::CheckConfig;
pub use coverage::{check_container, Violation};
pub use error::{CacheCheckError, Result};
pub use hierarchy::{HierarchyParser, RenderSite};
pub use locator::{CandidateAlias, ChangedPartial, PartialLocator, SearchScope};
pub use runner::{CacheCheck, Report};
