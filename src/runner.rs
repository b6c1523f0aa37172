//! The batch loop: changed partials → containers → violations
//!
//! Containers are independent, so each one is parsed, diffed, and checked on
//! rayon's pool. Any error, an unresolved cache variable in particular,
//! aborts the whole analysis before a single comment is posted.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::CheckConfig;
use crate::coverage::{check_container, Violation};
use crate::error::Result;
use crate::git;
use crate::hierarchy;
use crate::locator::{ChangedPartial, PartialLocator};
use crate::notify::{notify_all, CommentSink};

/// Outcome of one analysis run
#[derive(Debug, Default)]
pub struct Report {
    pub partials: Vec<ChangedPartial>,
    pub containers: usize,
    pub violations: Vec<Violation>,
}

/// Analysis of one repository against its configured base reference
#[derive(Debug, Clone)]
pub struct CacheCheck {
    repo_root: PathBuf,
    config: CheckConfig,
}

impl CacheCheck {
    pub fn new(repo_root: impl Into<PathBuf>, config: CheckConfig) -> Self {
        Self {
            repo_root: repo_root.into(),
            config,
        }
    }

    /// Partials changed since the base reference
    pub fn changed_partials(&self) -> Result<Vec<ChangedPartial>> {
        let files = git::get_changed_files(&self.config.base_ref, Some(&self.repo_root))?;

        Ok(files
            .iter()
            .filter_map(|path| {
                ChangedPartial::from_path(
                    path,
                    &self.config.template_root,
                    &self.config.template_extension,
                )
            })
            .collect())
    }

    /// Run the full analysis without delivering anything
    pub fn analyze(&self) -> Result<Report> {
        let partials = self.changed_partials()?;
        tracing::info!("{} changed partial(s) since {}", partials.len(), self.config.base_ref);

        if partials.is_empty() {
            return Ok(Report::default());
        }

        let locator = PartialLocator::new(
            &self.repo_root,
            &self.config.template_root,
            &self.config.template_extension,
        );
        let containers: Vec<_> = locator.locate(&partials)?.into_iter().collect();

        let violations = containers
            .par_iter()
            .map(|(file, aliases)| {
                self.analyze_container(file, aliases.iter().map(String::as_str))
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        Ok(Report {
            partials,
            containers: containers.len(),
            violations,
        })
    }

    /// Parse one container and check its render sites for the given aliases
    pub fn analyze_container<'a, I>(&self, file: &Path, aliases: I) -> Result<Vec<Violation>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let aliases: Vec<&str> = aliases.into_iter().collect();
        let sites = hierarchy::parse_file(&self.repo_root.join(file), file)?;

        if !sites.iter().any(|site| aliases.contains(&site.alias.as_str())) {
            tracing::debug!("{}: no cached render of {:?}", file.display(), aliases);
            return Ok(Vec::new());
        }

        let changed = git::changed_lines(
            &self.config.base_ref,
            file,
            self.config.hunk_mode(),
            Some(&self.repo_root),
        )?;
        tracing::debug!(
            "{}: {} render site(s), changed lines {:?}",
            file.display(),
            sites.len(),
            changed
        );

        Ok(check_container(&sites, aliases, &changed))
    }

    /// Analyze, then post one comment per violation
    pub fn run(&self, sink: &mut dyn CommentSink) -> Result<Report> {
        let report = self.analyze()?;

        if report.violations.is_empty() {
            tracing::info!("No stale cache keys in {} container(s)", report.containers);
            return Ok(report);
        }

        let posted = notify_all(sink, &report.violations)?;
        tracing::info!("Posted {} comment(s)", posted);

        Ok(report)
    }
}
