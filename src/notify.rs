//! Pull request comments for detected violations
//!
//! The comments endpoint comes from the CI event payload; delivery goes
//! through the [`CommentSink`] trait so the batch loop does not care whether
//! comments reach GitHub or a test recorder.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::coverage::Violation;
use crate::error::{CacheCheckError, Result};

/// Environment variable naming the event payload file
pub const EVENT_PATH_ENV: &str = "GITHUB_EVENT_PATH";

/// The part of a pull request event this tool reads
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub pull_request: PullRequest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    /// Endpoint accepting new issue comments
    pub comments_url: String,
}

impl EventPayload {
    /// Load the payload named by `GITHUB_EVENT_PATH`
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(EVENT_PATH_ENV).map_err(|_| CacheCheckError::MissingEventPayload {
            message: format!("{} is not set", EVENT_PATH_ENV),
        })?;
        Self::load(Path::new(&path))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CacheCheckError::MissingEventPayload {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CacheCheckError::MalformedEventPayload {
            message: e.to_string(),
        })
    }

    pub fn comments_url(&self) -> &str {
        &self.pull_request.comments_url
    }
}

/// Destination for violation comments
pub trait CommentSink {
    fn post(&mut self, body: &str) -> Result<()>;
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Posts comments to the GitHub REST API
pub struct GitHubCommentSink {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
    url: String,
    token: String,
}

impl GitHubCommentSink {
    /// Sink that only talks HTTPS, since every request carries the token
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cache-check/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .https_only(true)
            .build()
            .map_err(|e| CacheCheckError::DeliveryFailure {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Self::with_client(url, token, client)
    }

    fn with_client(
        url: impl Into<String>,
        token: impl Into<String>,
        client: reqwest::Client,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            client,
            url: url.into(),
            token: token.into(),
        })
    }

    async fn post_async(&self, body: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.token)
            .json(&CommentBody { body })
            .send()
            .await
            .map_err(|e| CacheCheckError::DeliveryFailure {
                message: format!("POST {} failed: {}", self.url, e),
            })?;

        let status = response.status();
        tracing::info!("Posted comment to {}: HTTP {}", self.url, status);

        if !status.is_success() {
            return Err(CacheCheckError::DeliveryFailure {
                message: format!("Comment endpoint returned HTTP {}: {}", status, self.url),
            });
        }

        Ok(())
    }
}

impl CommentSink for GitHubCommentSink {
    fn post(&mut self, body: &str) -> Result<()> {
        self.runtime.block_on(self.post_async(body))
    }
}

/// Post one comment per distinct violation, in first-seen order
///
/// Stops at the first delivery failure. Returns the number of comments posted.
pub fn notify_all(sink: &mut dyn CommentSink, violations: &[Violation]) -> Result<usize> {
    let mut seen = HashSet::new();
    let mut posted = 0;

    for violation in violations {
        if !seen.insert(violation) {
            continue;
        }
        sink.post(&violation.message())?;
        posted += 1;
    }

    Ok(posted)
}
