use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::warn;

use super::error::GitHubError;
use crate::event::CommitRef;
use crate::gate::StatusRecord;

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("ops-build-gate/", env!("CARGO_PKG_VERSION"));
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Read access to the status list of a commit.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    /// Returns every status record for `commit`, in the order the provider
    /// reports them (most recent first for GitHub).
    async fn list_statuses(&self, commit: &CommitRef) -> Result<Vec<StatusRecord>, GitHubError>;
}

pub struct GitHubClient {
    token: String,
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client for the API at `base_url` (`GITHUB_API_URL` on runners).
    pub fn with_base_url(token: String, base_url: String) -> Result<Self, GitHubError> {
        if token.is_empty() {
            warn!("no GitHub token configured, querying statuses anonymously");
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            token,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn statuses_url(&self, commit: &CommitRef) -> String {
        format!(
            "{}/repos/{}/{}/commits/{}/statuses?per_page=100",
            self.base_url, commit.owner, commit.repo, commit.sha
        )
    }
}

impl StatusSource for GitHubClient {
    async fn list_statuses(&self, commit: &CommitRef) -> Result<Vec<StatusRecord>, GitHubError> {
        let mut request = self
            .client
            .get(self.statuses_url(commit))
            .header("accept", "application/vnd.github+json")
            .header("x-github-api-version", API_VERSION);
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();

        let quota_exhausted = status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0");
        if status == StatusCode::TOO_MANY_REQUESTS || quota_exhausted {
            let retry_after_secs = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(GitHubError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GitHubError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let records = response.json::<Vec<StatusRecord>>().await?;
        Ok(records)
    }
}
