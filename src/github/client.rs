use super::{GitHubApi, Issue, PullRequest, RepoMetadata};
use crate::config::Config;
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const CLIENT_USER_AGENT: &str = "github-issue-summarizer";

/// REST client for the GitHub endpoints the tools need
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Creates a client that authenticates every request with `token`
    pub fn new(base_url: &str, token: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        let auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ToolError::Config("GitHub token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ToolError::Config(format!("Failed to create GitHub client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.github_api_base,
            config.github_token()?,
            config.http_timeout_secs.map(Duration::from_secs),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(path).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(ToolError::GitHubApi(format!(
                "GET {} failed with HTTP {}: {}",
                path,
                status.as_u16(),
                detail
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue> {
        self.get_json(&format!("/repos/{}/{}/issues/{}", owner, repo, number))
            .await
    }

    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest> {
        self.get_json(&format!("/repos/{}/{}/pulls/{}", owner, repo, number))
            .await
    }

    async fn list_open_issues(&self, owner: &str, repo: &str, limit: usize) -> Result<Vec<Issue>> {
        let per_page = limit.clamp(1, 100);
        let mut issues: Vec<Issue> = self
            .get_json(&format!(
                "/repos/{}/{}/issues?state=open&per_page={}",
                owner, repo, per_page
            ))
            .await?;
        issues.truncate(limit);
        Ok(issues)
    }

    async fn get_repo_metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata> {
        self.get_json(&format!("/repos/{}/{}", owner, repo)).await
    }

    async fn get_archive(&self, owner: &str, repo: &str, branch: &str) -> Result<Vec<u8>> {
        let response = self
            .send(&format!("/repos/{}/{}/zipball/{}", owner, repo, branch))
            .await?;
        let bytes = response.bytes().await?;
        debug!("Downloaded {} byte archive for {}/{}", bytes.len(), owner, repo);
        Ok(bytes.to_vec())
    }
}
