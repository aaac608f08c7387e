use serde::{Deserialize, Serialize};

/// Issue record as returned by `GET /repos/{owner}/{repo}/issues/{number}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Markdown body, absent when empty
    #[serde(default)]
    pub body: Option<String>,
    /// `open` or `closed`
    #[serde(default)]
    pub state: Option<String>,
    /// Browser URL
    #[serde(default)]
    pub html_url: Option<String>,
    /// Present only when the issue is also a pull request
    #[serde(default)]
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    /// Whether GitHub flagged this issue as a pull request
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Body as text, empty when absent
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Link block GitHub attaches to issues that are pull requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestMarker {
    /// API URL of the pull request
    #[serde(default)]
    pub url: Option<String>,
    /// Browser URL of the pull request
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Pull request record as returned by `GET /repos/{owner}/{repo}/pulls/{number}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Pull request title
    pub title: String,
    /// Markdown description
    #[serde(default)]
    pub body: Option<String>,
    /// `open` or `closed`
    #[serde(default)]
    pub state: Option<String>,
    /// Whether the pull request was merged
    #[serde(default)]
    pub merged: Option<bool>,
    /// Added lines
    #[serde(default)]
    pub additions: Option<u64>,
    /// Removed lines
    #[serde(default)]
    pub deletions: Option<u64>,
    /// Number of touched files
    #[serde(default)]
    pub changed_files: Option<u64>,
}

/// The subset of repository metadata the tools rely on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoMetadata {
    /// Branch whose archive is downloaded
    pub default_branch: String,
}
