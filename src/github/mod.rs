//! GitHub content acquisition
//!
//! Thin typed calls over the GitHub REST API plus the parsers that turn user
//! input into owner/repo/number triples.

mod client;
mod types;

pub use client::GitHubClient;
pub use types::{Issue, PullRequest, PullRequestMarker, RepoMetadata};

use crate::error::{Result, ToolError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static ISSUE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:https?://)?(?:www\.)?github\.com/",
        r"([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)/(issues|pull)/(\d+)(?:[/?#]\S*)?$",
    ))
    .expect("issue URL pattern is valid")
});

static NAME_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("name segment pattern is valid"));

/// Owner and repository names are restricted to GitHub's charset and never `.` or `..`
fn is_valid_segment(segment: &str) -> bool {
    NAME_SEGMENT_RE.is_match(segment) && segment != "." && segment != ".."
}

/// Calls the tool handlers make against GitHub
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Fetches a single issue (pull requests are issues too)
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue>;

    /// Fetches pull request details
    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest>;

    /// Lists open issues, newest first, at most `limit` of them
    async fn list_open_issues(&self, owner: &str, repo: &str, limit: usize) -> Result<Vec<Issue>>;

    /// Fetches repository metadata
    async fn get_repo_metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata>;

    /// Downloads the zipball of `branch`
    async fn get_archive(&self, owner: &str, repo: &str, branch: &str) -> Result<Vec<u8>>;
}

/// Whether a URL points at an issue or a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// `/issues/{number}`
    Issue,
    /// `/pull/{number}`
    Pull,
}

/// An issue or pull request located by URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Issue or pull request number
    pub number: u64,
    /// Which kind of page the URL pointed at
    pub kind: IssueKind,
}

impl IssueRef {
    /// Parses a `github.com/{owner}/{repo}/(issues|pull)/{number}` URL
    ///
    /// The host must be exactly `github.com` (optionally `www.`).
    pub fn parse(url: &str) -> Result<Self> {
        let caps = ISSUE_URL_RE
            .captures(url.trim())
            .filter(|caps| is_valid_segment(&caps[1]) && is_valid_segment(&caps[2]))
            .ok_or_else(|| ToolError::InvalidGitHubUrl(url.to_string()))?;

        let number = caps[4]
            .parse()
            .map_err(|_| ToolError::InvalidGitHubUrl(url.to_string()))?;
        let kind = if &caps[3] == "pull" {
            IssueKind::Pull
        } else {
            IssueKind::Issue
        };

        Ok(Self {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            number,
            kind,
        })
    }
}

/// A repository identified as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// User or organization that owns the repository
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Parses `owner/name`; both halves must use GitHub's name charset
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || {
            ToolError::Validation(format!(
                "Invalid repository '{}': expected the format owner/repo",
                input
            ))
        };

        let (owner, name) = input.trim().split_once('/').ok_or_else(invalid)?;
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
