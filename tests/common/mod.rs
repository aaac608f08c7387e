#![allow(dead_code)]

use async_trait::async_trait;
use github_issue_summarizer::archive::ArchiveDecoder;
use github_issue_summarizer::cache::RepoCache;
use github_issue_summarizer::config::SummarizeMode;
use github_issue_summarizer::error::{Result, ToolError};
use github_issue_summarizer::gemini::{GenerationRequest, TextGenerator};
use github_issue_summarizer::github::{
    GitHubApi, Issue, PullRequest, PullRequestMarker, RepoMetadata,
};
use github_issue_summarizer::tools::{ToolDispatcher, ToolSettings};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zip::write::FileOptions;
use zip::ZipWriter;

/// In-memory GitHub that counts every call
#[derive(Default)]
pub struct FakeGitHub {
    pub issues: HashMap<u64, Issue>,
    pub pulls: HashMap<u64, PullRequest>,
    pub open_issues: Vec<Issue>,
    pub default_branch: Option<String>,
    pub archive: Vec<u8>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.insert(issue.number, issue);
        self
    }

    pub fn with_pull(mut self, pull: PullRequest) -> Self {
        self.pulls.insert(pull.number, pull);
        self
    }

    pub fn with_open_issues(mut self, issues: Vec<Issue>) -> Self {
        self.open_issues = issues;
        self
    }

    pub fn with_archive(mut self, branch: &str, archive: Vec<u8>) -> Self {
        self.default_branch = Some(branch.to_string());
        self.archive = archive;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(call);
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn get_issue(&self, owner: &str, repo: &str, number: u64) -> Result<Issue> {
        self.record(format!("issue {}/{}#{}", owner, repo, number));
        self.issues
            .get(&number)
            .cloned()
            .ok_or_else(|| ToolError::GitHubApi(format!("issue {} not found", number)))
    }

    async fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequest> {
        self.record(format!("pull {}/{}#{}", owner, repo, number));
        self.pulls
            .get(&number)
            .cloned()
            .ok_or_else(|| ToolError::GitHubApi(format!("pull {} not found", number)))
    }

    async fn list_open_issues(&self, owner: &str, repo: &str, limit: usize) -> Result<Vec<Issue>> {
        self.record(format!("list {}/{} limit {}", owner, repo, limit));
        Ok(self.open_issues.iter().take(limit).cloned().collect())
    }

    async fn get_repo_metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata> {
        self.record(format!("repo {}/{}", owner, repo));
        self.default_branch
            .clone()
            .map(|default_branch| RepoMetadata { default_branch })
            .ok_or_else(|| {
                ToolError::GitHubApi("GET /repos failed with HTTP 404: Not Found".into())
            })
    }

    async fn get_archive(&self, owner: &str, repo: &str, branch: &str) -> Result<Vec<u8>> {
        self.record(format!("zipball {}/{}@{}", owner, repo, branch));
        Ok(self.archive.clone())
    }
}

/// Text generator that echoes prompts and counts calls
#[derive(Default)]
pub struct FakeGenerator {
    /// Prompts containing this marker fail
    pub fail_on: Option<String>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(marker: &str) -> Self {
        Self {
            fail_on: Some(marker.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(marker) = &self.fail_on {
            if request.prompt.contains(marker.as_str()) {
                return Err(ToolError::LLM("quota exceeded".into()));
            }
        }
        Ok(format!("summary ({} chars)", request.prompt.len()))
    }
}

pub fn issue(number: u64, title: &str, body: Option<&str>) -> Issue {
    Issue {
        number,
        title: title.to_string(),
        body: body.map(str::to_string),
        state: Some("open".to_string()),
        html_url: None,
        pull_request: None,
    }
}

pub fn pull_issue(number: u64, title: &str) -> Issue {
    Issue {
        pull_request: Some(PullRequestMarker {
            url: None,
            html_url: None,
        }),
        ..issue(number, title, None)
    }
}

pub fn pull(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        body: Some("Fixes the hydration mismatch".to_string()),
        state: Some("closed".to_string()),
        merged: Some(true),
        additions: Some(12),
        deletions: Some(3),
        changed_files: Some(2),
    }
}

/// Builds an in-memory zip archive
pub fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn settings(mode: SummarizeMode) -> ToolSettings {
    ToolSettings {
        summarize_mode: mode,
        ..ToolSettings::default()
    }
}

pub fn dispatcher(
    github: Arc<FakeGitHub>,
    generator: Arc<FakeGenerator>,
    mode: SummarizeMode,
    temp_dir: &Path,
) -> ToolDispatcher {
    ToolDispatcher::new(
        github,
        generator,
        ArchiveDecoder::new(1024 * 1024, temp_dir),
        RepoCache::new(Duration::from_secs(60)),
        settings(mode),
    )
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
