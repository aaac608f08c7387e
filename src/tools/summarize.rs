use super::response::{IssueSummary, Notice, ToolOutput};
use crate::config::MAX_REPO_ISSUES;
use crate::error::Result;
use crate::gemini::{GenerationRequest, TextGenerator};
use crate::github::{GitHubApi, Issue, IssueRef, RepoRef};
use crate::prompts::{self, fill};
use futures::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)!\[[^\]]*\]\(\s*<?([^)\s>]+)>?[^)]*\)|<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#,
    )
    .expect("image pattern is valid")
});

/// Image URLs embedded in a markdown body, in order of appearance, without duplicates
///
/// Both `![alt](url "title")` and `<img src="url">` forms are recognized.
pub fn extract_image_urls(body: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for caps in IMAGE_RE.captures_iter(body) {
        if let Some(url) = caps.get(1).or_else(|| caps.get(2)) {
            let url = url.as_str().to_string();
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
    }
    urls
}

/// Summarizes the issue or pull request behind a GitHub URL
pub(crate) async fn summarize_issue(
    github: &dyn GitHubApi,
    generator: &dyn TextGenerator,
    url: &str,
    pr_max_tokens: u32,
) -> Result<IssueSummary> {
    let target = IssueRef::parse(url)?;
    let issue = github
        .get_issue(&target.owner, &target.repo, target.number)
        .await?;

    if issue.is_pull_request() {
        let pull = github
            .get_pull_request(&target.owner, &target.repo, target.number)
            .await?;
        info!("Summarizing pull request {}/{}#{}", target.owner, target.repo, pull.number);

        let changed_files = count(pull.changed_files);
        let additions = count(pull.additions);
        let deletions = count(pull.deletions);
        let prompt = fill(
            prompts::PULL_REQUEST_SUMMARY,
            &[
                ("title", pull.title.as_str()),
                ("state", pull_state(pull.state.as_deref(), pull.merged)),
                ("changed_files", changed_files.as_str()),
                ("additions", additions.as_str()),
                ("deletions", deletions.as_str()),
                ("body", pull.body.as_deref().unwrap_or(issue.body_text())),
            ],
        );
        let summary = generator
            .generate(
                GenerationRequest::new(prompt)
                    .with_system_instruction(prompts::TRIAGE_SYSTEM_INSTRUCTION)
                    .with_max_output_tokens(pr_max_tokens),
            )
            .await?;

        return Ok(IssueSummary {
            id: issue.number,
            summary,
            pr_details: Some(true),
            images: None,
        });
    }

    info!("Summarizing issue {}/{}#{}", target.owner, target.repo, issue.number);
    let images = extract_image_urls(issue.body_text());
    debug!("Found {} images in issue body", images.len());

    let image_section = if images.is_empty() {
        String::new()
    } else {
        let listed: Vec<String> = images.iter().map(|url| format!("- {}", url)).collect();
        format!("\nAttached images:\n{}", listed.join("\n"))
    };
    let prompt = fill(
        prompts::ISSUE_SUMMARY,
        &[
            ("title", issue.title.as_str()),
            ("body", issue.body_text()),
            ("images", image_section.as_str()),
        ],
    );
    let summary = generator
        .generate(
            GenerationRequest::new(prompt)
                .with_system_instruction(prompts::TRIAGE_SYSTEM_INSTRUCTION),
        )
        .await?;

    Ok(IssueSummary {
        id: issue.number,
        summary,
        pr_details: None,
        images: Some(images),
    })
}

/// Summarizes the first `limit` open issues of a repository concurrently
///
/// `limit` is capped at [`MAX_REPO_ISSUES`]. Any single failure fails the whole batch.
pub(crate) async fn summarize_repo_issues(
    github: &dyn GitHubApi,
    generator: &dyn TextGenerator,
    repo: &RepoRef,
    limit: usize,
) -> Result<ToolOutput> {
    let limit = limit.min(MAX_REPO_ISSUES);
    let issues = github
        .list_open_issues(&repo.owner, &repo.name, limit)
        .await?;

    if issues.is_empty() {
        info!("No open issues in {}", repo);
        return Ok(ToolOutput::Notice(Notice {
            message: format!("No open issues found in {}", repo),
        }));
    }

    info!("Summarizing {} open issues in {}", issues.len().min(limit), repo);
    let summaries = try_join_all(
        issues
            .iter()
            .take(limit)
            .map(|issue| summarize_listed_issue(generator, issue)),
    )
    .await?;

    Ok(ToolOutput::Issues(summaries))
}

async fn summarize_listed_issue(
    generator: &dyn TextGenerator,
    issue: &Issue,
) -> Result<IssueSummary> {
    let prompt = fill(
        prompts::REPO_ISSUE_SUMMARY,
        &[("title", issue.title.as_str()), ("body", issue.body_text())],
    );
    let summary = generator.generate(GenerationRequest::new(prompt)).await?;
    Ok(IssueSummary {
        id: issue.number,
        summary,
        pr_details: None,
        images: None,
    })
}

fn pull_state(state: Option<&str>, merged: Option<bool>) -> &str {
    match (state, merged) {
        (_, Some(true)) => "merged",
        (Some(state), _) => state,
        (None, _) => "unknown",
    }
}

fn count(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}
