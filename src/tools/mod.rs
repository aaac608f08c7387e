//! Tool catalog, request validation and dispatch
//!
//! Two tools are served per deployment: one `summarizeIssues` variant (by
//! issue URL or by repository, see [`SummarizeMode`]) and `fetchRepoCode`.

mod dispatcher;
mod repo_code;
mod request;
mod response;
mod summarize;

pub use dispatcher::ToolDispatcher;
pub use request::{ToolCall, ToolInvocationRequest};
pub use response::{IssueSummary, Notice, RepoCodeSummary, ResponseEnvelope, RpcError, ToolOutput};
pub use summarize::extract_image_urls;

use crate::config::{Config, SummarizeMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the summarization tool, in either mode
pub const SUMMARIZE_ISSUES: &str = "summarizeIssues";
/// Name of the repository code tool
pub const FETCH_REPO_CODE: &str = "fetchRepoCode";

/// Schema entry for a single tool parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// JSON type of the parameter
    #[serde(rename = "type")]
    pub kind: String,
    /// What the parameter means
    pub description: String,
}

/// Static description of a tool, as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name used in execute requests
    pub name: String,
    /// What the tool does
    pub description: String,
    /// Parameters by name
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl ToolDescriptor {
    fn new(name: &str, description: &str, params: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: params
                .iter()
                .map(|(param, description)| {
                    (
                        param.to_string(),
                        ParameterSpec {
                            kind: "string".to_string(),
                            description: description.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Tool behaviour knobs taken from [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    /// Which `summarizeIssues` variant is served
    pub summarize_mode: SummarizeMode,
    /// Open issues summarized per repository
    pub max_repo_issues: usize,
    /// Output cap for pull request summaries
    pub pr_summary_max_tokens: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ToolSettings {
    fn from(config: &Config) -> Self {
        Self {
            summarize_mode: config.summarize_mode,
            max_repo_issues: config.max_repo_issues,
            pr_summary_max_tokens: config.pr_summary_max_tokens,
        }
    }
}

/// The tools served in `mode`
pub fn catalog(mode: SummarizeMode) -> Vec<ToolDescriptor> {
    let summarize = match mode {
        SummarizeMode::Url => ToolDescriptor::new(
            SUMMARIZE_ISSUES,
            "Summarizes a specific GitHub issue or PR.",
            &[(
                "url",
                "GitHub issue or PR URL (e.g., https://github.com/vercel/next.js/pull/80974)",
            )],
        ),
        SummarizeMode::Repo => ToolDescriptor::new(
            SUMMARIZE_ISSUES,
            "Summarizes the first open issues of a GitHub repository.",
            &[("repo", "GitHub repository in the format owner/repo")],
        ),
    };

    vec![
        summarize,
        ToolDescriptor::new(
            FETCH_REPO_CODE,
            "Fetches the entire repository code structure.",
            &[("repo", "GitHub repository in the format owner/repo")],
        ),
    ]
}
