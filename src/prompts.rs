//! Prompt templates sent to the summarization service
//!
//! Placeholders are written as `{name}` and substituted by [`fill`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// System instruction shared by single issue and pull request summaries
pub const TRIAGE_SYSTEM_INSTRUCTION: &str = "You are a senior software engineer who triages \
GitHub issues and pull requests for contributors. Answer in plain text, be concrete and brief.";

/// Pull request prompt; the answer is capped by `pr_summary_max_tokens`
pub const PULL_REQUEST_SUMMARY: &str = r#"
Summarize the following GitHub pull request in about 50 words.
Then state the difficulty of the change (Easy, Medium or Hard) and describe in one or two
sentences what the change fixes and how.

Title: {title}
State: {state}
Changed files: {changed_files} (+{additions} / -{deletions})

Description:
{body}
"#;

/// Issue prompt asking for a summary, a fix, difficulty and a time estimate
pub const ISSUE_SUMMARY: &str = r#"
Analyze the following GitHub issue and respond with these sections:
Summary: about 50 words describing the problem.
Suggested fix: concrete steps or code areas a contributor should look at.
Difficulty: exactly one of Easy, Medium or Hard.
Time estimate: how long an experienced contributor would need.

Title: {title}

Body:
{body}
{images}"#;

/// Short prompt used for each issue of a repository-wide batch
pub const REPO_ISSUE_SUMMARY: &str = "Summarize this in 50 words: {title}\n{body}";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Substitutes every `{key}` in `template` with its value in a single pass
///
/// Values are inserted verbatim, so braces inside issue text are never expanded.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(key, _)| *key == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .trim()
        .to_string()
}
