use super::repo_code::fetch_repo_code;
use super::request::{ToolCall, ToolInvocationRequest};
use super::response::{ResponseEnvelope, RpcError, ToolOutput};
use super::summarize::{summarize_issue, summarize_repo_issues};
use super::{catalog, ToolDescriptor, ToolSettings};
use crate::archive::ArchiveDecoder;
use crate::cache::RepoCache;
use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::gemini::{GeminiClient, TextGenerator};
use crate::github::{GitHubApi, GitHubClient};
use std::sync::Arc;
use tracing::{error, info};

/// Validates tool requests, runs the matching handler and wraps the outcome
pub struct ToolDispatcher {
    github: Arc<dyn GitHubApi>,
    generator: Arc<dyn TextGenerator>,
    decoder: ArchiveDecoder,
    cache: RepoCache,
    settings: ToolSettings,
}

impl ToolDispatcher {
    /// Creates a dispatcher from its collaborators
    pub fn new(
        github: Arc<dyn GitHubApi>,
        generator: Arc<dyn TextGenerator>,
        decoder: ArchiveDecoder,
        cache: RepoCache,
        settings: ToolSettings,
    ) -> Self {
        Self {
            github,
            generator,
            decoder,
            cache,
            settings,
        }
    }

    /// Builds a dispatcher backed by the real GitHub and Gemini clients
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(GitHubClient::from_config(config)?),
            Arc::new(GeminiClient::from_config(config)?),
            ArchiveDecoder::from_config(config),
            RepoCache::new(config.cache_ttl()),
            ToolSettings::from(config),
        ))
    }

    /// Tools served by this dispatcher
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        catalog(self.settings.summarize_mode)
    }

    /// Cache holding decoded repositories
    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }

    /// Executes a tool request
    ///
    /// Returns `Err` only for client errors (missing fields, unknown tool, bad
    /// parameters), which are detected before any handler runs. Handler
    /// failures become an `error` envelope.
    pub async fn execute(&self, request: ToolInvocationRequest) -> Result<ResponseEnvelope> {
        let id = request.response_id();
        let call = ToolCall::from_request(&request, self.settings.summarize_mode)?;
        let tool = call.tool_name();
        info!(id, tool, "Executing tool");

        let outcome = self
            .run(call)
            .await
            .and_then(|output| serde_json::to_value(output).map_err(ToolError::from));

        Ok(match outcome {
            Ok(result) => ResponseEnvelope::success(id, result),
            Err(e) => {
                error!(id, tool, "Tool failed: {}", e);
                ResponseEnvelope::failure(id, RpcError::from(&e))
            }
        })
    }

    async fn run(&self, call: ToolCall) -> Result<ToolOutput> {
        match call {
            ToolCall::SummarizeIssue { url } => summarize_issue(
                self.github.as_ref(),
                self.generator.as_ref(),
                &url,
                self.settings.pr_summary_max_tokens,
            )
            .await
            .map(ToolOutput::Issue)
            .map_err(|e| e.context("Failed to summarize issue")),
            ToolCall::SummarizeRepoIssues { repo } => summarize_repo_issues(
                self.github.as_ref(),
                self.generator.as_ref(),
                &repo,
                self.settings.max_repo_issues,
            )
            .await
            .map_err(|e| e.context("Failed to summarize issues")),
            ToolCall::FetchRepoCode { repo } => {
                fetch_repo_code(self.github.as_ref(), &self.decoder, &self.cache, &repo)
                    .await
                    .map(ToolOutput::RepoCode)
                    .map_err(|e| e.context("Failed to fetch repository code"))
            }
        }
    }
}
