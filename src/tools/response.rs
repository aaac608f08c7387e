use crate::error::{ToolError, INTERNAL_ERROR_CODE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{ jsonrpc, result | error, id }` wrapper around every execution outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Always `2.0`
    pub jsonrpc: String,
    /// Tool output on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Failure details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Request id
    pub id: i64,
}

impl ResponseEnvelope {
    /// Wraps a successful tool output
    pub fn success(id: i64, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Wraps a tool failure
    pub fn failure(id: i64, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// Error object carried by a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i32,
    /// Failure message including tool context
    pub message: String,
}

impl RpcError {
    /// Creates an error carrying the internal error code
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: INTERNAL_ERROR_CODE,
            message: message.into(),
        }
    }
}

impl From<&ToolError> for RpcError {
    fn from(error: &ToolError) -> Self {
        Self::internal(error.to_string())
    }
}

/// Summary of one issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSummary {
    /// Issue or pull request number
    pub id: u64,
    /// Generated summary
    pub summary: String,
    /// Set when the summary describes a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_details: Option<bool>,
    /// Image URLs found in an issue body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// Informational result returned instead of data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Message for the caller
    pub message: String,
}

/// Result of `fetchRepoCode`: file paths only, contents stay in the cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCodeSummary {
    /// Repository as `owner/name`
    pub repo: String,
    /// Paths of the decoded files, in archive order
    pub structure: Vec<String>,
}

/// Successful payload of any tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// One issue or pull request
    Issue(IssueSummary),
    /// Repository-wide batch
    Issues(Vec<IssueSummary>),
    /// Nothing to summarize
    Notice(Notice),
    /// Fetched repository
    RepoCode(RepoCodeSummary),
}
