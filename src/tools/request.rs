use super::{FETCH_REPO_CODE, SUMMARIZE_ISSUES};
use crate::config::SummarizeMode;
use crate::error::{Result, ToolError};
use crate::github::RepoRef;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request id echoed when the caller sends none
pub const DEFAULT_REQUEST_ID: i64 = 1;

/// Raw body of `POST /tools/execute`
///
/// Every field is optional at this level so that missing fields surface as
/// validation errors instead of deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInvocationRequest {
    /// Caller chosen id, echoed in the response
    #[serde(default)]
    pub id: Option<i64>,
    /// Tool to run
    #[serde(default)]
    pub tool: Option<String>,
    /// Tool parameters, must be a JSON object
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl ToolInvocationRequest {
    /// Creates a request without an id
    pub fn new(tool: &str, parameters: Value) -> Self {
        Self {
            id: None,
            tool: Some(tool.to_string()),
            parameters: Some(parameters),
        }
    }

    /// Sets the request id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Id to echo in the response envelope
    pub fn response_id(&self) -> i64 {
        self.id.unwrap_or(DEFAULT_REQUEST_ID)
    }
}

/// A validated tool invocation, one variant per tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// Summarize the issue or pull request at `url`
    SummarizeIssue {
        /// Issue or pull request URL
        url: String,
    },
    /// Summarize the first open issues of `repo`
    SummarizeRepoIssues {
        /// Repository to list open issues from
        repo: RepoRef,
    },
    /// Download and cache the code of `repo`
    FetchRepoCode {
        /// Repository to download
        repo: RepoRef,
    },
}

impl ToolCall {
    /// Validates a raw request: required fields, known tool, then tool parameters
    pub fn from_request(request: &ToolInvocationRequest, mode: SummarizeMode) -> Result<Self> {
        let (tool, parameters) = match (request.tool.as_deref(), request.parameters.as_ref()) {
            (Some(tool), Some(parameters)) if !tool.is_empty() => (tool, parameters),
            _ => {
                return Err(ToolError::Validation(
                    "Invalid request: tool and parameters are required".into(),
                ))
            }
        };

        match tool {
            SUMMARIZE_ISSUES => {
                let parameters = as_object(parameters)?;
                match mode {
                    SummarizeMode::Url => Ok(Self::SummarizeIssue {
                        url: required_string(parameters, "url", "URL", tool)?.to_string(),
                    }),
                    SummarizeMode::Repo => Ok(Self::SummarizeRepoIssues {
                        repo: RepoRef::parse(required_string(parameters, "repo", "Repo", tool)?)?,
                    }),
                }
            }
            FETCH_REPO_CODE => {
                let parameters = as_object(parameters)?;
                Ok(Self::FetchRepoCode {
                    repo: RepoRef::parse(required_string(parameters, "repo", "Repo", tool)?)?,
                })
            }
            other => Err(ToolError::ToolNotFound(other.to_string())),
        }
    }

    /// Catalog name of the tool this call runs
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::SummarizeIssue { .. } | Self::SummarizeRepoIssues { .. } => SUMMARIZE_ISSUES,
            Self::FetchRepoCode { .. } => FETCH_REPO_CODE,
        }
    }
}

fn as_object(parameters: &Value) -> Result<&Map<String, Value>> {
    parameters.as_object().ok_or_else(|| {
        ToolError::Validation("Invalid request: parameters must be an object".into())
    })
}

fn required_string<'a>(
    parameters: &'a Map<String, Value>,
    key: &str,
    label: &str,
    tool: &str,
) -> Result<&'a str> {
    match parameters.get(key) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.trim()),
        Some(Value::String(_)) | Some(Value::Null) | None => Err(ToolError::Validation(format!(
            "{} parameter is required for {}",
            label, tool
        ))),
        Some(_) => Err(ToolError::Validation(format!(
            "{} parameter for {} must be a string",
            label, tool
        ))),
    }
}
