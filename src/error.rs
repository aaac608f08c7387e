use std::io;
use thiserror::Error;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, ToolError>;

/// JSON-RPC code attached to every failure raised while a tool handler runs
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// Errors that can occur while validating or executing a tool
#[derive(Debug, Error)]
pub enum ToolError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive errors
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed or incomplete tool request
    #[error("{0}")]
    Validation(String),

    /// Requested tool is not part of the catalog
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Input did not look like a GitHub issue or pull request URL
    #[error("Invalid GitHub URL: {0}")]
    InvalidGitHubUrl(String),

    /// Repository archive exceeds the configured ceiling
    #[error(
        "Repository archive is {size} bytes, which exceeds the {limit} byte limit; \
         try a smaller repository"
    )]
    ArchiveTooLarge {
        /// Size of the rejected buffer
        size: usize,
        /// Configured ceiling
        limit: usize,
    },

    /// GitHub API specific errors
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Language Model errors
    #[error("LLM error: {0}")]
    LLM(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// General message errors
    #[error("{0}")]
    Message(String),
}

impl ToolError {
    /// Creates a new error with the specified message
    pub fn new(message: &str) -> Self {
        Self::Message(message.to_string())
    }

    /// Prefixes the error message with tool specific context
    pub fn context(self, context: &str) -> Self {
        Self::Message(format!("{}: {}", context, self))
    }

    /// Errors caused by the caller's request rather than by an upstream service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::ToolNotFound(_))
    }

    /// HTTP status used when the error is reported outside an envelope
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ToolNotFound(_) => 404,
            Self::Validation(_) => 400,
            _ => 500,
        }
    }
}
