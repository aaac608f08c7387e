#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! Issue triage tools for LLM agents
//!
//! The crate exposes two tools over HTTP: `summarizeIssues`, which turns a
//! GitHub issue, pull request or a repository's open issues into short
//! summaries, and `fetchRepoCode`, which downloads a repository archive and
//! keeps its decoded text files in a short-lived cache.
//!
//! ## Usage
//! ```rust,ignore
//! use github_issue_summarizer::{tools::{ToolDispatcher, ToolInvocationRequest}, Config};
//! use serde_json::json;
//!
//! async fn example() -> github_issue_summarizer::Result<()> {
//!     let config = Config::load(None)?;
//!     let dispatcher = ToolDispatcher::from_config(&config)?;
//!     let request = ToolInvocationRequest::new(
//!         "summarizeIssues",
//!         json!({ "url": "https://github.com/vercel/next.js/pull/80974" }),
//!     );
//!     let envelope = dispatcher.execute(request).await?;
//!     println!("{}", serde_json::to_string_pretty(&envelope)?);
//!     Ok(())
//! }
//! ```

/// HTTP routes and server state
pub mod api;
/// Zip archive decoding into text files
pub mod archive;
/// Time-bounded cache of decoded repositories
pub mod cache;
/// Configuration module for the application
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Text generation client
pub mod gemini;
/// GitHub REST client and reference parsers
pub mod github;
/// Logging configuration and utilities
pub mod logging;
/// Prompt templates
pub mod prompts;
/// Tool catalog, validation and dispatch
pub mod tools;

pub use config::Config;
pub use error::{Result, ToolError};
pub use tools::{ResponseEnvelope, ToolDispatcher, ToolInvocationRequest};
