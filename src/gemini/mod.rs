//! Text generation through the Gemini API

mod client;
mod types;

pub use client::GeminiClient;

use crate::error::Result;
use async_trait::async_trait;

/// A single text generation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system instruction
    pub system_instruction: Option<String>,
    /// Optional output cap
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Creates a request with no instruction and no cap
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Sets the system instruction
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Caps the generated output
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// Anything that turns a prompt into text
///
/// Implementations make exactly one upstream call per invocation and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for `request`
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
