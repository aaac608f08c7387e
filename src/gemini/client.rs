use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use super::{GenerationRequest, TextGenerator};
use crate::config::Config;
use crate::error::{Result, ToolError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Client for the `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client for `model` under `base_url`
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ToolError::Config(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Creates a client from application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.gemini_api_base,
            &config.gemini_model,
            config.gemini_api_key()?,
            config.http_timeout_secs.map(Duration::from_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), &request.prompt)],
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(|instruction| Content::text(None, instruction)),
            generation_config: request
                .max_output_tokens
                .map(|max_output_tokens| GenerationConfig { max_output_tokens }),
        };

        debug!(model = %self.model, prompt_chars = request.prompt.len(), "Calling Gemini");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ToolError::LLM(format!(
                "Gemini API failed with HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.first_text().ok_or_else(|| {
            let reason = parsed
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            ToolError::LLM(format!("No text in Gemini response ({})", reason))
        })
    }
}
