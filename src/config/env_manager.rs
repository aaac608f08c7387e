use serde::{Deserialize, Serialize};

/// Secrets read from the environment at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GitHub access token used for every REST call
    pub github_token: Option<String>,
    /// API key for the Gemini text generation service
    pub gemini_api_key: Option<String>,
}

impl ApiKeys {
    /// Reads both secrets through the given lookup, ignoring empty values
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            github_token: non_empty(lookup("GITHUB_TOKEN")),
            gemini_api_key: non_empty(lookup("GEMINI_API_KEY")),
        }
    }
}

/// Returns the value of an environment variable, treating empty strings as unset
pub fn get_env_value(key: &str) -> Option<String> {
    non_empty(std::env::var(key).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
