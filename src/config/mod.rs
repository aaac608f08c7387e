mod env_manager;

use crate::error::{Result, ToolError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub use env_manager::{get_env_value, ApiKeys};

/// Default ceiling for repository archives (10 MiB)
pub const DEFAULT_ARCHIVE_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Upper bound on open issues summarized concurrently for one repository
pub const MAX_REPO_ISSUES: usize = 5;

/// Which `summarizeIssues` variant this deployment serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SummarizeMode {
    /// Summarize one issue or pull request given its URL
    #[default]
    Url,
    /// Summarize the first open issues of a repository
    Repo,
}

impl FromStr for SummarizeMode {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "repo" => Ok(Self::Repo),
            other => Err(ToolError::Config(format!(
                "Unknown summarize mode '{}', expected 'url' or 'repo'",
                other
            ))),
        }
    }
}

impl fmt::Display for SummarizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => f.write_str("url"),
            Self::Repo => f.write_str("repo"),
        }
    }
}

/// Main configuration struct for the application
///
/// Values are layered: built-in defaults, then an optional TOML file, then
/// environment variables. Secrets only ever come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub host: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Base URL of the GitHub REST API
    pub github_api_base: String,
    /// Base URL of the Gemini API, up to and including the API version
    pub gemini_api_base: String,
    /// Gemini model used for summaries
    pub gemini_model: String,
    /// Which summarization variant is exposed as `summarizeIssues`
    pub summarize_mode: SummarizeMode,
    /// Number of open issues summarized by the repository-wide variant
    pub max_repo_issues: usize,
    /// Output cap for pull request summaries
    pub pr_summary_max_tokens: u32,
    /// Largest archive accepted by the decoder, exclusive
    pub archive_max_bytes: usize,
    /// Directory for temporary archive files, system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    /// Retention window for decoded repositories
    pub cache_ttl_secs: u64,
    /// How often the background sweeper purges expired repositories
    pub cache_sweep_interval_secs: u64,
    /// Overall timeout for outbound HTTP calls, none when unset
    pub http_timeout_secs: Option<u64>,
    /// API keys, never read from or written to the config file
    #[serde(skip)]
    pub api_keys: ApiKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            github_api_base: "https://api.github.com".to_string(),
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            summarize_mode: SummarizeMode::Url,
            max_repo_issues: MAX_REPO_ISSUES,
            pr_summary_max_tokens: 256,
            archive_max_bytes: DEFAULT_ARCHIVE_MAX_BYTES,
            temp_dir: None,
            cache_ttl_secs: 3600,
            cache_sweep_interval_secs: 60,
            http_timeout_secs: None,
            api_keys: ApiKeys::default(),
        }
    }
}

impl Config {
    /// Loads configuration from an optional TOML file and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(&|key: &str| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parses a TOML config file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ToolError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ToolError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Overrides settings with values found through `lookup`
    pub fn apply_env_from<F>(&mut self, lookup: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_keys = ApiKeys::from_lookup(lookup);

        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_setting("PORT", &port)?;
        }
        if let Some(base) = lookup("GITHUB_API_BASE_URL") {
            self.github_api_base = base;
        }
        if let Some(base) = lookup("GEMINI_API_BASE_URL") {
            self.gemini_api_base = base;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Some(mode) = lookup("SUMMARIZE_MODE") {
            self.summarize_mode = mode.parse()?;
        }
        if let Some(max) = lookup("ARCHIVE_MAX_BYTES") {
            self.archive_max_bytes = parse_setting("ARCHIVE_MAX_BYTES", &max)?;
        }
        if let Some(ttl) = lookup("REPO_CACHE_TTL_SECS") {
            self.cache_ttl_secs = parse_setting("REPO_CACHE_TTL_SECS", &ttl)?;
        }
        if let Some(dir) = lookup("SUMMARIZER_TEMP_DIR") {
            self.temp_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    /// Fails fast when a secret is missing or a limit is unusable
    pub fn validate(&self) -> Result<()> {
        self.github_token()?;
        self.gemini_api_key()?;

        if self.archive_max_bytes == 0 {
            return Err(ToolError::Config("archive_max_bytes must be positive".into()));
        }
        if !(1..=MAX_REPO_ISSUES).contains(&self.max_repo_issues) {
            return Err(ToolError::Config(format!(
                "max_repo_issues must be between 1 and {}, got {}",
                MAX_REPO_ISSUES, self.max_repo_issues
            )));
        }
        if self.cache_sweep_interval_secs == 0 {
            return Err(ToolError::Config(
                "cache_sweep_interval_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Retrieves the GitHub token
    pub fn github_token(&self) -> Result<&str> {
        self.api_keys
            .github_token
            .as_deref()
            .ok_or_else(|| ToolError::Config("GITHUB_TOKEN environment variable not set".into()))
    }

    /// Retrieves the Gemini API key
    pub fn gemini_api_key(&self) -> Result<&str> {
        self.api_keys
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| ToolError::Config("GEMINI_API_KEY environment variable not set".into()))
    }

    /// Retention window for cached repositories
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Interval between background cache sweeps
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }

    /// Directory where archive temp files are created
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_setting<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ToolError::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secrets_fail_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ToolError::Config(_))));

        let mut config = Config::default();
        config
            .apply_env_from(&lookup_from(&[("GITHUB_TOKEN", "ghp_test")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_env_overrides() -> Result<()> {
        let mut config = Config::default();
        config.apply_env_from(&lookup_from(&[
            ("GITHUB_TOKEN", "ghp_test"),
            ("GEMINI_API_KEY", "key"),
            ("PORT", "8080"),
            ("SUMMARIZE_MODE", "repo"),
            ("REPO_CACHE_TTL_SECS", "5"),
        ]))?;

        config.validate()?;
        assert_eq!(config.port, 8080);
        assert_eq!(config.summarize_mode, SummarizeMode::Repo);
        assert_eq!(config.cache_ttl(), Duration::from_secs(5));
        assert_eq!(config.github_token()?, "ghp_test");
        Ok(())
    }

    #[test]
    fn test_max_repo_issues_must_stay_in_range() {
        let mut config = Config::default();
        config
            .apply_env_from(&lookup_from(&[("GITHUB_TOKEN", "t"), ("GEMINI_API_KEY", "k")]))
            .unwrap();

        for invalid in [0, MAX_REPO_ISSUES + 1] {
            config.max_repo_issues = invalid;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("max_repo_issues"));
        }

        config.max_repo_issues = MAX_REPO_ISSUES;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let mut config = Config::default();
        config
            .apply_env_from(&lookup_from(&[("GITHUB_TOKEN", "   "), ("GEMINI_API_KEY", "k")]))
            .unwrap();
        assert!(config.github_token().is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_from(&lookup_from(&[("PORT", "not-a-port")]));
        assert!(matches!(result, Err(ToolError::Config(_))));
    }

    #[test]
    fn test_config_file_partial() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("summarizer.toml");
        fs::write(&path, "port = 9000\nsummarize_mode = \"repo\"\n")?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.port, 9000);
        assert_eq!(config.summarize_mode, SummarizeMode::Repo);
        assert_eq!(config.archive_max_bytes, DEFAULT_ARCHIVE_MAX_BYTES);
        Ok(())
    }
}
