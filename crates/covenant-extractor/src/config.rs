//! Configuration for the analyzers

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "COVENANT_API_KEY";

/// Environment variable overriding the endpoint
pub const ENV_ENDPOINT: &str = "COVENANT_LLM_ENDPOINT";

/// Environment variable overriding the model
pub const ENV_MODEL: &str = "COVENANT_LLM_MODEL";

/// Configuration for analyzer selection and remote calls
///
/// The remote analyzer is enabled only when `api_key` is set; otherwise
/// every extraction runs on the pattern rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// API key for the remote model; `None` disables remote analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Chat-completions endpoint base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// HTTP timeout for a single request (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Attempts per remote request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Overall budget for one analyzer call, retries included (seconds)
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Characters of text sent for entity, risk, and term extraction
    #[serde(default = "default_analysis_prefix")]
    pub analysis_prefix_chars: usize,

    /// Characters of text sent for summarization
    #[serde(default = "default_summary_prefix")]
    pub summary_prefix_chars: usize,

    /// Characters of text kept on the analysis as a snapshot
    #[serde(default = "default_snapshot")]
    pub snapshot_chars: usize,
}

fn default_endpoint() -> String {
    covenant_llm::openai::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    covenant_llm::openai::DEFAULT_MODEL.to_string()
}

fn default_request_timeout() -> u64 {
    covenant_llm::openai::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    2
}

fn default_call_timeout() -> u64 {
    60
}

fn default_analysis_prefix() -> usize {
    8000
}

fn default_summary_prefix() -> usize {
    4000
}

fn default_snapshot() -> usize {
    covenant_domain::SNAPSHOT_CHARS
}

impl AnalyzerConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the per-request HTTP timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whether a usable credential is configured
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be greater than 0".to_string());
        }
        if self.analysis_prefix_chars == 0 || self.summary_prefix_chars == 0 {
            return Err("prefix lengths must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Offline preset: never calls a remote model
    pub fn offline() -> Self {
        Self {
            api_key: None,
            ..Self::default()
        }
    }

    /// Apply `COVENANT_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(model) = lookup(ENV_MODEL).filter(|v| !v.trim().is_empty()) {
            self.model = model;
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            call_timeout_secs: default_call_timeout(),
            analysis_prefix_chars: default_analysis_prefix(),
            summary_prefix_chars: default_summary_prefix(),
            snapshot_chars: default_snapshot(),
        }
    }
}
