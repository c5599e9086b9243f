//! Covenant LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `covenant-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing, with scripted failures
//!   and latency
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//!
//! # Examples
//!
//! ```
//! use covenant_llm::MockProvider;
//! use covenant_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod openai;

use covenant_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential rejected by the API
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Error,
}

#[derive(Debug, Default)]
struct MockState {
    // (prompt substring, reply), checked in insertion order
    rules: Vec<(String, Reply)>,
    // (prompt substring, delay), overrides the blanket latency
    delays: Vec<(String, Duration)>,
    call_count: usize,
    prompts: Vec<String>,
}

/// Mock LLM provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls. A
/// reply is chosen by the first rule whose needle occurs in the prompt,
/// falling back to the default response.
///
/// # Examples
///
/// ```
/// use covenant_llm::MockProvider;
/// use covenant_domain::traits::LlmProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("ENTITIES", r#"{"entities": []}"#);
/// provider.add_error("SUMMARY");
///
/// assert_eq!(provider.generate("ENTITIES please").unwrap(), r#"{"entities": []}"#);
/// assert!(provider.generate("SUMMARY please").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Option<String>,
    latency: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: Some(response.into()),
            latency: None,
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a provider that fails every call
    pub fn failing() -> Self {
        Self {
            default_response: None,
            ..Self::default()
        }
    }

    /// Sleep this long before answering each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Sleep `latency` before answering any prompt containing `needle`
    pub fn add_latency(&mut self, needle: impl Into<String>, latency: Duration) {
        self.state().delays.push((needle.into(), latency));
    }

    /// Reply with `response` to any prompt containing `needle`
    pub fn add_response(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        self.state().rules.push((needle.into(), Reply::Text(response.into())));
    }

    /// Fail any prompt containing `needle`
    pub fn add_error(&mut self, needle: impl Into<String>) {
        self.state().rules.push((needle.into(), Reply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.state().call_count = 0;
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let delay = self
            .state()
            .delays
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, delay)| *delay)
            .or(self.latency);
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let mut state = self.state();
        state.call_count += 1;
        state.prompts.push(prompt.to_string());

        let reply = state
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => self
                .default_response
                .clone()
                .ok_or_else(|| LlmError::Communication("Mock provider offline".to_string())),
        }
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
