//! Error types for the analyzers and pipeline

use std::time::Duration;
use thiserror::Error;

/// Errors raised inside an analyzer
///
/// These never reach callers of a fallback-wrapped analyzer: they are
/// logged and replaced by heuristic results.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Remote call exceeded its time budget
    #[error("Analyzer call timed out after {0:?}")]
    Timeout(Duration),

    /// Model output could not be interpreted
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::JsonParse(e.to_string())
    }
}

/// Errors from the analysis service around the pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Storage layer error
    #[error("Store error: {0}")]
    Store(String),

    /// No analysis with that id
    #[error("Analysis not found: {0}")]
    NotFound(String),
}
