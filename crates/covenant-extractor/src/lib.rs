//! Covenant Extractor
//!
//! Turns document text into findings and assembles the scored analysis.
//!
//! # Overview
//!
//! Findings come from one of two strategies. The rule-based
//! [`HeuristicAnalyzer`] uses regexes and keyword checklists and never fails.
//! When an API key is configured, an LLM-backed source is wrapped in
//! [`FallbackAnalyzer`], which runs every remote call under a timeout and
//! substitutes the rule-based answer whenever the model errors, times out,
//! or returns something unparseable.
//!
//! # Architecture
//!
//! ```text
//! DocumentInput → classify → {entities, risks, missing terms} → blockers
//!               → score → prioritize → summarize → DocumentAnalysis
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use covenant_extractor::{AnalysisPipeline, AnalyzerConfig};
//! use covenant_domain::DocumentInput;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalyzerConfig::default().with_env_overrides();
//! let pipeline = AnalysisPipeline::from_config(config)?;
//!
//! let input = DocumentInput::new("This Agreement is governed by ...", "msa.pdf");
//! let analysis = pipeline.analyze(&input).await;
//!
//! println!("Score: {} ({})", analysis.risk_score.overall, analysis.risk_score.grade.as_str());
//! for action in &analysis.required_actions {
//!     println!("[{}] {}", action.priority.as_str(), action.action);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config;
mod error;
mod parser;
pub mod patterns;
mod pipeline;
mod prompt;
mod types;


pub use analyzer::{
    analyzer_from_config, DocumentAnalyzer, FallbackAnalyzer, FindingsSource, HeuristicAnalyzer,
    LlmAnalyzer,
};
pub use config::{AnalyzerConfig, ENV_API_KEY, ENV_ENDPOINT, ENV_MODEL};
pub use error::{AnalyzerError, PipelineError};
pub use pipeline::{AnalysisPipeline, AnalysisService};
pub use prompt::PromptKind;
pub use types::SummaryContext;
