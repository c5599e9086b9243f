//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the scoring core and
//! infrastructure. Implementations live in other crates.

use crate::analysis::{AnalysisRecord, DocumentAnalysis};
use crate::document::DocumentType;
use crate::ids::AnalysisId;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (covenant-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to the given JSON schema description
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}

/// Trait for storing analyses between calls
///
/// Implemented by the infrastructure layer (covenant-store). Methods take
/// `&self` so a store can be shared behind an `Arc`.
pub trait AnalysisStore {
    /// Error type for store operations
    type Error;

    /// Insert or replace a record
    fn put(&self, record: AnalysisRecord) -> Result<(), Self::Error>;

    /// Get a record by analysis id
    fn get(&self, id: AnalysisId) -> Result<Option<AnalysisRecord>, Self::Error>;

    /// List analyses matching criteria
    fn list(&self, query: &AnalysisQuery) -> Result<Vec<DocumentAnalysis>, Self::Error>;

    /// Remove a record; returns whether it existed
    fn delete(&self, id: AnalysisId) -> Result<bool, Self::Error>;
}

/// Query criteria for listing analyses
#[derive(Debug, Clone, Default)]
pub struct AnalysisQuery {
    /// Filter by document type
    pub document_type: Option<DocumentType>,

    /// Filter by minimum overall risk score
    pub min_overall: Option<u32>,

    /// Maximum results to return
    pub limit: Option<usize>,
}

impl AnalysisQuery {
    /// Whether an analysis satisfies the filters (limit not applied)
    pub fn matches(&self, analysis: &DocumentAnalysis) -> bool {
        self.document_type.is_none_or(|t| t == analysis.document_type)
            && self.min_overall.is_none_or(|min| analysis.risk_score.overall >= min)
    }
}
