//! The document analysis aggregate

use crate::actions::RequiredAction;
use crate::document::{DocumentInput, DocumentType};
use crate::finding::{DealBlocker, DocumentRisk, ExtractedEntity, MissingTerm};
use crate::ids::AnalysisId;
use crate::scoring::RiskScore;
use serde::{Deserialize, Serialize};

/// Characters of source text kept on the analysis for audit
pub const SNAPSHOT_CHARS: usize = 5000;

/// Bookkeeping about how and when an analysis was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// First analysis time (seconds since Unix epoch)
    pub created_at: u64,
    /// Most recent analysis time (seconds since Unix epoch)
    pub analyzed_at: u64,
    /// Wall time of the most recent pipeline run
    pub processing_time_ms: u64,
    /// Name of the analyzer that produced the findings
    pub analyzer: String,
}

/// Complete result of analyzing one document
///
/// Built once per pipeline run. Reanalysis produces a fresh value that keeps
/// the `id` and `created_at` of the one it replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    /// Identifier
    pub id: AnalysisId,
    /// Source file name
    pub filename: String,
    /// Classification
    pub document_type: DocumentType,
    /// Extracted entities
    pub entities: Vec<ExtractedEntity>,
    /// Identified risks
    pub risks: Vec<DocumentRisk>,
    /// Missing terms
    pub missing_terms: Vec<MissingTerm>,
    /// Deal blockers
    pub blockers: Vec<DealBlocker>,
    /// Score over risks, missing terms, and blockers
    pub risk_score: RiskScore,
    /// Ranked actions
    pub required_actions: Vec<RequiredAction>,
    /// Short narrative summary
    pub summary: String,
    /// Leading characters of the source text (not used for reanalysis)
    pub raw_text_snapshot: String,
    /// Upstream extraction confidence, if the caller supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_confidence: Option<f64>,
    /// Production metadata
    pub metadata: AnalysisMetadata,
}

impl DocumentAnalysis {
    /// Whether any blocker currently halts the deal
    pub fn is_blocked(&self) -> bool {
        !self.blockers.is_empty()
    }
}

/// A stored analysis together with the input it was computed from
///
/// Keeping the full input is what makes true reanalysis possible; the
/// snapshot on the analysis itself is truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Original input
    pub input: DocumentInput,
    /// Latest analysis of that input
    pub analysis: DocumentAnalysis,
}
