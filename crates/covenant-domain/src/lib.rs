//! Covenant Domain Layer
//!
//! Core model and pure algorithms for scoring business documents for risk.
//! Nothing in this crate performs I/O: extraction, model calls, and storage
//! are reached through the traits in [`traits`].
//!
//! ## Key Concepts
//!
//! - **Risk**: a named concern with a category and severity
//! - **Missing term**: an expected clause the document lacks
//! - **Blocker**: a condition that halts deal progress, derived from risks,
//!   missing terms, or the signature check
//! - **Risk score**: 0–100 with an A–F grade and a capped four-way breakdown
//! - **Required action**: a ranked remediation item
//!
//! ## Pipeline
//!
//! ```text
//! text → classify → {entities, risks, missing terms} → blockers → score + actions
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actions;
pub mod analysis;
pub mod classifier;
pub mod document;
pub mod finding;
pub mod ids;
pub mod scoring;
pub mod traits;

// Re-exports for convenience
pub use actions::{prioritize, ActionStatus, Priority, RequiredAction};
pub use analysis::{AnalysisMetadata, AnalysisRecord, DocumentAnalysis, SNAPSHOT_CHARS};
pub use classifier::classify;
pub use document::{char_prefix, DocumentInput, DocumentType};
pub use finding::{
    BlockerType, DealBlocker, DocumentRisk, EntityType, ExtractedEntity, Importance, MissingTerm,
    RiskCategory, Severity, TextSpan,
};
pub use ids::{AnalysisId, FindingId};
pub use scoring::{score, Grade, RiskScore, RiskTrend, ScoreBreakdown};
