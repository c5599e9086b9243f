//! Analysis orchestration
//!
//! [`AnalysisPipeline`] turns one [`DocumentInput`] into one
//! [`DocumentAnalysis`]. [`AnalysisService`] adds a store around it so
//! analyses can be fetched and recomputed later.

use crate::analyzer::{analyzer_from_config, DocumentAnalyzer, HeuristicAnalyzer};
use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, PipelineError};
use crate::types::SummaryContext;
use covenant_domain::traits::{AnalysisQuery, AnalysisStore};
use covenant_domain::{
    char_prefix, classify, prioritize, score, AnalysisId, AnalysisMetadata, AnalysisRecord,
    DocumentAnalysis, DocumentInput, DocumentType,
};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Runs classification, extraction, scoring, and prioritization
///
/// Stateless apart from its analyzer and configuration; concurrent calls to
/// [`analyze`](Self::analyze) never interact.
#[derive(Clone)]
pub struct AnalysisPipeline {
    analyzer: Arc<dyn DocumentAnalyzer>,
    config: AnalyzerConfig,
}

impl AnalysisPipeline {
    /// Create a pipeline over an analyzer
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, config: AnalyzerConfig) -> Self {
        Self { analyzer, config }
    }

    /// Create a pipeline that uses rules only
    pub fn heuristic() -> Self {
        Self::new(Arc::new(HeuristicAnalyzer), AnalyzerConfig::offline())
    }

    /// Create a pipeline with the analyzer chosen by `config`
    pub fn from_config(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let analyzer = analyzer_from_config(&config)?;
        Ok(Self::new(analyzer, config))
    }

    /// Name of the analyzer in use
    pub fn analyzer_name(&self) -> String {
        self.analyzer.name()
    }

    /// Resolve the document type: a recognised hint wins, otherwise classify
    pub fn resolve_type(&self, input: &DocumentInput) -> DocumentType {
        match input.document_type_hint() {
            Some(hint) if hint != DocumentType::Unknown => hint,
            _ => classify(&input.text, &input.filename),
        }
    }

    /// Analyze a document
    ///
    /// Never fails: analyzer problems degrade to rule-based findings and
    /// empty text yields an empty, low-risk analysis.
    pub async fn analyze(&self, input: &DocumentInput) -> DocumentAnalysis {
        let now = unix_now();
        self.run(input, AnalysisId::new(), now).await
    }

    async fn run(&self, input: &DocumentInput, id: AnalysisId, created_at: u64) -> DocumentAnalysis {
        let started = Instant::now();
        let text = input.text.as_str();
        let document_type = self.resolve_type(input);

        info!(
            "Analyzing '{}' as {} ({} chars)",
            input.filename,
            document_type,
            text.chars().count()
        );

        let (entities, risks, missing_terms) = tokio::join!(
            self.analyzer.extract_entities(text),
            self.analyzer.identify_risks(text, document_type),
            self.analyzer.identify_missing_terms(text, document_type),
        );
        debug!(
            "Extracted {} entities, {} risks, {} missing terms",
            entities.len(),
            risks.len(),
            missing_terms.len()
        );

        let blockers = self
            .analyzer
            .identify_blockers(text, &risks, &missing_terms)
            .await;

        let risk_score = score(&risks, &missing_terms, &blockers);
        let required_actions = prioritize(&risks, &missing_terms, &blockers);

        let summary = self
            .analyzer
            .summarize(&SummaryContext {
                text,
                document_type,
                risks: &risks,
                missing_terms: &missing_terms,
                blockers: &blockers,
                score: &risk_score,
            })
            .await;

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            "Analysis {} complete: score {} (grade {}), {} blocker(s), {} action(s) in {}ms",
            id,
            risk_score.overall,
            risk_score.grade.as_str(),
            blockers.len(),
            required_actions.len(),
            processing_time_ms
        );

        DocumentAnalysis {
            id,
            filename: input.filename.clone(),
            document_type,
            entities,
            risks,
            missing_terms,
            blockers,
            risk_score,
            required_actions,
            summary,
            raw_text_snapshot: char_prefix(text, self.config.snapshot_chars).to_string(),
            source_confidence: input.confidence,
            metadata: AnalysisMetadata {
                created_at,
                analyzed_at: unix_now(),
                processing_time_ms,
                analyzer: self.analyzer.name(),
            },
        }
    }
}

/// Pipeline plus storage: submit, fetch, and recompute analyses
pub struct AnalysisService<S> {
    pipeline: AnalysisPipeline,
    store: Arc<S>,
}

impl<S> AnalysisService<S>
where
    S: AnalysisStore,
    S::Error: std::fmt::Display,
{
    /// Create a service over a pipeline and a shared store
    pub fn new(pipeline: AnalysisPipeline, store: Arc<S>) -> Self {
        Self { pipeline, store }
    }

    /// The pipeline in use
    pub fn pipeline(&self) -> &AnalysisPipeline {
        &self.pipeline
    }

    /// Analyze a document and store the result with its input
    pub async fn submit(&self, input: DocumentInput) -> Result<DocumentAnalysis, PipelineError> {
        let analysis = self.pipeline.analyze(&input).await;
        self.store
            .put(AnalysisRecord {
                input,
                analysis: analysis.clone(),
            })
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        Ok(analysis)
    }

    /// Fetch a stored analysis
    pub fn get(&self, id: AnalysisId) -> Result<Option<DocumentAnalysis>, PipelineError> {
        self.store
            .get(id)
            .map(|record| record.map(|r| r.analysis))
            .map_err(|e| PipelineError::Store(e.to_string()))
    }

    /// List stored analyses matching `query`
    pub fn list(&self, query: &AnalysisQuery) -> Result<Vec<DocumentAnalysis>, PipelineError> {
        self.store
            .list(query)
            .map_err(|e| PipelineError::Store(e.to_string()))
    }

    /// Recompute a stored analysis from its retained input
    ///
    /// The new analysis keeps the id and `created_at` of the old one and
    /// carries a trend comparing the two overall scores.
    pub async fn reanalyze(&self, id: AnalysisId) -> Result<DocumentAnalysis, PipelineError> {
        let record = self
            .store
            .get(id)
            .map_err(|e| PipelineError::Store(e.to_string()))?
            .ok_or_else(|| PipelineError::NotFound(id.to_string()))?;

        let previous = &record.analysis;
        let mut analysis = self
            .pipeline
            .run(&record.input, previous.id, previous.metadata.created_at)
            .await;
        analysis.risk_score = analysis.risk_score.with_trend_from(&previous.risk_score);

        info!(
            "Reanalyzed {}: score {} -> {}",
            id, previous.risk_score.overall, analysis.risk_score.overall
        );

        self.store
            .put(AnalysisRecord {
                input: record.input,
                analysis: analysis.clone(),
            })
            .map_err(|e| PipelineError::Store(e.to_string()))?;
        Ok(analysis)
    }
}
