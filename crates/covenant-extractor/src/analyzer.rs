//! Analyzer strategies and the fallback decorator
//!
//! [`FindingsSource`] is a fallible producer of findings (the remote model).
//! [`DocumentAnalyzer`] is the infallible capability the pipeline consumes.
//! [`FallbackAnalyzer`] turns the former into the latter: every call to the
//! primary source runs under its own timeout, and any timeout, provider
//! error, or unparseable answer is logged and replaced by the rule-based
//! result.

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::parser::{parse_entities, parse_missing_terms, parse_risks, parse_summary};
use crate::patterns::{
    extract_entities_by_pattern, identify_blockers_by_rule, identify_missing_terms_by_rule,
    identify_risks_by_rule, summarize_by_rule,
};
use crate::prompt::{PromptBuilder, PromptKind};
use crate::types::SummaryContext;
use async_trait::async_trait;
use covenant_domain::traits::LlmProvider;
use covenant_domain::{DealBlocker, DocumentRisk, DocumentType, ExtractedEntity, MissingTerm};
use covenant_llm::OpenAiProvider;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A producer of findings that may fail
#[async_trait]
pub trait FindingsSource: Send + Sync {
    /// Name recorded in analysis metadata
    fn name(&self) -> String;

    /// Extract entities
    async fn extract_entities(&self, text: &str) -> Result<Vec<ExtractedEntity>, AnalyzerError>;

    /// Identify risks
    async fn identify_risks(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<DocumentRisk>, AnalyzerError>;

    /// Identify missing terms
    async fn identify_missing_terms(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<MissingTerm>, AnalyzerError>;

    /// Identify deal blockers from earlier findings
    async fn identify_blockers(
        &self,
        text: &str,
        risks: &[DocumentRisk],
        missing_terms: &[MissingTerm],
    ) -> Result<Vec<DealBlocker>, AnalyzerError>;

    /// Summarize the document
    async fn summarize(&self, ctx: &SummaryContext<'_>) -> Result<String, AnalyzerError>;
}

/// A producer of findings that always returns a result
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Name recorded in analysis metadata
    fn name(&self) -> String;

    /// Extract entities
    async fn extract_entities(&self, text: &str) -> Vec<ExtractedEntity>;

    /// Identify risks
    async fn identify_risks(&self, text: &str, document_type: DocumentType) -> Vec<DocumentRisk>;

    /// Identify missing terms
    async fn identify_missing_terms(&self, text: &str, document_type: DocumentType) -> Vec<MissingTerm>;

    /// Identify deal blockers from earlier findings
    async fn identify_blockers(
        &self,
        text: &str,
        risks: &[DocumentRisk],
        missing_terms: &[MissingTerm],
    ) -> Vec<DealBlocker>;

    /// Summarize the document
    async fn summarize(&self, ctx: &SummaryContext<'_>) -> String;
}

/// Rule-based analyzer; never calls out, never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAnalyzer;

#[async_trait]
impl DocumentAnalyzer for HeuristicAnalyzer {
    fn name(&self) -> String {
        "rules".to_string()
    }

    async fn extract_entities(&self, text: &str) -> Vec<ExtractedEntity> {
        extract_entities_by_pattern(text)
    }

    async fn identify_risks(&self, text: &str, document_type: DocumentType) -> Vec<DocumentRisk> {
        identify_risks_by_rule(text, document_type)
    }

    async fn identify_missing_terms(&self, text: &str, document_type: DocumentType) -> Vec<MissingTerm> {
        identify_missing_terms_by_rule(text, document_type)
    }

    async fn identify_blockers(
        &self,
        text: &str,
        risks: &[DocumentRisk],
        missing_terms: &[MissingTerm],
    ) -> Vec<DealBlocker> {
        identify_blockers_by_rule(text, risks, missing_terms)
    }

    async fn summarize(&self, ctx: &SummaryContext<'_>) -> String {
        summarize_by_rule(ctx)
    }
}

/// Findings source backed by an LLM provider
///
/// Sends a bounded prefix of the document and parses the JSON answer.
/// Blockers are not asked of the model: they are derived by rule from the
/// model's risks and missing terms.
pub struct LlmAnalyzer<L> {
    provider: Arc<L>,
    analysis_prefix_chars: usize,
    summary_prefix_chars: usize,
}

impl<L> LlmAnalyzer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create an analyzer over a provider, with prefix sizes from `config`
    pub fn new(provider: L, config: &AnalyzerConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            analysis_prefix_chars: config.analysis_prefix_chars,
            summary_prefix_chars: config.summary_prefix_chars,
        }
    }

    async fn ask(
        &self,
        kind: PromptKind,
        text: &str,
        document_type: DocumentType,
        max_chars: usize,
    ) -> Result<String, AnalyzerError> {
        let prompt = PromptBuilder::new(kind, text, document_type, max_chars).build();
        debug!("{} prompt length: {} chars", kind.marker(), prompt.len());

        let response = self.call_llm(prompt, kind.schema()).await?;
        debug!("{} response length: {} chars", kind.marker(), response.len());
        Ok(response)
    }

    /// Call the LLM provider on the blocking pool
    async fn call_llm(&self, prompt: String, schema: &'static str) -> Result<String, AnalyzerError> {
        let llm = Arc::clone(&self.provider);

        // LlmProvider is synchronous
        tokio::task::spawn_blocking(move || {
            llm.generate_structured(&prompt, schema)
                .map_err(|e| AnalyzerError::Llm(e.to_string()))
        })
        .await
        .map_err(|e| AnalyzerError::Llm(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl<L> FindingsSource for LlmAnalyzer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    fn name(&self) -> String {
        format!("llm:{}", self.provider.model_name())
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<ExtractedEntity>, AnalyzerError> {
        let response = self
            .ask(PromptKind::Entities, text, DocumentType::Unknown, self.analysis_prefix_chars)
            .await?;
        parse_entities(&response)
    }

    async fn identify_risks(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<DocumentRisk>, AnalyzerError> {
        let response = self
            .ask(PromptKind::Risks, text, document_type, self.analysis_prefix_chars)
            .await?;
        parse_risks(&response)
    }

    async fn identify_missing_terms(
        &self,
        text: &str,
        document_type: DocumentType,
    ) -> Result<Vec<MissingTerm>, AnalyzerError> {
        let response = self
            .ask(PromptKind::MissingTerms, text, document_type, self.analysis_prefix_chars)
            .await?;
        parse_missing_terms(&response)
    }

    async fn identify_blockers(
        &self,
        text: &str,
        risks: &[DocumentRisk],
        missing_terms: &[MissingTerm],
    ) -> Result<Vec<DealBlocker>, AnalyzerError> {
        Ok(identify_blockers_by_rule(text, risks, missing_terms))
    }

    async fn summarize(&self, ctx: &SummaryContext<'_>) -> Result<String, AnalyzerError> {
        let response = self
            .ask(PromptKind::Summary, ctx.text, ctx.document_type, self.summary_prefix_chars)
            .await?;
        parse_summary(&response)
    }
}

/// Decorator that falls back to rules whenever the primary source fails
pub struct FallbackAnalyzer<P> {
    primary: P,
    call_timeout: Duration,
    fallbacks: AtomicUsize,
}

impl<P: FindingsSource> FallbackAnalyzer<P> {
    /// Wrap a primary source; each call to it gets `call_timeout`
    pub fn new(primary: P, call_timeout: Duration) -> Self {
        Self {
            primary,
            call_timeout,
            fallbacks: AtomicUsize::new(0),
        }
    }

    /// Number of calls answered by the fallback so far
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    async fn guarded<T, F>(&self, operation: &str, primary: F, fallback: impl FnOnce() -> T) -> T
    where
        F: Future<Output = Result<T, AnalyzerError>> + Send,
    {
        let failure = match timeout(self.call_timeout, primary).await {
            Ok(Ok(result)) => return result,
            Ok(Err(e)) => e,
            Err(_) => AnalyzerError::Timeout(self.call_timeout),
        };

        warn!(
            "{} failed in {}, using rule-based fallback: {}",
            operation,
            self.primary.name(),
            failure
        );
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
        fallback()
    }
}

#[async_trait]
impl<P: FindingsSource> DocumentAnalyzer for FallbackAnalyzer<P> {
    fn name(&self) -> String {
        format!("{}+rules", self.primary.name())
    }

    async fn extract_entities(&self, text: &str) -> Vec<ExtractedEntity> {
        self.guarded(
            "Entity extraction",
            self.primary.extract_entities(text),
            || extract_entities_by_pattern(text),
        )
        .await
    }

    async fn identify_risks(&self, text: &str, document_type: DocumentType) -> Vec<DocumentRisk> {
        self.guarded(
            "Risk identification",
            self.primary.identify_risks(text, document_type),
            || identify_risks_by_rule(text, document_type),
        )
        .await
    }

    async fn identify_missing_terms(&self, text: &str, document_type: DocumentType) -> Vec<MissingTerm> {
        self.guarded(
            "Missing-term identification",
            self.primary.identify_missing_terms(text, document_type),
            || identify_missing_terms_by_rule(text, document_type),
        )
        .await
    }

    async fn identify_blockers(
        &self,
        text: &str,
        risks: &[DocumentRisk],
        missing_terms: &[MissingTerm],
    ) -> Vec<DealBlocker> {
        self.guarded(
            "Blocker identification",
            self.primary.identify_blockers(text, risks, missing_terms),
            || identify_blockers_by_rule(text, risks, missing_terms),
        )
        .await
    }

    async fn summarize(&self, ctx: &SummaryContext<'_>) -> String {
        self.guarded("Summarization", self.primary.summarize(ctx), || summarize_by_rule(ctx))
            .await
    }
}

/// Pick the analyzer for a configuration
///
/// Without a credential the rule-based analyzer is used and no remote call
/// is ever attempted. With one, the remote model is wrapped in
/// [`FallbackAnalyzer`].
pub fn analyzer_from_config(config: &AnalyzerConfig) -> Result<Arc<dyn DocumentAnalyzer>, AnalyzerError> {
    config.validate().map_err(AnalyzerError::Config)?;

    let api_key = match config.api_key.as_deref() {
        Some(key) if config.has_credentials() => key,
        _ => {
            info!("No API key configured, using rule-based analysis");
            return Ok(Arc::new(HeuristicAnalyzer));
        }
    };

    let provider = OpenAiProvider::with_timeout(
        config.endpoint.clone(),
        config.model.clone(),
        api_key,
        config.request_timeout(),
    )
    .map_err(|e| AnalyzerError::Config(e.to_string()))?
    .with_max_retries(config.max_retries);

    info!("Using model {} at {} with rule-based fallback", config.model, config.endpoint);
    Ok(Arc::new(FallbackAnalyzer::new(
        LlmAnalyzer::new(provider, config),
        config.call_timeout(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_domain::{score, EntityType, RiskCategory, Severity};
    use covenant_llm::MockProvider;

    fn fallback_over(provider: MockProvider) -> FallbackAnalyzer<LlmAnalyzer<MockProvider>> {
        FallbackAnalyzer::new(
            LlmAnalyzer::new(provider, &AnalyzerConfig::default()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_llm_analyzer_parses_risks() {
        let mut provider = MockProvider::default();
        provider.add_response(
            PromptKind::Risks.marker(),
            r#"{"risks": [{"category": "payment_risk", "severity": "high", "title": "Net 120"}]}"#,
        );
        let analyzer = LlmAnalyzer::new(provider, &AnalyzerConfig::default());

        let risks = analyzer.identify_risks("text", DocumentType::Contract).await.unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].category, RiskCategory::PaymentRisk);
        assert_eq!(risks[0].severity, Severity::High);
    }

    #[tokio::test]
    async fn test_llm_analyzer_sends_bounded_prefix() {
        let provider = MockProvider::new(r#"{"entities": []}"#);
        let config = AnalyzerConfig {
            analysis_prefix_chars: 8000,
            ..AnalyzerConfig::default()
        };
        let analyzer = LlmAnalyzer::new(provider.clone(), &config);

        let text = format!("{}{}", "x".repeat(8000), "TAIL-MARKER");
        analyzer.extract_entities(&text).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains(&"x".repeat(8000)));
        assert!(!prompts[0].contains("TAIL-MARKER"));
    }

    #[tokio::test]
    async fn test_llm_analyzer_summary_prefix() {
        let provider = MockProvider::new(r#"{"summary": "Short."}"#);
        let analyzer = LlmAnalyzer::new(provider.clone(), &AnalyzerConfig::default());

        let text = format!("{}TAIL-MARKER", "y".repeat(4000));
        let score = score(&[], &[], &[]);
        let ctx = SummaryContext {
            text: &text,
            document_type: DocumentType::Nda,
            risks: &[],
            missing_terms: &[],
            blockers: &[],
            score: &score,
        };
        assert_eq!(analyzer.summarize(&ctx).await.unwrap(), "Short.");
        assert!(!provider.prompts()[0].contains("TAIL-MARKER"));
    }

    #[tokio::test]
    async fn test_llm_analyzer_surfaces_errors() {
        let analyzer = LlmAnalyzer::new(MockProvider::failing(), &AnalyzerConfig::default());
        let result = analyzer.extract_entities("text").await;
        assert!(matches!(result, Err(AnalyzerError::Llm(_))));
    }

    #[tokio::test]
    async fn test_fallback_on_provider_error() {
        let analyzer = fallback_over(MockProvider::failing());

        let entities = analyzer.extract_entities("Fee: $250 due in 10 days").await;
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, EntityType::Amount);
        assert_eq!(analyzer.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_unparseable_response() {
        let analyzer = fallback_over(MockProvider::new("I cannot help with that."));

        let risks = analyzer.identify_risks("nothing relevant", DocumentType::Contract).await;
        assert_eq!(risks.len(), 5);
        assert!(risks.iter().all(|r| r.category == RiskCategory::MissingClause));
        assert_eq!(analyzer.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_timeout() {
        let provider = MockProvider::new(r#"{"missing_terms": []}"#).with_latency(Duration::from_millis(500));
        let analyzer = FallbackAnalyzer::new(
            LlmAnalyzer::new(provider, &AnalyzerConfig::default()),
            Duration::from_millis(50),
        );

        let terms = analyzer.identify_missing_terms("", DocumentType::Nda).await;
        assert_eq!(terms.len(), 5);
        assert_eq!(analyzer.fallback_count(), 1);
    }

    #[tokio::test]
    async fn test_fallback_on_non_json_summary() {
        let mut provider = MockProvider::default();
        provider.add_response(
            PromptKind::Summary.marker(),
            "I'm sorry, but I can't help with that request.",
        );
        let analyzer = fallback_over(provider);

        let score = score(&[], &[], &[]);
        let ctx = SummaryContext {
            text: "Mutual confidentiality agreement.",
            document_type: DocumentType::Nda,
            risks: &[],
            missing_terms: &[],
            blockers: &[],
            score: &score,
        };
        let summary = analyzer.summarize(&ctx).await;
        assert_eq!(summary, summarize_by_rule(&ctx));
        assert!(!summary.contains("sorry"));
        assert_eq!(analyzer.fallback_count(), 1);
    }

    #[test]
    fn test_timeout_error_reports_sub_second_budget() {
        let err = AnalyzerError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Analyzer call timed out after 250ms");
    }

    #[tokio::test]
    async fn test_no_fallback_when_primary_succeeds() {
        let analyzer = fallback_over(MockProvider::new(r#"{"risks": []}"#));
        let risks = analyzer.identify_risks("nothing relevant", DocumentType::Contract).await;
        assert!(risks.is_empty());
        assert_eq!(analyzer.fallback_count(), 0);
        assert_eq!(analyzer.name(), "llm:mock+rules");
    }

    #[tokio::test]
    async fn test_blockers_are_rule_derived_for_llm() {
        let provider = MockProvider::failing();
        let analyzer = fallback_over(provider.clone());

        let blockers = analyzer.identify_blockers("no execution block", &[], &[]).await;
        assert_eq!(blockers.len(), 1);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(analyzer.fallback_count(), 0);
    }

    #[test]
    fn test_from_config_without_key_is_heuristic() {
        let analyzer = analyzer_from_config(&AnalyzerConfig::offline()).unwrap();
        assert_eq!(analyzer.name(), "rules");
    }

    #[test]
    fn test_from_config_with_key_wraps_remote() {
        let config = AnalyzerConfig {
            api_key: Some("sk-test".to_string()),
            model: "gpt-test".to_string(),
            ..AnalyzerConfig::default()
        };
        let analyzer = analyzer_from_config(&config).unwrap();
        assert_eq!(analyzer.name(), "llm:gpt-test+rules");
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = AnalyzerConfig {
            call_timeout_secs: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(analyzer_from_config(&config), Err(AnalyzerError::Config(_))));
    }
}
