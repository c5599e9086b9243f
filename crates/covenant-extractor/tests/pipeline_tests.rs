//! End-to-end pipeline tests

use covenant_domain::{
    BlockerType, DocumentInput, DocumentType, EntityType, Grade, Priority, RiskCategory, Severity,
};
use covenant_extractor::{
    AnalysisPipeline, AnalyzerConfig, FallbackAnalyzer, LlmAnalyzer, PromptKind,
};
use covenant_llm::MockProvider;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CRITICAL_LIABILITY: &str = r#"{"risks": [
    {"category": "liability_exposure", "severity": "critical", "title": "Uncapped indemnity",
     "description": "Indemnity has no cap", "recommendation": "Cap indemnity at fees paid"},
    {"category": "liability_exposure", "severity": "critical", "title": "Consequential damages",
     "description": "Consequential damages are not excluded", "recommendation": "Exclude consequential damages"},
    {"category": "liability_exposure", "severity": "critical", "title": "Personal guarantee",
     "description": "Officers guarantee obligations", "recommendation": "Strike the guarantee"}
]}"#;

fn pipeline_over(llm: MockProvider) -> AnalysisPipeline {
    let config = AnalyzerConfig::default();
    let analyzer = FallbackAnalyzer::new(LlmAnalyzer::new(llm, &config), Duration::from_secs(5));
    AnalysisPipeline::new(Arc::new(analyzer), config)
}

#[tokio::test]
async fn test_three_critical_liability_risks_end_to_end() {
    let mut llm = MockProvider::failing();
    llm.add_response(PromptKind::Entities.marker(), r#"{"entities": []}"#);
    llm.add_response(PromptKind::Risks.marker(), CRITICAL_LIABILITY);
    llm.add_response(PromptKind::MissingTerms.marker(), r#"{"missing_terms": []}"#);
    llm.add_response(PromptKind::Summary.marker(), r#"{"summary": "Severe liability exposure."}"#);
    let pipeline = pipeline_over(llm);

    let input = DocumentInput::new("Master agreement. Signed by both parties.", "msa.pdf");
    let analysis = pipeline.analyze(&input).await;

    assert_eq!(analysis.document_type, DocumentType::Msa);
    assert_eq!(analysis.risks.len(), 3);
    assert!(analysis
        .risks
        .iter()
        .all(|r| r.category == RiskCategory::LiabilityExposure && r.severity == Severity::Critical));
    assert!(analysis.missing_terms.is_empty());

    // Each critical risk becomes a legal-review blocker
    assert_eq!(analysis.blockers.len(), 3);
    assert!(analysis
        .blockers
        .iter()
        .all(|b| b.blocker_type == BlockerType::LegalReview));

    // 3 x 30 from risks plus 3 x 5 from blockers, capped
    assert_eq!(analysis.risk_score.overall, 100);
    assert_eq!(analysis.risk_score.breakdown.liability_exposure, 25);
    assert_eq!(analysis.risk_score.grade, Grade::F);

    let urgent: Vec<_> = analysis
        .required_actions
        .iter()
        .filter(|a| a.priority == Priority::Urgent)
        .collect();
    assert_eq!(urgent.len(), 3);
    assert_eq!(urgent[0].action, "Address: Uncapped indemnity");
    assert_eq!(urgent[0].reason, "Cap indemnity at fees paid");
    assert_eq!(analysis.required_actions.len(), 6);
    assert!(analysis.required_actions[..3]
        .iter()
        .all(|a| a.priority == Priority::Urgent));

    assert_eq!(analysis.summary, "Severe liability exposure.");
    assert!(analysis.is_blocked());
}

#[tokio::test]
async fn test_model_outage_degrades_to_rules() {
    let pipeline = pipeline_over(MockProvider::failing());
    let rules = AnalysisPipeline::heuristic();

    let input = DocumentInput::new(
        "Payment of $5,000 is due within 30 days. The vendor accepts unlimited liability.",
        "services-contract.pdf",
    );
    let degraded = pipeline.analyze(&input).await;
    let expected = rules.analyze(&input).await;

    assert_eq!(degraded.document_type, DocumentType::Contract);
    assert_eq!(degraded.entities, expected.entities);
    assert_eq!(degraded.missing_terms, expected.missing_terms);
    assert_eq!(degraded.risks.len(), expected.risks.len());
    assert_eq!(degraded.risk_score.overall, expected.risk_score.overall);
    assert_eq!(degraded.summary, expected.summary);
    assert_eq!(degraded.metadata.analyzer, "llm:mock+rules");
}

#[tokio::test]
async fn test_partial_model_failure_mixes_sources() {
    let mut llm = MockProvider::failing();
    llm.add_response(
        PromptKind::Entities.marker(),
        r#"{"entities": [{"type": "party", "value": "Acme Corp", "confidence": 0.95}]}"#,
    );
    llm.add_response(PromptKind::Risks.marker(), "```json\nnot really json\n```");
    llm.add_response(PromptKind::MissingTerms.marker(), r#"{"missing_terms": []}"#);
    let pipeline = pipeline_over(llm);

    let input = DocumentInput::new("Acme Corp and Beta LLC. Signed.", "agreement.docx");
    let analysis = pipeline.analyze(&input).await;

    assert_eq!(analysis.entities.len(), 1);
    assert_eq!(analysis.entities[0].entity_type, EntityType::Party);
    // Risks fell back to the clause checklist
    assert_eq!(analysis.risks.len(), 5);
    assert!(analysis.missing_terms.is_empty());
    // Summary fell back too and reports the rule-based findings
    assert!(analysis.summary.contains("5 risk(s)"));
}

#[tokio::test]
async fn test_slow_model_times_out_per_call() {
    let llm = MockProvider::new(r#"{"entities": []}"#).with_latency(Duration::from_millis(400));
    let config = AnalyzerConfig::default();
    let analyzer = FallbackAnalyzer::new(LlmAnalyzer::new(llm, &config), Duration::from_millis(50));
    let pipeline = AnalysisPipeline::new(Arc::new(analyzer), config);

    let input = DocumentInput::new("Fee: $100", "invoice.pdf");
    let analysis = pipeline.analyze(&input).await;

    assert_eq!(analysis.document_type, DocumentType::Invoice);
    assert_eq!(analysis.entities.len(), 1);
    assert_eq!(analysis.entities[0].value, "$100");
}

#[tokio::test]
async fn test_hung_entity_call_does_not_block_other_extractions() {
    let mut llm = MockProvider::failing();
    llm.add_latency(PromptKind::Entities.marker(), Duration::from_secs(2));
    llm.add_response(PromptKind::Entities.marker(), r#"{"entities": []}"#);
    llm.add_response(
        PromptKind::Risks.marker(),
        r#"{"risks": [{"category": "payment_risk", "severity": "high", "title": "Net 120"}]}"#,
    );
    llm.add_response(
        PromptKind::MissingTerms.marker(),
        r#"{"missing_terms": [{"term": "Late Fees", "importance": "recommended"}]}"#,
    );
    llm.add_response(PromptKind::Summary.marker(), r#"{"summary": "Long payment terms."}"#);

    let config = AnalyzerConfig::default();
    let analyzer = FallbackAnalyzer::new(LlmAnalyzer::new(llm, &config), Duration::from_millis(200));
    let pipeline = AnalysisPipeline::new(Arc::new(analyzer), config);

    let input = DocumentInput::new("Fee: $100. Signed.", "invoice.pdf");
    let start = Instant::now();
    let analysis = pipeline.analyze(&input).await;
    let elapsed = start.elapsed();

    // Only the entity call hit its timeout and fell back to the patterns
    assert_eq!(analysis.entities.len(), 1);
    assert_eq!(analysis.entities[0].value, "$100");

    // Risks and terms still came from the model
    assert_eq!(analysis.risks.len(), 1);
    assert_eq!(analysis.risks[0].title, "Net 120");
    assert_eq!(analysis.missing_terms.len(), 1);
    assert_eq!(analysis.missing_terms[0].term, "Late Fees");
    assert_eq!(analysis.summary, "Long payment terms.");

    // Roughly one call budget, not the hang
    assert!(elapsed >= Duration::from_millis(200));
    assert!(elapsed < Duration::from_millis(1500), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_unsigned_document_has_single_signature_blocker() {
    let pipeline = AnalysisPipeline::heuristic();
    let input = DocumentInput::new(
        "This Agreement may be terminated. Liability is limited. The vendor shall indemnify. \
         Confidential Information is protected. Governed by Delaware law. \
         Payment is net 30. The term is one year. Services are described in the scope of work. \
         Disputes go to arbitration. Intellectual property remains with the owner.",
        "contract.pdf",
    )
    .with_document_type("contract");
    let analysis = pipeline.analyze(&input).await;

    let signature: Vec<_> = analysis
        .blockers
        .iter()
        .filter(|b| b.blocker_type == BlockerType::MissingSignature)
        .collect();
    assert_eq!(signature.len(), 1);
    assert_eq!(analysis.required_actions[0].priority, Priority::Urgent);
}

#[tokio::test]
async fn test_concurrent_analyses_are_independent() {
    let pipeline = AnalysisPipeline::heuristic();
    let nda = DocumentInput::new("Signed.", "nda.pdf");
    let invoice = DocumentInput::new("Signed. Total $10", "invoice.pdf");

    let (a, b) = tokio::join!(pipeline.analyze(&nda), pipeline.analyze(&invoice));

    assert_eq!(a.document_type, DocumentType::Nda);
    assert_eq!(b.document_type, DocumentType::Invoice);
    assert_ne!(a.id, b.id);
    assert!(a.entities.is_empty());
    assert_eq!(b.entities.len(), 1);
}
