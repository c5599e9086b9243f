//! Prompt construction for model-backed analysis

use covenant_domain::{char_prefix, DocumentType};

/// What a prompt asks the model to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Parties, dates, amounts, durations, ...
    Entities,
    /// Categorized risks
    Risks,
    /// Expected terms that are absent
    MissingTerms,
    /// Short narrative summary
    Summary,
}

impl PromptKind {
    /// Task marker placed on the first line of every prompt
    pub fn marker(&self) -> &'static str {
        match self {
            PromptKind::Entities => "TASK: ENTITY_EXTRACTION",
            PromptKind::Risks => "TASK: RISK_IDENTIFICATION",
            PromptKind::MissingTerms => "TASK: MISSING_TERMS",
            PromptKind::Summary => "TASK: SUMMARY",
        }
    }

    /// Top-level key holding the result in the model's JSON answer
    pub fn result_key(&self) -> &'static str {
        match self {
            PromptKind::Entities => "entities",
            PromptKind::Risks => "risks",
            PromptKind::MissingTerms => "missing_terms",
            PromptKind::Summary => "summary",
        }
    }

    /// JSON schema description handed to structured generation
    pub fn schema(&self) -> &'static str {
        match self {
            PromptKind::Entities => ENTITY_SCHEMA,
            PromptKind::Risks => RISK_SCHEMA,
            PromptKind::MissingTerms => MISSING_TERM_SCHEMA,
            PromptKind::Summary => SUMMARY_SCHEMA,
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            PromptKind::Entities => ENTITY_INSTRUCTIONS,
            PromptKind::Risks => RISK_INSTRUCTIONS,
            PromptKind::MissingTerms => MISSING_TERM_INSTRUCTIONS,
            PromptKind::Summary => SUMMARY_INSTRUCTIONS,
        }
    }
}

/// Builds prompts over a bounded prefix of the document
pub struct PromptBuilder<'a> {
    kind: PromptKind,
    text: &'a str,
    document_type: DocumentType,
    max_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(kind: PromptKind, text: &'a str, document_type: DocumentType, max_chars: usize) -> Self {
        Self {
            kind,
            text,
            document_type,
            max_chars,
        }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(self.kind.marker());
        prompt.push_str("\n\n");

        prompt.push_str(self.kind.instructions());
        prompt.push_str("\n\n");

        prompt.push_str(&format!("Document type: {}\n\n", self.document_type.display_name()));

        let excerpt = char_prefix(self.text, self.max_chars);
        prompt.push_str("Document text:\n");
        prompt.push_str("---\n");
        prompt.push_str(excerpt);
        if excerpt.len() < self.text.len() {
            prompt.push_str("\n[truncated]");
        }
        prompt.push_str("\n---\n\n");

        prompt.push_str(&format!(
            "Return ONLY a JSON object with a \"{}\" field, no markdown code blocks, no explanations.",
            self.kind.result_key()
        ));

        prompt
    }
}

const ENTITY_INSTRUCTIONS: &str = r#"Extract the key entities from this business document.
Entity types: party, date, amount, duration, jurisdiction, obligation.
Give each entity a confidence between 0.0 and 1.0. Quote values exactly as written."#;

const RISK_INSTRUCTIONS: &str = r#"Identify the risks this document poses to the party reviewing it.
Categories: missing_clause, unfavorable_terms, compliance_issue, liability_exposure,
termination_risk, payment_risk, legal_ambiguity.
Severities: low, medium, high, critical. Reserve critical for issues that must be fixed before signing.
Give each risk a short title, a description, a concrete recommendation, and any related clause excerpts."#;

const MISSING_TERM_INSTRUCTIONS: &str = r#"List the terms a document of this type is expected to contain but which are absent.
Importance: required, recommended, optional.
Describe each term and the impact of leaving it out."#;

const SUMMARY_INSTRUCTIONS: &str = r#"Summarize this document in two or three sentences for a sales team:
what it is, who the parties are, and the main commercial terms."#;

const ENTITY_SCHEMA: &str = r#"{"entities": [{"type": "party|date|amount|duration|jurisdiction|obligation", "value": "string", "confidence": 0.0}]}"#;

const RISK_SCHEMA: &str = r#"{"risks": [{"category": "string", "severity": "low|medium|high|critical", "title": "string", "description": "string", "recommendation": "string", "related_clauses": ["string"]}]}"#;

const MISSING_TERM_SCHEMA: &str = r#"{"missing_terms": [{"term": "string", "importance": "required|recommended|optional", "description": "string", "impact": "string"}]}"#;

const SUMMARY_SCHEMA: &str = r#"{"summary": "string"}"#;
