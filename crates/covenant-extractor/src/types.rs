//! Request and intermediate types for analysis

use covenant_domain::{
    DealBlocker, DocumentRisk, DocumentType, EntityType, ExtractedEntity, Importance, MissingTerm,
    RiskCategory, RiskScore, Severity,
};

/// Everything the summarizer may draw on
#[derive(Debug, Clone, Copy)]
pub struct SummaryContext<'a> {
    /// Source text
    pub text: &'a str,
    /// Classification
    pub document_type: DocumentType,
    /// Identified risks
    pub risks: &'a [DocumentRisk],
    /// Missing terms
    pub missing_terms: &'a [MissingTerm],
    /// Deal blockers
    pub blockers: &'a [DealBlocker],
    /// Computed score
    pub score: &'a RiskScore,
}

/// Entity as returned by the model, before conversion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EntityCandidate {
    pub entity_type: String,
    pub value: String,
    pub confidence: f64,
}

impl EntityCandidate {
    /// Validate that the candidate has all required fields
    pub fn validate(&self) -> Result<(), String> {
        if self.value.trim().is_empty() {
            return Err("value is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} out of range [0.0, 1.0]", self.confidence));
        }
        Ok(())
    }

    pub fn into_entity(self) -> ExtractedEntity {
        ExtractedEntity {
            entity_type: EntityType::parse_lenient(&self.entity_type),
            value: self.value,
            confidence: self.confidence,
            location: None,
        }
    }
}

/// Risk as returned by the model, before conversion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RiskCandidate {
    pub category: String,
    pub severity: String,
    pub title: String,
    pub description: String,
    pub recommendation: String,
    pub related_clauses: Vec<String>,
}

impl RiskCandidate {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if Severity::parse(&self.severity).is_none() {
            return Err(format!("unknown severity '{}'", self.severity));
        }
        Ok(())
    }

    pub fn into_risk(self) -> DocumentRisk {
        // validate() has already checked the severity label
        let severity = Severity::parse(&self.severity).unwrap_or(Severity::Medium);
        DocumentRisk::new(
            RiskCategory::parse_lenient(&self.category),
            severity,
            self.title,
            self.description,
            self.recommendation,
        )
        .with_related_clauses(self.related_clauses)
    }
}

/// Missing term as returned by the model, before conversion
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TermCandidate {
    pub term: String,
    pub importance: String,
    pub description: String,
    pub impact: String,
}

impl TermCandidate {
    pub fn validate(&self) -> Result<(), String> {
        if self.term.trim().is_empty() {
            return Err("term is empty".to_string());
        }
        if Importance::parse(&self.importance).is_none() {
            return Err(format!("unknown importance '{}'", self.importance));
        }
        Ok(())
    }

    pub fn into_missing_term(self) -> MissingTerm {
        MissingTerm {
            importance: Importance::parse(&self.importance).unwrap_or(Importance::Recommended),
            term: self.term,
            description: self.description,
            impact: self.impact,
        }
    }
}
