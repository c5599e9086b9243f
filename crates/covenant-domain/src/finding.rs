//! Findings produced by extraction: entities, risks, missing terms, blockers

use crate::ids::FindingId;
use serde::{Deserialize, Serialize};

/// Kind of entity pulled out of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A contracting party
    Party,
    /// A calendar date
    Date,
    /// A monetary amount
    Amount,
    /// A time span ("30 days")
    Duration,
    /// Governing jurisdiction or venue
    Jurisdiction,
    /// An obligation placed on a party
    Obligation,
    /// Anything else
    #[serde(other)]
    Other,
}

impl EntityType {
    /// Get the entity type label
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Party => "party",
            EntityType::Date => "date",
            EntityType::Amount => "amount",
            EntityType::Duration => "duration",
            EntityType::Jurisdiction => "jurisdiction",
            EntityType::Obligation => "obligation",
            EntityType::Other => "other",
        }
    }

    /// Parse a label leniently; unknown labels map to `Other`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "party" | "parties" => EntityType::Party,
            "date" => EntityType::Date,
            "amount" | "money" | "currency" => EntityType::Amount,
            "duration" | "term" => EntityType::Duration,
            "jurisdiction" => EntityType::Jurisdiction,
            "obligation" => EntityType::Obligation,
            _ => EntityType::Other,
        }
    }
}

/// Byte range of a match within the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

/// An entity found in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Entity kind
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Matched text
    pub value: String,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,

    /// Where the entity was found, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<TextSpan>,
}

/// Risk category; drives the scoring weight and breakdown bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// A standard clause is absent
    MissingClause,
    /// Language that disadvantages the reader's side
    UnfavorableTerms,
    /// Regulatory or compliance problem
    ComplianceIssue,
    /// Open-ended liability
    LiabilityExposure,
    /// Termination conditions are risky
    TerminationRisk,
    /// Payment conditions are risky
    PaymentRisk,
    /// Wording is ambiguous
    LegalAmbiguity,
    /// Category not in the fixed set
    #[serde(other)]
    Other,
}

impl RiskCategory {
    /// Get the category label
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::MissingClause => "missing_clause",
            RiskCategory::UnfavorableTerms => "unfavorable_terms",
            RiskCategory::ComplianceIssue => "compliance_issue",
            RiskCategory::LiabilityExposure => "liability_exposure",
            RiskCategory::TerminationRisk => "termination_risk",
            RiskCategory::PaymentRisk => "payment_risk",
            RiskCategory::LegalAmbiguity => "legal_ambiguity",
            RiskCategory::Other => "other",
        }
    }

    /// Parse a label leniently; unknown labels map to `Other`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "missing_clause" => RiskCategory::MissingClause,
            "unfavorable_terms" | "unfavourable_terms" => RiskCategory::UnfavorableTerms,
            "compliance_issue" => RiskCategory::ComplianceIssue,
            "liability_exposure" => RiskCategory::LiabilityExposure,
            "termination_risk" => RiskCategory::TerminationRisk,
            "payment_risk" => RiskCategory::PaymentRisk,
            "legal_ambiguity" => RiskCategory::LegalAmbiguity,
            _ => RiskCategory::Other,
        }
    }
}

/// Risk severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Low,
    /// Worth negotiating
    Medium,
    /// Should be fixed before signing
    High,
    /// Must be fixed before signing
    Critical,
}

impl Severity {
    /// Get the severity label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Parse a severity label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            "critical" => Some(Severity::Critical),
            _ => None,
        }
    }
}

/// A named concern about document content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRisk {
    /// Unique identifier
    pub id: FindingId,
    /// Risk category
    pub category: RiskCategory,
    /// Severity
    pub severity: Severity,
    /// Short title
    pub title: String,
    /// What the problem is
    pub description: String,
    /// What to do about it
    pub recommendation: String,
    /// Clause excerpts or references the risk relates to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_clauses: Vec<String>,
}

impl DocumentRisk {
    /// Create a risk with a fresh identifier
    pub fn new(
        category: RiskCategory,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            id: FindingId::new(),
            category,
            severity,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            related_clauses: Vec::new(),
        }
    }

    /// Attach related clause references
    pub fn with_related_clauses(mut self, clauses: Vec<String>) -> Self {
        self.related_clauses = clauses;
        self
    }
}

/// How much a missing term matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    /// Must be present
    Required,
    /// Should be present
    Recommended,
    /// Nice to have
    Optional,
}

impl Importance {
    /// Get the importance label
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Required => "required",
            Importance::Recommended => "recommended",
            Importance::Optional => "optional",
        }
    }

    /// Parse an importance label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "required" => Some(Importance::Required),
            "recommended" => Some(Importance::Recommended),
            "optional" => Some(Importance::Optional),
            _ => None,
        }
    }
}

/// An expected clause or field that the document lacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTerm {
    /// Name of the term
    pub term: String,
    /// How much it matters
    pub importance: Importance,
    /// What the term covers
    pub description: String,
    /// Consequence of leaving it out
    pub impact: String,
}

/// Kind of deal blocker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockerType {
    /// No signature block or execution language
    MissingSignature,
    /// Counsel must review before progress
    LegalReview,
    /// A term must be negotiated in
    NegotiationRequired,
    /// Internal approval needed
    ApprovalRequired,
    /// Compliance sign-off needed
    ComplianceCheck,
}

impl BlockerType {
    /// Get the blocker type label
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockerType::MissingSignature => "missing_signature",
            BlockerType::LegalReview => "legal_review",
            BlockerType::NegotiationRequired => "negotiation_required",
            BlockerType::ApprovalRequired => "approval_required",
            BlockerType::ComplianceCheck => "compliance_check",
        }
    }
}

/// A condition that halts deal progress until resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealBlocker {
    /// Unique identifier
    pub id: FindingId,
    /// Blocker kind
    #[serde(rename = "type")]
    pub blocker_type: BlockerType,
    /// Short title
    pub title: String,
    /// What blocks progress
    pub description: String,
    /// What must happen to clear it
    pub required_action: String,
    /// Owner, when assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Due date, when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl DealBlocker {
    /// Create a blocker with a fresh identifier
    pub fn new(
        blocker_type: BlockerType,
        title: impl Into<String>,
        description: impl Into<String>,
        required_action: impl Into<String>,
    ) -> Self {
        Self {
            id: FindingId::new(),
            blocker_type,
            title: title.into(),
            description: description.into(),
            required_action: required_action.into(),
            assigned_to: None,
            due_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_category_parse_lenient() {
        assert_eq!(RiskCategory::parse_lenient("Liability Exposure"), RiskCategory::LiabilityExposure);
        assert_eq!(RiskCategory::parse_lenient("payment-risk"), RiskCategory::PaymentRisk);
        assert_eq!(RiskCategory::parse_lenient("tax"), RiskCategory::Other);
    }

    #[test]
    fn test_unknown_category_deserializes_to_other() {
        let category: RiskCategory = serde_json::from_str("\"data_privacy\"").unwrap();
        assert_eq!(category, RiskCategory::Other);
    }

    #[test]
    fn test_risk_ids_are_distinct() {
        let a = DocumentRisk::new(RiskCategory::Other, Severity::Low, "a", "", "");
        let b = DocumentRisk::new(RiskCategory::Other, Severity::Low, "a", "", "");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_blocker_serializes_type_label() {
        let blocker = DealBlocker::new(BlockerType::MissingSignature, "t", "d", "a");
        let json = serde_json::to_value(&blocker).unwrap();
        assert_eq!(json["type"], "missing_signature");
        assert!(json.get("assigned_to").is_none());
    }

    #[test]
    fn test_importance_parse() {
        assert_eq!(Importance::parse("Required"), Some(Importance::Required));
        assert_eq!(Importance::parse("critical"), None);
    }
}
