//! Rule-based extraction
//!
//! Regex and keyword detectors for entities, risks, missing terms, and
//! blockers. These are pure functions and always succeed, which is what
//! makes them the fallback for the model-backed analyzer.

use crate::types::SummaryContext;
use covenant_domain::{
    BlockerType, DealBlocker, DocumentRisk, DocumentType, EntityType, ExtractedEntity, Importance,
    MissingTerm, RiskCategory, Severity, TextSpan,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// A family of regexes yielding one entity type at a fixed confidence
struct EntityPattern {
    entity_type: EntityType,
    confidence: f64,
    regexes: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("entity pattern is a valid regex"))
        .collect()
}

static ENTITY_PATTERNS: Lazy<Vec<EntityPattern>> = Lazy::new(|| {
    vec![
        EntityPattern {
            entity_type: EntityType::Date,
            confidence: 0.8,
            regexes: compile(&[
                r"\b\d{1,2}/\d{1,2}/\d{2,4}\b",
                r"\b\d{4}-\d{2}-\d{2}\b",
                r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2},?\s+\d{4}\b",
            ]),
        },
        EntityPattern {
            entity_type: EntityType::Amount,
            confidence: 0.9,
            regexes: compile(&[
                r"\$\s?\d+(?:,\d{3})*(?:\.\d{1,2})?",
                r"(?i)\b\d+(?:,\d{3})*(?:\.\d+)?\s?(?:usd|eur|gbp|dollars)\b",
            ]),
        },
        EntityPattern {
            entity_type: EntityType::Duration,
            confidence: 0.7,
            regexes: compile(&[r"(?i)\b\d+\s+(?:business\s+)?(?:days?|weeks?|months?|years?)\b"]),
        },
    ]
});

/// Extract dates, amounts, and durations by pattern
///
/// Every match from every pattern becomes an entity; overlapping matches
/// from different patterns are all kept.
pub fn extract_entities_by_pattern(text: &str) -> Vec<ExtractedEntity> {
    ENTITY_PATTERNS
        .iter()
        .flat_map(|family| {
            family.regexes.iter().flat_map(move |re| {
                re.find_iter(text).map(move |m| ExtractedEntity {
                    entity_type: family.entity_type,
                    value: m.as_str().to_string(),
                    confidence: family.confidence,
                    location: Some(TextSpan { start: m.start(), end: m.end() }),
                })
            })
        })
        .collect()
}

/// A clause every business document is expected to carry
struct StandardClause {
    name: &'static str,
    keywords: &'static [&'static str],
    recommendation: &'static str,
}

const STANDARD_CLAUSES: [StandardClause; 5] = [
    StandardClause {
        name: "Termination",
        keywords: &["terminat"],
        recommendation: "Add a termination clause with notice periods and termination-for-cause rights.",
    },
    StandardClause {
        name: "Liability",
        keywords: &["liability", "liable"],
        recommendation: "Add a limitation of liability clause capping damages.",
    },
    StandardClause {
        name: "Indemnification",
        keywords: &["indemnif", "hold harmless"],
        recommendation: "Add mutual indemnification obligations.",
    },
    StandardClause {
        name: "Confidentiality",
        keywords: &["confidential", "non-disclosure"],
        recommendation: "Add confidentiality obligations covering shared information.",
    },
    StandardClause {
        name: "Governing Law",
        keywords: &["governing law", "governed by", "jurisdiction"],
        recommendation: "Specify the governing law and venue for disputes.",
    },
];

struct UnfavorablePattern {
    title: &'static str,
    severity: Severity,
    regex: Regex,
    description: &'static str,
    recommendation: &'static str,
}

static UNFAVORABLE_PATTERNS: Lazy<Vec<UnfavorablePattern>> = Lazy::new(|| {
    let pattern = |title, severity, re: &str, description, recommendation| UnfavorablePattern {
        title,
        severity,
        regex: Regex::new(re).expect("risk pattern is a valid regex"),
        description,
        recommendation,
    };
    vec![
        pattern(
            "Unlimited Liability",
            Severity::High,
            r"(?i)unlimited\s+liability|liability\s+shall\s+not\s+be\s+limited",
            "The document exposes a party to liability without a cap.",
            "Negotiate a liability cap, typically tied to fees paid.",
        ),
        pattern(
            "Waiver of Rights",
            Severity::Medium,
            r"(?i)waives?\s+(?:any\s+and\s+all|all|any)\s+(?:rights|claims|remedies)",
            "A party waives rights or claims it would otherwise hold.",
            "Narrow or remove the waiver language.",
        ),
        pattern(
            "Automatic Renewal",
            Severity::Low,
            r"(?i)auto(?:matic(?:ally)?)?[\s-]*renew",
            "The agreement renews automatically unless cancelled.",
            "Track the renewal date or require affirmative renewal.",
        ),
        pattern(
            "Non-Compete Restriction",
            Severity::Medium,
            r"(?i)non[\s-]?compet|shall\s+not\s+compete",
            "A non-compete restricts future business activity.",
            "Limit the non-compete in scope, territory, and duration.",
        ),
    ]
});

fn contains_any(lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower.contains(kw))
}

/// Identify risks from missing standard clauses and unfavorable language
///
/// Clause presence and unfavorable-language checks are independent: a
/// document can both lack a liability clause and contain "unlimited
/// liability".
pub fn identify_risks_by_rule(text: &str, _document_type: DocumentType) -> Vec<DocumentRisk> {
    let lower = text.to_lowercase();

    let missing = STANDARD_CLAUSES
        .iter()
        .filter(|clause| !contains_any(&lower, clause.keywords))
        .map(|clause| {
            DocumentRisk::new(
                RiskCategory::MissingClause,
                Severity::Medium,
                format!("Missing {} Clause", clause.name),
                format!("No {} clause was found in the document.", clause.name.to_lowercase()),
                clause.recommendation,
            )
        });

    let unfavorable = UNFAVORABLE_PATTERNS.iter().filter_map(|pattern| {
        pattern.regex.find(text).map(|m| {
            DocumentRisk::new(
                RiskCategory::UnfavorableTerms,
                pattern.severity,
                pattern.title,
                pattern.description,
                pattern.recommendation,
            )
            .with_related_clauses(vec![m.as_str().to_string()])
        })
    });

    missing.chain(unfavorable).collect()
}

/// A checklist entry for missing-term detection
struct RequiredTerm {
    term: &'static str,
    keywords: &'static [&'static str],
    description: &'static str,
    impact: &'static str,
}

const CONTRACT_TERMS: &[RequiredTerm] = &[
    RequiredTerm {
        term: "Payment Terms",
        keywords: &["payment", "compensation", "fees"],
        description: "How much is paid, when, and how.",
        impact: "Payment disputes and delayed revenue.",
    },
    RequiredTerm {
        term: "Term and Duration",
        keywords: &["effective date", "term of", "duration", "commence"],
        description: "When the agreement starts and how long it runs.",
        impact: "Unclear obligations over time.",
    },
    RequiredTerm {
        term: "Termination Rights",
        keywords: &["terminat"],
        description: "How either party may end the agreement.",
        impact: "No clean exit from a failing relationship.",
    },
    RequiredTerm {
        term: "Limitation of Liability",
        keywords: &["limitation of liability", "limit liability", "liability cap", "aggregate liability"],
        description: "A cap on damages either party can claim.",
        impact: "Uncapped financial exposure.",
    },
    RequiredTerm {
        term: "Dispute Resolution",
        keywords: &["dispute", "arbitration", "mediation"],
        description: "How disagreements are resolved.",
        impact: "Costly litigation by default.",
    },
];

const NDA_TERMS: &[RequiredTerm] = &[
    RequiredTerm {
        term: "Definition of Confidential Information",
        keywords: &["confidential information"],
        description: "What information is protected.",
        impact: "Protection may not cover the information that matters.",
    },
    RequiredTerm {
        term: "Confidentiality Period",
        keywords: &["years", "period of", "survive"],
        description: "How long the obligations last.",
        impact: "Obligations may lapse early or never end.",
    },
    RequiredTerm {
        term: "Permitted Disclosures",
        keywords: &["required by law", "permitted disclosure", "exceptions", "publicly available"],
        description: "When disclosure is allowed.",
        impact: "Compelled disclosure could become a breach.",
    },
    RequiredTerm {
        term: "Return of Materials",
        keywords: &["return", "destroy", "destruction"],
        description: "What happens to materials when the relationship ends.",
        impact: "Confidential material stays with the other party.",
    },
    RequiredTerm {
        term: "Remedies",
        keywords: &["injunctive", "remedies", "equitable relief"],
        description: "Relief available on breach.",
        impact: "Slow or inadequate relief after a leak.",
    },
];

const PROPOSAL_TERMS: &[RequiredTerm] = &[
    RequiredTerm {
        term: "Scope of Work",
        keywords: &["scope", "deliverables"],
        description: "What will be delivered.",
        impact: "Scope creep and mismatched expectations.",
    },
    RequiredTerm {
        term: "Pricing",
        keywords: &["price", "pricing", "cost", "fee"],
        description: "What the work costs.",
        impact: "No basis for a purchase decision.",
    },
    RequiredTerm {
        term: "Timeline",
        keywords: &["timeline", "schedule", "milestone"],
        description: "When work will be delivered.",
        impact: "No commitment on delivery dates.",
    },
    RequiredTerm {
        term: "Validity Period",
        keywords: &["valid until", "valid for", "expires", "expiration"],
        description: "How long the offer stands.",
        impact: "Pricing may be challenged later.",
    },
    RequiredTerm {
        term: "Acceptance",
        keywords: &["accept", "signature", "approval"],
        description: "How the proposal is accepted.",
        impact: "Unclear when a binding commitment exists.",
    },
];

fn checklist_for(document_type: DocumentType) -> &'static [RequiredTerm] {
    match document_type {
        DocumentType::Nda => NDA_TERMS,
        DocumentType::Proposal => PROPOSAL_TERMS,
        _ => CONTRACT_TERMS,
    }
}

/// Identify required terms absent from the document
///
/// Contracts, NDAs, and proposals have their own checklists; every other
/// type is checked against the contract checklist.
pub fn identify_missing_terms_by_rule(text: &str, document_type: DocumentType) -> Vec<MissingTerm> {
    let lower = text.to_lowercase();
    checklist_for(document_type)
        .iter()
        .filter(|entry| !contains_any(&lower, entry.keywords))
        .map(|entry| MissingTerm {
            term: entry.term.to_string(),
            importance: Importance::Required,
            description: entry.description.to_string(),
            impact: entry.impact.to_string(),
        })
        .collect()
}

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bsign(?:ed|ature|atures|atory|atories)\b|in\s+witness\s+whereof|/s/|executed\s+by")
        .expect("signature pattern is a valid regex")
});

/// Whether the text carries any signature or execution language
pub fn has_signature(text: &str) -> bool {
    SIGNATURE_RE.is_match(text)
}

/// Derive blockers from the signature check, critical risks, and required terms
pub fn identify_blockers_by_rule(
    text: &str,
    risks: &[DocumentRisk],
    missing_terms: &[MissingTerm],
) -> Vec<DealBlocker> {
    let signature = (!has_signature(text)).then(|| {
        DealBlocker::new(
            BlockerType::MissingSignature,
            "Missing Signatures",
            "No signature block or execution language was found.",
            "Obtain signatures from all parties",
        )
    });

    let reviews = risks
        .iter()
        .filter(|risk| risk.severity == Severity::Critical)
        .map(|risk| {
            DealBlocker::new(
                BlockerType::LegalReview,
                format!("Legal Review: {}", risk.title),
                risk.description.clone(),
                format!("Have counsel review and resolve: {}", risk.title),
            )
        });

    let negotiations = missing_terms
        .iter()
        .filter(|term| term.importance == Importance::Required)
        .map(|term| {
            DealBlocker::new(
                BlockerType::NegotiationRequired,
                format!("Missing Required Term: {}", term.term),
                term.description.clone(),
                format!("Negotiate and add {} to the document", term.term),
            )
        });

    signature.into_iter().chain(reviews).chain(negotiations).collect()
}

/// Compose a short summary from the findings
pub fn summarize_by_rule(ctx: &SummaryContext<'_>) -> String {
    if ctx.text.trim().is_empty() {
        return "No document text was available for analysis.".to_string();
    }

    let serious = ctx.risks.iter().filter(|r| r.severity >= Severity::High).count();
    let mut summary = format!(
        "{} with risk score {}/100 (grade {}). Found {} risk(s), {} of them high or critical; {} missing term(s); {} blocker(s).",
        ctx.document_type.display_name(),
        ctx.score.overall,
        ctx.score.grade.as_str(),
        ctx.risks.len(),
        serious,
        ctx.missing_terms.len(),
        ctx.blockers.len(),
    );

    if let Some(top) = ctx.risks.iter().max_by_key(|r| r.severity) {
        summary.push_str(&format!(" Top concern: {}.", top.title));
    }
    summary
}
