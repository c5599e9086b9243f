//! Document classification from file name and content

use crate::document::DocumentType;

/// Filename substrings checked in priority order; first match wins
const FILENAME_RULES: [(&str, DocumentType); 7] = [
    ("nda", DocumentType::Nda),
    ("proposal", DocumentType::Proposal),
    ("contract", DocumentType::Contract),
    ("agreement", DocumentType::Agreement),
    ("invoice", DocumentType::Invoice),
    ("sow", DocumentType::Sow),
    ("msa", DocumentType::Msa),
];

/// Content keyword sets, in the order candidates are considered
const CONTENT_RULES: [(DocumentType, &[&str]); 6] = [
    (
        DocumentType::Nda,
        &[
            "non-disclosure",
            "nondisclosure",
            "confidential information",
            "disclosing party",
            "receiving party",
        ],
    ),
    (
        DocumentType::Msa,
        &[
            "master services agreement",
            "master service agreement",
            "master agreement",
            "statements of work",
            "order form",
        ],
    ),
    (
        DocumentType::Sow,
        &[
            "statement of work",
            "deliverables",
            "milestones",
            "acceptance criteria",
            "project schedule",
        ],
    ),
    (
        DocumentType::Invoice,
        &["invoice", "amount due", "bill to", "invoice number", "remit"],
    ),
    (
        DocumentType::Proposal,
        &["proposal", "we propose", "pricing", "our approach", "executive summary"],
    ),
    (
        DocumentType::Contract,
        &["agreement", "parties", "whereas", "hereby", "obligations"],
    ),
];

/// Minimum number of distinct keyword hits for a content match
pub const CONTENT_MATCH_THRESHOLD: usize = 2;

/// Classify a document by file name, then by content
///
/// # Examples
///
/// ```
/// use covenant_domain::{classify, DocumentType};
///
/// assert_eq!(classify("anything at all", "MSA-Acme.pdf"), DocumentType::Msa);
/// assert_eq!(classify("", "notes.txt"), DocumentType::Unknown);
/// ```
pub fn classify(text: &str, filename: &str) -> DocumentType {
    classify_by_filename(filename).unwrap_or_else(|| classify_by_content(text))
}

/// Classify by file name substrings only
pub fn classify_by_filename(filename: &str) -> Option<DocumentType> {
    let name = filename.to_lowercase();
    FILENAME_RULES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, doc_type)| *doc_type)
}

/// Classify by content keywords only
pub fn classify_by_content(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    CONTENT_RULES
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().filter(|kw| lower.contains(*kw)).count() >= CONTENT_MATCH_THRESHOLD
        })
        .map(|(doc_type, _)| *doc_type)
        .unwrap_or(DocumentType::Unknown)
}
