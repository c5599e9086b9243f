//! Document classification types and analysis input

use serde::{Deserialize, Serialize};

/// Closed set of document kinds the analyzer distinguishes
///
/// Classification never fails: anything that cannot be placed lands on
/// [`DocumentType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// General commercial contract
    Contract,
    /// Non-disclosure agreement
    Nda,
    /// Sales or services proposal
    Proposal,
    /// Agreement not otherwise classified
    Agreement,
    /// Invoice or bill
    Invoice,
    /// Statement of work
    Sow,
    /// Master services agreement
    Msa,
    /// Unclassified document
    #[default]
    Unknown,
}

impl DocumentType {
    /// All variants in declaration order
    pub const ALL: [DocumentType; 8] = [
        DocumentType::Contract,
        DocumentType::Nda,
        DocumentType::Proposal,
        DocumentType::Agreement,
        DocumentType::Invoice,
        DocumentType::Sow,
        DocumentType::Msa,
        DocumentType::Unknown,
    ];

    /// Get the document type label
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Nda => "nda",
            DocumentType::Proposal => "proposal",
            DocumentType::Agreement => "agreement",
            DocumentType::Invoice => "invoice",
            DocumentType::Sow => "sow",
            DocumentType::Msa => "msa",
            DocumentType::Unknown => "unknown",
        }
    }

    /// Human-readable name used in summaries and prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Contract => "Contract",
            DocumentType::Nda => "Non-Disclosure Agreement",
            DocumentType::Proposal => "Proposal",
            DocumentType::Agreement => "Agreement",
            DocumentType::Invoice => "Invoice",
            DocumentType::Sow => "Statement of Work",
            DocumentType::Msa => "Master Services Agreement",
            DocumentType::Unknown => "Document",
        }
    }

    /// Parse a document type label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "contract" => Some(DocumentType::Contract),
            "nda" => Some(DocumentType::Nda),
            "proposal" => Some(DocumentType::Proposal),
            "agreement" => Some(DocumentType::Agreement),
            "invoice" => Some(DocumentType::Invoice),
            "sow" => Some(DocumentType::Sow),
            "msa" => Some(DocumentType::Msa),
            "unknown" => Some(DocumentType::Unknown),
            _ => None,
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid document type: {}", s))
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document handed to the analysis pipeline
///
/// The text is already extracted by an upstream ingestion step; `confidence`
/// is whatever that step reported (e.g. OCR confidence) and is carried through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Extracted document text
    pub text: String,

    /// Original file name, used for classification
    pub filename: String,

    /// Optional document type hint supplied by the caller
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,

    /// Upstream extraction confidence, passed through opaquely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl DocumentInput {
    /// Create an input from text and file name
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
            document_type: None,
            confidence: None,
        }
    }

    /// Attach a document type hint
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = Some(document_type.into());
        self
    }

    /// Attach an upstream extraction confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// The document type hint, if present and recognised
    pub fn document_type_hint(&self) -> Option<DocumentType> {
        self.document_type.as_deref().and_then(DocumentType::parse)
    }
}

/// Take at most `max_chars` characters from the start of `text`
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
