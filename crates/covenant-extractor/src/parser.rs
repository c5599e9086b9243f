//! Parse model output into findings

use crate::error::AnalyzerError;
use crate::prompt::PromptKind;
use crate::types::{EntityCandidate, RiskCandidate, TermCandidate};
use covenant_domain::{DocumentRisk, ExtractedEntity, MissingTerm};
use serde_json::{Map, Value};
use tracing::warn;

/// Parse an entity-extraction response
pub fn parse_entities(response: &str) -> Result<Vec<ExtractedEntity>, AnalyzerError> {
    let items = result_items(response, PromptKind::Entities)?;
    Ok(collect_valid(items, "entity", |obj| {
        let candidate = EntityCandidate {
            entity_type: str_field(obj, "type").unwrap_or_else(|_| "other".to_string()),
            value: str_field(obj, "value")?,
            confidence: obj
                .get("confidence")
                .and_then(Value::as_f64)
                .ok_or_else(|| "Missing or invalid 'confidence'".to_string())?,
        };
        candidate.validate()?;
        Ok(candidate.into_entity())
    }))
}

/// Parse a risk-identification response
pub fn parse_risks(response: &str) -> Result<Vec<DocumentRisk>, AnalyzerError> {
    let items = result_items(response, PromptKind::Risks)?;
    Ok(collect_valid(items, "risk", |obj| {
        let candidate = RiskCandidate {
            category: str_field(obj, "category")?,
            severity: str_field(obj, "severity")?,
            title: str_field(obj, "title")?,
            description: str_field(obj, "description").unwrap_or_default(),
            recommendation: str_field(obj, "recommendation").unwrap_or_default(),
            related_clauses: obj
                .get("related_clauses")
                .and_then(Value::as_array)
                .map(|clauses| {
                    clauses
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        };
        candidate.validate()?;
        Ok(candidate.into_risk())
    }))
}

/// Parse a missing-terms response
pub fn parse_missing_terms(response: &str) -> Result<Vec<MissingTerm>, AnalyzerError> {
    let items = result_items(response, PromptKind::MissingTerms)?;
    Ok(collect_valid(items, "missing term", |obj| {
        let candidate = TermCandidate {
            term: str_field(obj, "term")?,
            importance: str_field(obj, "importance")?,
            description: str_field(obj, "description").unwrap_or_default(),
            impact: str_field(obj, "impact").unwrap_or_default(),
        };
        candidate.validate()?;
        Ok(candidate.into_missing_term())
    }))
}

/// Parse a summary response
///
/// Accepts `{"summary": "..."}` or a bare JSON string. Anything else, such
/// as a refusal or truncated JSON, is rejected so the caller can fall back.
pub fn parse_summary(response: &str) -> Result<String, AnalyzerError> {
    let json_str = extract_json(response)?;
    let summary = match serde_json::from_str::<Value>(&json_str) {
        Ok(Value::Object(obj)) => obj
            .get(PromptKind::Summary.result_key())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AnalyzerError::InvalidFormat("Missing 'summary' field".to_string()))?,
        Ok(Value::String(s)) => s,
        Ok(_) => return Err(AnalyzerError::InvalidFormat("Unexpected summary shape".to_string())),
        Err(e) => {
            return Err(AnalyzerError::InvalidFormat(format!("Summary is not JSON: {}", e)))
        }
    };

    if summary.trim().is_empty() {
        return Err(AnalyzerError::InvalidFormat("Empty summary".to_string()));
    }
    Ok(summary.trim().to_string())
}

/// Locate the result array: either the whole answer or the kind's field
fn result_items(response: &str, kind: PromptKind) -> Result<Vec<Value>, AnalyzerError> {
    let json_str = extract_json(response)?;
    let json: Value = serde_json::from_str(&json_str)?;

    match json {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove(kind.result_key()) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(AnalyzerError::InvalidFormat(format!(
                "Field '{}' is not an array",
                kind.result_key()
            ))),
            None => Err(AnalyzerError::InvalidFormat(format!(
                "Missing field '{}'",
                kind.result_key()
            ))),
        },
        _ => Err(AnalyzerError::InvalidFormat("Expected JSON object or array".to_string())),
    }
}

/// Convert each item, skipping (and logging) the ones that fail
fn collect_valid<T>(
    items: Vec<Value>,
    label: &str,
    convert: impl Fn(&Map<String, Value>) -> Result<T, String>,
) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let result = item
                .as_object()
                .ok_or_else(|| format!("{} is not a JSON object", label))
                .and_then(&convert);
            match result {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Skipping {} {}: {}", label, idx, e);
                    None
                }
            }
        })
        .collect()
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("Missing or invalid '{}'", key))
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, AnalyzerError> {
    let trimmed = response.trim();

    if trimmed.is_empty() {
        return Err(AnalyzerError::InvalidFormat("Empty response".to_string()));
    }

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(AnalyzerError::InvalidFormat("Empty code block".to_string()));
        }

        // Body runs up to the first closing fence; anything after it is prose
        let end = lines[1..]
            .iter()
            .position(|line| line.trim_start().starts_with("```"))
            .map_or(lines.len(), |idx| idx + 1);
        return Ok(lines[1..end].join("\n"));
    }

    // Leading or trailing prose around a JSON value
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end && (start > 0 || end < trimmed.len() - 1) => {
            Ok(trimmed[start..=end].to_string())
        }
        _ => Ok(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_domain::{EntityType, Importance, RiskCategory, Severity};

    #[test]
    fn test_parse_entities_object() {
        let response = r#"{"entities": [
            {"type": "party", "value": "Acme Corp", "confidence": 0.95},
            {"type": "amount", "value": "$10,000", "confidence": 0.9}
        ]}"#;
        let entities = parse_entities(response).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_type, EntityType::Party);
        assert_eq!(entities[1].value, "$10,000");
        assert!(entities[0].location.is_none());
    }

    #[test]
    fn test_parse_entities_bare_array() {
        let response = r#"[{"type": "venue", "value": "Delaware", "confidence": 0.6}]"#;
        let entities = parse_entities(response).unwrap();
        assert_eq!(entities[0].entity_type, EntityType::Other);
    }

    #[test]
    fn test_parse_risks_with_markdown_wrapper() {
        let response = r#"```json
{"risks": [
    {
        "category": "liability_exposure",
        "severity": "critical",
        "title": "Uncapped indemnity",
        "description": "Indemnity has no cap",
        "recommendation": "Cap at 12 months fees",
        "related_clauses": ["Section 9.2"]
    }
]}
```"#;
        let risks = parse_risks(response).unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].category, RiskCategory::LiabilityExposure);
        assert_eq!(risks[0].severity, Severity::Critical);
        assert_eq!(risks[0].related_clauses, vec!["Section 9.2"]);
    }

    #[test]
    fn test_parse_risks_partial_success() {
        let response = r#"{"risks": [
            {"category": "payment_risk", "severity": "high", "title": "Net 120"},
            {"category": "payment_risk", "severity": "extreme", "title": "Bad severity"},
            {"severity": "low", "title": "No category"},
            "not an object",
            {"category": "privacy", "severity": "low", "title": "Data retention"}
        ]}"#;
        let risks = parse_risks(response).unwrap();
        assert_eq!(risks.len(), 2);
        assert_eq!(risks[0].title, "Net 120");
        assert_eq!(risks[1].category, RiskCategory::Other);
    }

    #[test]
    fn test_parse_missing_terms() {
        let response = r#"{"missing_terms": [
            {"term": "Payment Terms", "importance": "required", "description": "d", "impact": "i"},
            {"term": "Warranty", "importance": "nice", "description": "d", "impact": "i"}
        ]}"#;
        let terms = parse_missing_terms(response).unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].importance, Importance::Required);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_risks("This is not JSON").is_err());
        assert!(parse_entities("").is_err());
    }

    #[test]
    fn test_parse_wrong_field() {
        let result = parse_risks(r#"{"entities": []}"#);
        assert!(matches!(result, Err(AnalyzerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_field_not_array() {
        let result = parse_risks(r#"{"risks": "none"}"#);
        assert!(matches!(result, Err(AnalyzerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_summary_variants() {
        assert_eq!(parse_summary(r#"{"summary": " An NDA. "}"#).unwrap(), "An NDA.");
        assert_eq!(parse_summary(r#""A JSON string.""#).unwrap(), "A JSON string.");
        assert!(parse_summary(r#"{"summary": ""}"#).is_err());
        assert!(parse_summary(r#"{"other": "x"}"#).is_err());
    }

    #[test]
    fn test_parse_summary_rejects_non_json() {
        let refusal = parse_summary("I'm sorry, but I can't help with that request.");
        assert!(matches!(refusal, Err(AnalyzerError::InvalidFormat(_))));

        let truncated = parse_summary("```json\n{\"summary\": \"The agreement between Acme and");
        assert!(matches!(truncated, Err(AnalyzerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_risks_fenced_with_trailing_remark() {
        let response = "```json\n{\"risks\": [\n  {\"category\": \"privacy\", \"severity\": \"low\", \"title\": \"Retention\"}\n]}\n```\nLet me know if you need more.";
        let risks = parse_risks(response).unwrap();
        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].title, "Retention");

        let empty = parse_risks("```json\n{\"risks\": []}\n```\nLet me know if you need more.");
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn test_extract_json_from_prose() {
        let response = "Here you go: {\"risks\": []} Hope that helps.";
        assert_eq!(extract_json(response).unwrap(), "{\"risks\": []}");
    }

    #[test]
    fn test_extract_json_from_markdown_without_language() {
        let response = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(extract_json(response).unwrap().trim(), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_plain() {
        let json = r#"{"key": "value"}"#;
        assert_eq!(extract_json(json).unwrap(), json);
    }
}
