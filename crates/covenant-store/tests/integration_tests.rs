//! Integration tests for covenant-store
//!
//! These tests exercise the full put/get/list/delete cycle.

use covenant_domain::traits::{AnalysisQuery, AnalysisStore};
use covenant_domain::{
    AnalysisId, AnalysisMetadata, AnalysisRecord, DocumentAnalysis, DocumentInput, DocumentType,
    Grade, RiskScore,
};
use covenant_store::InMemoryAnalysisStore;
use std::sync::Arc;
use std::thread;

fn record(document_type: DocumentType, overall: u32) -> AnalysisRecord {
    let filename = format!("{}.txt", document_type.as_str());
    AnalysisRecord {
        input: DocumentInput::new("body", filename.clone()),
        analysis: DocumentAnalysis {
            id: AnalysisId::new(),
            filename,
            document_type,
            entities: Vec::new(),
            risks: Vec::new(),
            missing_terms: Vec::new(),
            blockers: Vec::new(),
            risk_score: RiskScore {
                overall,
                grade: Grade::from_overall(overall),
                ..RiskScore::default()
            },
            required_actions: Vec::new(),
            summary: String::new(),
            raw_text_snapshot: "body".to_string(),
            source_confidence: None,
            metadata: AnalysisMetadata {
                created_at: 1000,
                analyzed_at: 1000,
                processing_time_ms: 3,
                analyzer: "rules".to_string(),
            },
        },
    }
}

#[test]
fn test_put_and_get_record() {
    let store = InMemoryAnalysisStore::new();
    let rec = record(DocumentType::Nda, 30);
    let id = rec.analysis.id;

    store.put(rec.clone()).unwrap();

    let retrieved = store.get(id).unwrap();
    assert_eq!(retrieved, Some(rec));
}

#[test]
fn test_get_unknown_id() {
    let store = InMemoryAnalysisStore::new();
    assert!(store.get(AnalysisId::new()).unwrap().is_none());
}

#[test]
fn test_delete_removes_record() {
    let store = InMemoryAnalysisStore::new();
    let rec = record(DocumentType::Contract, 10);
    let id = rec.analysis.id;
    store.put(rec).unwrap();

    assert!(store.delete(id).unwrap());
    assert!(store.get(id).unwrap().is_none());
    assert!(!store.delete(id).unwrap());
}

#[test]
fn test_list_filters_by_type() {
    let store = InMemoryAnalysisStore::new();
    store.put(record(DocumentType::Nda, 10)).unwrap();
    store.put(record(DocumentType::Contract, 20)).unwrap();
    store.put(record(DocumentType::Nda, 30)).unwrap();

    let query = AnalysisQuery {
        document_type: Some(DocumentType::Nda),
        ..AnalysisQuery::default()
    };
    let results = store.list(&query).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|a| a.document_type == DocumentType::Nda));
}

#[test]
fn test_list_filters_by_min_overall() {
    let store = InMemoryAnalysisStore::new();
    for overall in [5, 25, 45, 65] {
        store.put(record(DocumentType::Msa, overall)).unwrap();
    }

    let query = AnalysisQuery {
        min_overall: Some(45),
        ..AnalysisQuery::default()
    };
    let results = store.list(&query).unwrap();
    let scores: Vec<u32> = results.iter().map(|a| a.risk_score.overall).collect();
    assert_eq!(scores, vec![45, 65]);
}

#[test]
fn test_list_is_ordered_and_limited() {
    let store = InMemoryAnalysisStore::new();
    let ids: Vec<AnalysisId> = (0..5)
        .map(|i| {
            let rec = record(DocumentType::Invoice, i * 10);
            let id = rec.analysis.id;
            store.put(rec).unwrap();
            id
        })
        .collect();

    let query = AnalysisQuery {
        limit: Some(3),
        ..AnalysisQuery::default()
    };
    let results = store.list(&query).unwrap();
    let listed: Vec<AnalysisId> = results.iter().map(|a| a.id).collect();

    let mut expected = ids.clone();
    expected.sort();
    expected.truncate(3);
    assert_eq!(listed, expected);
}

#[test]
fn test_shared_across_threads() {
    let store = Arc::new(InMemoryAnalysisStore::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let rec = record(DocumentType::Sow, i);
                let id = rec.analysis.id;
                store.put(rec).unwrap();
                store.get(id).unwrap().is_some()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(store.len().unwrap(), 8);
}
