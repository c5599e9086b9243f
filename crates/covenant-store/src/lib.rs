//! Covenant Storage Layer
//!
//! Implements the `AnalysisStore` trait in memory. Records hold the full
//! input alongside the analysis so a document can be recomputed later.
//!
//! # Examples
//!
//! ```
//! use covenant_store::InMemoryAnalysisStore;
//! use covenant_domain::traits::{AnalysisQuery, AnalysisStore};
//!
//! let store = InMemoryAnalysisStore::new();
//! assert!(store.list(&AnalysisQuery::default()).unwrap().is_empty());
//! ```

#![warn(missing_docs)]

use covenant_domain::traits::{AnalysisQuery, AnalysisStore};
use covenant_domain::{AnalysisId, AnalysisRecord, DocumentAnalysis};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A writer panicked while holding the lock
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// In-memory implementation of `AnalysisStore`
///
/// # Thread Safety
///
/// Interior `RwLock`; share one store across tasks behind an `Arc`.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisStore {
    records: RwLock<HashMap<AnalysisId, AnalysisRecord>>,
}

impl InMemoryAnalysisStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<AnalysisId, AnalysisRecord>>, StoreError> {
        self.records.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<AnalysisId, AnalysisRecord>>, StoreError> {
        self.records.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl AnalysisStore for InMemoryAnalysisStore {
    type Error = StoreError;

    fn put(&self, record: AnalysisRecord) -> Result<(), Self::Error> {
        let analysis = &record.analysis;
        if analysis.metadata.analyzed_at < analysis.metadata.created_at {
            return Err(StoreError::InvalidData(format!(
                "analysis {} analyzed before it was created",
                analysis.id
            )));
        }

        let id = analysis.id;
        let replaced = self.write()?.insert(id, record).is_some();
        debug!("Stored analysis {} (replaced: {})", id, replaced);
        Ok(())
    }

    fn get(&self, id: AnalysisId) -> Result<Option<AnalysisRecord>, Self::Error> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Matching analyses, oldest first (ids are time-ordered)
    fn list(&self, query: &AnalysisQuery) -> Result<Vec<DocumentAnalysis>, Self::Error> {
        let records = self.read()?;
        let mut matches: Vec<DocumentAnalysis> = records
            .values()
            .map(|record| &record.analysis)
            .filter(|analysis| query.matches(analysis))
            .cloned()
            .collect();
        drop(records);

        matches.sort_by_key(|analysis| analysis.id);
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    fn delete(&self, id: AnalysisId) -> Result<bool, Self::Error> {
        Ok(self.write()?.remove(&id).is_some())
    }
}
