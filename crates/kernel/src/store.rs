use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::index::IndexSpec;
use crate::model::{AnalysisRecord, StoredAnalysis};

/// Whether `ensure_collection` had to create the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    Created,
    AlreadyExisted,
}

/// Query over analysis records, always ordered newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisFilter {
    pub text: Option<String>,
    pub limit: Option<i64>,
}

impl AnalysisFilter {
    pub fn recent(limit: i64) -> Self {
        Self {
            text: None,
            limit: Some(limit),
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            limit: None,
        }
    }
}

/// Server-level handle. Establishing it is the caller's concern.
#[async_trait]
pub trait Connection: Sync + Send {
    /// Round-trip to the server; fails with [`StoreError::Connectivity`] when unreachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Select a database by name. Does not touch the server.
    fn database(&self, name: &str) -> Arc<dyn DatabaseHandle>;
}

/// Operations on one selected database.
#[async_trait]
pub trait DatabaseHandle: Sync + Send {
    fn name(&self) -> &str;

    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Create the collection unless it already exists.
    async fn ensure_collection(&self, collection: &str) -> Result<CollectionState, StoreError>;

    /// Declare an index; identical re-declarations are no-ops. Returns the index name.
    async fn ensure_index(&self, collection: &str, index: &IndexSpec)
        -> Result<String, StoreError>;

    async fn index_names(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Insert a new record and return its id. Never deduplicates.
    async fn insert_analysis(
        &self,
        collection: &str,
        record: &AnalysisRecord,
    ) -> Result<String, StoreError>;

    async fn find_analyses(
        &self,
        collection: &str,
        filter: &AnalysisFilter,
    ) -> Result<Vec<StoredAnalysis>, StoreError>;

    async fn analysis_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredAnalysis>, StoreError>;
}
