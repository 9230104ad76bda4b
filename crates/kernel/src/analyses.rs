//! Read and write access to the `analyses` collection.

use std::sync::Arc;

use time::OffsetDateTime;

use crate::error::StoreError;
use crate::model::{AnalysisRecord, Scores, StoredAnalysis};
use crate::store::{AnalysisFilter, DatabaseHandle};

pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// Repository over one analyses collection.
#[derive(Clone)]
pub struct AnalysisRepository {
    db: Arc<dyn DatabaseHandle>,
    collection: String,
}

impl AnalysisRepository {
    pub fn new(db: Arc<dyn DatabaseHandle>, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Label `scores`, stamp with the current time and insert.
    pub async fn store_analysis(
        &self,
        text: impl Into<String>,
        scores: Scores,
    ) -> Result<String, StoreError> {
        let record = AnalysisRecord::classified(text, scores, OffsetDateTime::now_utc());
        let id = self.db.insert_analysis(&self.collection, &record).await?;
        tracing::debug!(
            collection = %self.collection,
            %id,
            color = %record.color,
            "analysis stored"
        );
        Ok(id)
    }

    pub async fn recent_analyses(&self, limit: i64) -> Result<Vec<StoredAnalysis>, StoreError> {
        self.db
            .find_analyses(&self.collection, &AnalysisFilter::recent(limit))
            .await
    }

    pub async fn analyses_with_text(&self, text: &str) -> Result<Vec<StoredAnalysis>, StoreError> {
        self.db
            .find_analyses(&self.collection, &AnalysisFilter::with_text(text))
            .await
    }

    pub async fn analysis_by_id(&self, id: &str) -> Result<Option<StoredAnalysis>, StoreError> {
        self.db.analysis_by_id(&self.collection, id).await
    }
}
