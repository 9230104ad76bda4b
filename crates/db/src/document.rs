//! BSON shape of an analysis record.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use sentiment_kernel::{AnalysisRecord, Scores, StoreError, StoredAnalysis};

/// Document stored in the analyses collection. `timestamp` is a native BSON date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub text: String,
    pub scores: Scores,
    pub color: String,
    pub interpretation: String,
    pub timestamp: DateTime,
}

impl AnalysisDocument {
    pub fn from_record(record: &AnalysisRecord) -> Self {
        Self {
            id: None,
            text: record.text.clone(),
            scores: record.scores,
            color: record.color.clone(),
            interpretation: record.interpretation.clone(),
            timestamp: to_bson_datetime(record.timestamp),
        }
    }

    pub fn into_stored(self) -> Result<StoredAnalysis, StoreError> {
        let id = self
            .id
            .map(|oid| oid.to_hex())
            .ok_or_else(|| StoreError::persistence("analysis document without _id"))?;
        let timestamp = from_bson_datetime(self.timestamp)?;
        Ok(StoredAnalysis {
            id,
            record: AnalysisRecord {
                text: self.text,
                scores: self.scores,
                color: self.color,
                interpretation: self.interpretation,
                timestamp,
            },
        })
    }
}

/// BSON dates carry millisecond precision; sub-millisecond parts are truncated.
pub fn to_bson_datetime(timestamp: OffsetDateTime) -> DateTime {
    let millis = timestamp.unix_timestamp_nanos() / 1_000_000;
    DateTime::from_millis(millis as i64)
}

pub fn from_bson_datetime(timestamp: DateTime) -> Result<OffsetDateTime, StoreError> {
    let nanos = i128::from(timestamp.timestamp_millis()) * 1_000_000;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|err| StoreError::persistence(format!("timestamp out of range: {err}")))
}
