//! The sample record written at bootstrap.

use sentiment_kernel::{AnalysisRecord, Scores};
use time::OffsetDateTime;

pub const SEED_TEXT: &str = "This is a test sentiment analysis entry.";

/// Fully neutral scores.
pub const SEED_SCORES: Scores = Scores::new(0.0, 0.0, 1.0, 0.0);

/// Build the seed record stamped with `timestamp`.
pub fn seed_record(timestamp: OffsetDateTime) -> AnalysisRecord {
    AnalysisRecord::classified(SEED_TEXT, SEED_SCORES, timestamp)
}

/// Whether `record` carries the seed's text, scores and labels, at any timestamp.
pub fn is_seed(record: &AnalysisRecord) -> bool {
    let seed = seed_record(record.timestamp);
    record.text == seed.text
        && record.scores == seed.scores
        && record.color == seed.color
        && record.interpretation == seed.interpretation
}
