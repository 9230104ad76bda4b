//! Analysis records and the compound-score bands used to label them.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Polarity scores produced by the sentiment analyzer.
///
/// Written with long field names; the analyzer's raw `pos`/`neg`/`neu` keys
/// are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(alias = "pos")]
    pub positive: f64,
    #[serde(alias = "neg")]
    pub negative: f64,
    #[serde(alias = "neu")]
    pub neutral: f64,
    /// Aggregate signed score combining the other three.
    pub compound: f64,
}

impl Scores {
    pub const fn new(positive: f64, negative: f64, neutral: f64, compound: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
            compound,
        }
    }
}

/// One analyzed input as persisted in the `analyses` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub text: String,
    pub scores: Scores,
    pub color: String,
    pub interpretation: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl AnalysisRecord {
    /// Build a record whose color and interpretation come from the compound score.
    pub fn classified(text: impl Into<String>, scores: Scores, timestamp: OffsetDateTime) -> Self {
        let band = Band::from_compound(scores.compound);
        Self {
            text: text.into(),
            scores,
            color: band.color().to_string(),
            interpretation: band.interpretation().to_string(),
            timestamp,
        }
    }

    pub fn band(&self) -> Band {
        Band::from_compound(self.scores.compound)
    }
}

/// A record together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    pub id: String,
    #[serde(flatten)]
    pub record: AnalysisRecord,
}

/// Classification of a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl Band {
    pub fn from_compound(compound: f64) -> Self {
        if compound <= -0.6 {
            Band::VeryNegative
        } else if compound <= -0.2 {
            Band::Negative
        } else if compound < 0.2 {
            Band::Neutral
        } else if compound < 0.6 {
            Band::Positive
        } else {
            Band::VeryPositive
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Band::VeryNegative => "black",
            Band::Negative => "red",
            Band::Neutral => "green",
            Band::Positive => "blue",
            Band::VeryPositive => "orange",
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Band::VeryNegative => "⬛️ Very Negative - Shame, Powerlessness",
            Band::Negative => "🟥 Negative - Anger, Anxiety, Blame",
            Band::Neutral => "🟩 Neutral - Calm, Relaxed, Apathy",
            Band::Positive => "🟦 Positive - Hope, Motivation, Optimism",
            Band::VeryPositive => "🟧 Very Positive - Joy, Gratitude, Love",
        }
    }
}
