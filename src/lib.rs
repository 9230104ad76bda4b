//! Sentiment store bootstrap
//!
//! Brings a database to the baseline the sentiment analysis application
//! expects: the `analyses` collection, its query indexes and a seed record.

pub mod bootstrap;
pub mod initializer;
pub mod seed;
pub mod steps;

pub use initializer::{BootstrapError, InitReport, Initializer, SeedOutcome, COMPLETION_MESSAGE};
pub use steps::{Step, STEP_ORDER};
