//! Settings, domain model and storage seams for the sentiment analysis store.

pub mod analyses;
pub mod error;
pub mod index;
pub mod model;
pub mod settings;
pub mod store;

pub use analyses::AnalysisRepository;
pub use error::StoreError;
pub use index::{IndexSpec, SortOrder};
pub use model::{AnalysisRecord, Band, Scores, StoredAnalysis};
pub use store::{AnalysisFilter, CollectionState, Connection, DatabaseHandle};
