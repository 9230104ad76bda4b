use std::io::Write;

use thiserror::Error;
use time::OffsetDateTime;

use sentiment_kernel::index::analysis_indexes;
use sentiment_kernel::settings::{SeedPolicy, Settings};
use sentiment_kernel::{AnalysisFilter, CollectionState, Connection, IndexSpec, StoreError};

use crate::seed::{is_seed, seed_record, SEED_TEXT};
use crate::steps::{Step, STEP_ORDER};

/// Line written to the output once every step succeeded.
pub const COMPLETION_MESSAGE: &str = "Database initialization completed!";

/// Bootstrap failure, tagged with the step that raised it.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("{step} failed: {source}")]
    Store {
        step: Step,
        #[source]
        source: StoreError,
    },

    #[error("failed to write completion message: {0}")]
    Output(#[from] std::io::Error),
}

impl BootstrapError {
    fn at(step: Step) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { step, source }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BootstrapError::Store { source, .. } => source.code(),
            BootstrapError::Output(_) => "output_error",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::Store { source, .. } => source.exit_code(),
            BootstrapError::Output(_) => 74,
        }
    }
}

/// What happened to the seed record on this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Inserted { id: String },
    AlreadyPresent { id: String },
    Disabled,
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub database: String,
    pub collection: String,
    pub collection_state: CollectionState,
    pub indexes: Vec<String>,
    pub seed: SeedOutcome,
}

/// Brings a database to the baseline the analysis application expects.
#[derive(Debug, Clone)]
pub struct Initializer {
    database: String,
    collection: String,
    indexes: Vec<IndexSpec>,
    seed_policy: SeedPolicy,
}

impl Initializer {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
            indexes: analysis_indexes(),
            seed_policy: SeedPolicy::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.database.name, &settings.database.collection)
            .with_seed_policy(settings.seed.policy)
    }

    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    pub fn seed_policy(&self) -> SeedPolicy {
        self.seed_policy
    }

    /// Run every step against `conn`, stamping the seed with the current time.
    pub async fn run<W: Write>(
        &self,
        conn: &dyn Connection,
        out: &mut W,
    ) -> Result<InitReport, BootstrapError> {
        self.run_at(conn, out, OffsetDateTime::now_utc()).await
    }

    /// Run every step, stamping the seed with `now`.
    pub async fn run_at<W: Write>(
        &self,
        conn: &dyn Connection,
        out: &mut W,
        now: OffsetDateTime,
    ) -> Result<InitReport, BootstrapError> {
        tracing::info!(
            database = %self.database,
            collection = %self.collection,
            "running bootstrap steps in order: {:?}",
            STEP_ORDER
        );

        tracing::info!(step = %Step::SelectDatabase, "running bootstrap step");
        conn.ping().await.map_err(BootstrapError::at(Step::SelectDatabase))?;
        let db = conn.database(&self.database);

        tracing::info!(step = %Step::EnsureCollection, "running bootstrap step");
        let collection_state = db
            .ensure_collection(&self.collection)
            .await
            .map_err(BootstrapError::at(Step::EnsureCollection))?;
        tracing::info!(collection = %self.collection, state = ?collection_state, "collection ready");

        tracing::info!(step = %Step::EnsureIndexes, "running bootstrap step");
        let mut indexes = Vec::with_capacity(self.indexes.len());
        for spec in &self.indexes {
            let name = db
                .ensure_index(&self.collection, spec)
                .await
                .map_err(BootstrapError::at(Step::EnsureIndexes))?;
            tracing::info!(index = %name, "index ensured");
            indexes.push(name);
        }

        tracing::info!(step = %Step::InsertSeed, policy = ?self.seed_policy, "running bootstrap step");
        let seed = match self.seed_policy {
            SeedPolicy::Never => SeedOutcome::Disabled,
            SeedPolicy::IfMissing => {
                let same_text = db
                    .find_analyses(&self.collection, &AnalysisFilter::with_text(SEED_TEXT))
                    .await
                    .map_err(BootstrapError::at(Step::InsertSeed))?;
                // A user analysis of the same sentence does not count as the seed.
                match same_text.into_iter().find(|stored| is_seed(&stored.record)) {
                    Some(stored) => SeedOutcome::AlreadyPresent { id: stored.id },
                    None => self.insert_seed(db.as_ref(), now).await?,
                }
            }
            SeedPolicy::Always => self.insert_seed(db.as_ref(), now).await?,
        };
        tracing::info!(seed = ?seed, "seed step finished");

        tracing::info!(step = %Step::SignalCompletion, "running bootstrap step");
        writeln!(out, "{}", COMPLETION_MESSAGE)?;
        out.flush()?;

        Ok(InitReport {
            database: db.name().to_string(),
            collection: self.collection.clone(),
            collection_state,
            indexes,
            seed,
        })
    }

    async fn insert_seed(
        &self,
        db: &dyn sentiment_kernel::DatabaseHandle,
        now: OffsetDateTime,
    ) -> Result<SeedOutcome, BootstrapError> {
        let id = db
            .insert_analysis(&self.collection, &seed_record(now))
            .await
            .map_err(BootstrapError::at(Step::InsertSeed))?;
        Ok(SeedOutcome::Inserted { id })
    }
}
