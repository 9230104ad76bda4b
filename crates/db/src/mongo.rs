//! MongoDB-backed store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use sentiment_kernel::settings::DatabaseSettings;
use sentiment_kernel::{
    AnalysisFilter, AnalysisRecord, CollectionState, Connection, DatabaseHandle, IndexSpec,
    StoreError, StoredAnalysis,
};

use crate::document::AnalysisDocument;

const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;

/// Client connection to a MongoDB deployment.
#[derive(Clone)]
pub struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    /// Build a client from settings. No round-trip happens until [`Connection::ping`].
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(classify)?;

        options.app_name = Some(settings.app_name.clone());
        // Timeouts spelled out in the URI take precedence.
        options
            .connect_timeout
            .get_or_insert(Duration::from_millis(settings.connect_timeout_ms));
        options
            .server_selection_timeout
            .get_or_insert(Duration::from_millis(settings.server_selection_timeout_ms));

        let client = Client::with_options(options).map_err(classify)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Connection for MongoConnection {
    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(classify)?;
        tracing::debug!("mongodb ping acknowledged");
        Ok(())
    }

    fn database(&self, name: &str) -> Arc<dyn DatabaseHandle> {
        Arc::new(MongoDatabase {
            db: self.client.database(name),
        })
    }
}

struct MongoDatabase {
    db: Database,
}

impl MongoDatabase {
    fn analyses(&self, collection: &str) -> Collection<AnalysisDocument> {
        self.db.collection(collection)
    }
}

#[async_trait]
impl DatabaseHandle for MongoDatabase {
    fn name(&self) -> &str {
        self.db.name()
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.db.list_collection_names().await.map_err(classify)
    }

    async fn ensure_collection(&self, collection: &str) -> Result<CollectionState, StoreError> {
        match self.db.create_collection(collection).await {
            Ok(()) => Ok(CollectionState::Created),
            Err(err) if has_command_code(&err, NAMESPACE_EXISTS) => {
                Ok(CollectionState::AlreadyExisted)
            }
            Err(err) => Err(classify(err)),
        }
    }

    async fn ensure_index(
        &self,
        collection: &str,
        index: &IndexSpec,
    ) -> Result<String, StoreError> {
        let model = IndexModel::builder()
            .keys(index_keys(index))
            .options(IndexOptions::builder().name(index.name()).build())
            .build();
        let created = self
            .analyses(collection)
            .create_index(model)
            .await
            .map_err(classify)?;
        Ok(created.index_name)
    }

    async fn index_names(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        match self.analyses(collection).list_index_names().await {
            Ok(names) => Ok(names),
            Err(err) if has_command_code(&err, NAMESPACE_NOT_FOUND) => Ok(Vec::new()),
            Err(err) => Err(classify(err)),
        }
    }

    async fn insert_analysis(
        &self,
        collection: &str,
        record: &AnalysisRecord,
    ) -> Result<String, StoreError> {
        let inserted = self
            .analyses(collection)
            .insert_one(AnalysisDocument::from_record(record))
            .await
            .map_err(classify)?;
        Ok(inserted
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .unwrap_or_else(|| inserted.inserted_id.to_string()))
    }

    async fn find_analyses(
        &self,
        collection: &str,
        filter: &AnalysisFilter,
    ) -> Result<Vec<StoredAnalysis>, StoreError> {
        let mut query = Document::new();
        if let Some(text) = &filter.text {
            query.insert("text", text.as_str());
        }

        let analyses = self.analyses(collection);
        let mut find = analyses.find(query).sort(doc! { "timestamp": -1 });
        if let Some(limit) = filter.limit {
            find = find.limit(limit);
        }

        let mut cursor = find.await.map_err(classify)?;
        let mut found = Vec::new();
        while cursor.advance().await.map_err(classify)? {
            let document = cursor.deserialize_current().map_err(classify)?;
            found.push(document.into_stored()?);
        }
        Ok(found)
    }

    async fn analysis_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredAnalysis>, StoreError> {
        let oid = ObjectId::parse_str(id).map_err(|_| StoreError::invalid_id(id))?;
        self.analyses(collection)
            .find_one(doc! { "_id": oid })
            .await
            .map_err(classify)?
            .map(AnalysisDocument::into_stored)
            .transpose()
    }
}

fn index_keys(index: &IndexSpec) -> Document {
    let mut keys = Document::new();
    for (field, order) in index.keys() {
        keys.insert(field.as_str(), order.as_i32());
    }
    keys
}

fn has_command_code(err: &MongoError, code: i32) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == code)
}

/// Sort a driver error into the store taxonomy.
pub(crate) fn classify(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::Authentication { .. } => StoreError::connectivity(err.to_string()),
        ErrorKind::InvalidArgument { .. } => StoreError::configuration(err.to_string()),
        _ => StoreError::persistence(err.to_string()),
    }
}
