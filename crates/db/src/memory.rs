//! Process-local store used for dry runs and tests.
//!
//! Mirrors the server behaviour the bootstrap relies on: collections are
//! created implicitly by index declarations and inserts, every collection has
//! an `_id_` index, and re-declaring an index is a no-op. The connection can
//! be switched to unreachable or read-only to exercise failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::{Timestamp, Uuid};

use sentiment_kernel::{
    AnalysisFilter, AnalysisRecord, CollectionState, Connection, DatabaseHandle, IndexSpec,
    StoreError, StoredAnalysis,
};

const ID_INDEX: &str = "_id_";

#[derive(Debug)]
struct MemoryCollection {
    indexes: Vec<String>,
    records: Vec<StoredAnalysis>,
}

impl MemoryCollection {
    fn new() -> Self {
        Self {
            indexes: vec![ID_INDEX.to_string()],
            records: Vec::new(),
        }
    }
}

type Databases = BTreeMap<String, BTreeMap<String, MemoryCollection>>;

#[derive(Debug)]
struct Switches {
    reachable: AtomicBool,
    writable: AtomicBool,
}

/// In-memory stand-in for a database server. Clones share state.
#[derive(Clone)]
pub struct MemoryConnection {
    databases: Arc<RwLock<Databases>>,
    switches: Arc<Switches>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self {
            databases: Arc::new(RwLock::new(Databases::new())),
            switches: Arc::new(Switches {
                reachable: AtomicBool::new(true),
                writable: AtomicBool::new(true),
            }),
        }
    }

    /// Simulate the server going away (or coming back).
    pub fn set_reachable(&self, reachable: bool) {
        self.switches.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Simulate the server rejecting writes, e.g. missing privileges.
    pub fn set_writable(&self, writable: bool) {
        self.switches.writable.store(writable, Ordering::SeqCst);
    }
}

impl Default for MemoryConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connection for MemoryConnection {
    async fn ping(&self) -> Result<(), StoreError> {
        check_reachable(&self.switches)
    }

    fn database(&self, name: &str) -> Arc<dyn DatabaseHandle> {
        Arc::new(MemoryDatabase {
            name: name.to_string(),
            databases: Arc::clone(&self.databases),
            switches: Arc::clone(&self.switches),
        })
    }
}

struct MemoryDatabase {
    name: String,
    databases: Arc<RwLock<Databases>>,
    switches: Arc<Switches>,
}

impl MemoryDatabase {
    fn check_writable(&self) -> Result<(), StoreError> {
        check_reachable(&self.switches)?;
        if self.switches.writable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::persistence(format!(
                "not authorized on {} to execute write",
                self.name
            )))
        }
    }
}

fn check_reachable(switches: &Switches) -> Result<(), StoreError> {
    if switches.reachable.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(StoreError::connectivity(
            "server selection timeout: no available servers",
        ))
    }
}

#[async_trait]
impl DatabaseHandle for MemoryDatabase {
    fn name(&self) -> &str {
        &self.name
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        check_reachable(&self.switches)?;
        let databases = self.databases.read().await;
        Ok(databases
            .get(&self.name)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn ensure_collection(&self, collection: &str) -> Result<CollectionState, StoreError> {
        self.check_writable()?;
        let mut databases = self.databases.write().await;
        let collections = databases.entry(self.name.clone()).or_default();
        if collections.contains_key(collection) {
            return Ok(CollectionState::AlreadyExisted);
        }
        collections.insert(collection.to_string(), MemoryCollection::new());
        Ok(CollectionState::Created)
    }

    async fn ensure_index(
        &self,
        collection: &str,
        index: &IndexSpec,
    ) -> Result<String, StoreError> {
        self.check_writable()?;
        let name = index.name();
        let mut databases = self.databases.write().await;
        let target = databases
            .entry(self.name.clone())
            .or_default()
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new);
        if !target.indexes.contains(&name) {
            target.indexes.push(name.clone());
        }
        Ok(name)
    }

    async fn index_names(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        check_reachable(&self.switches)?;
        let databases = self.databases.read().await;
        Ok(databases
            .get(&self.name)
            .and_then(|collections| collections.get(collection))
            .map(|target| target.indexes.clone())
            .unwrap_or_default())
    }

    async fn insert_analysis(
        &self,
        collection: &str,
        record: &AnalysisRecord,
    ) -> Result<String, StoreError> {
        self.check_writable()?;
        let id = Uuid::new_v7(Timestamp::now(uuid::NoContext)).to_string();
        let mut databases = self.databases.write().await;
        databases
            .entry(self.name.clone())
            .or_default()
            .entry(collection.to_string())
            .or_insert_with(MemoryCollection::new)
            .records
            .push(StoredAnalysis {
                id: id.clone(),
                record: record.clone(),
            });
        Ok(id)
    }

    async fn find_analyses(
        &self,
        collection: &str,
        filter: &AnalysisFilter,
    ) -> Result<Vec<StoredAnalysis>, StoreError> {
        check_reachable(&self.switches)?;
        let databases = self.databases.read().await;
        let Some(target) = databases
            .get(&self.name)
            .and_then(|collections| collections.get(collection))
        else {
            return Ok(Vec::new());
        };

        let mut found: Vec<StoredAnalysis> = target
            .records
            .iter()
            .rev()
            .filter(|stored| match &filter.text {
                Some(text) => &stored.record.text == text,
                None => true,
            })
            .cloned()
            .collect();
        // Stable sort keeps later inserts first among equal timestamps.
        found.sort_by(|a, b| b.record.timestamp.cmp(&a.record.timestamp));

        // A limit of zero means no limit, as on the server.
        if let Some(limit) = filter.limit.filter(|limit| *limit != 0) {
            found.truncate(limit.unsigned_abs() as usize);
        }
        Ok(found)
    }

    async fn analysis_by_id(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<StoredAnalysis>, StoreError> {
        check_reachable(&self.switches)?;
        Uuid::parse_str(id).map_err(|_| StoreError::invalid_id(id))?;
        let databases = self.databases.read().await;
        Ok(databases
            .get(&self.name)
            .and_then(|collections| collections.get(collection))
            .and_then(|target| target.records.iter().find(|stored| stored.id == id))
            .cloned())
    }
}
