//! Store backends for the sentiment analysis collection.

pub mod document;
pub mod memory;
pub mod mongo;

use std::sync::Arc;

use sentiment_kernel::settings::DatabaseSettings;
use sentiment_kernel::{Connection, StoreError};

pub use memory::MemoryConnection;
pub use mongo::MongoConnection;

/// Build a MongoDB connection from settings.
pub async fn connect(settings: &DatabaseSettings) -> Result<Arc<dyn Connection>, StoreError> {
    tracing::info!(
        target: "sentiment-db",
        app_name = %settings.app_name,
        server_selection_timeout_ms = settings.server_selection_timeout_ms,
        "creating mongodb client"
    );
    let connection = MongoConnection::connect(settings).await?;
    Ok(Arc::new(connection))
}
