//! Read-only subcommands, run against any [`Connection`].

use std::io::Write;

use anyhow::anyhow;

use sentiment_bootstrap::BootstrapError;
use sentiment_kernel::settings::DatabaseSettings;
use sentiment_kernel::{AnalysisRepository, Connection, StoreError};

/// Print the newest `limit` analyses, one JSON object per line.
pub async fn recent<W: Write>(
    conn: &dyn Connection,
    database: &DatabaseSettings,
    limit: i64,
    out: &mut W,
) -> anyhow::Result<()> {
    let repository = repository(conn, database).await?;
    for stored in repository.recent_analyses(limit).await? {
        writeln!(out, "{}", serde_json::to_string(&stored)?)?;
    }
    Ok(())
}

/// Print one analysis as pretty JSON. An unknown id is an error.
pub async fn show<W: Write>(
    conn: &dyn Connection,
    database: &DatabaseSettings,
    id: &str,
    out: &mut W,
) -> anyhow::Result<()> {
    let repository = repository(conn, database).await?;
    let stored = repository
        .analysis_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("analysis '{}' not found", id))?;
    writeln!(out, "{}", serde_json::to_string_pretty(&stored)?)?;
    Ok(())
}

/// Print the index names on the analyses collection, one per line.
pub async fn indexes<W: Write>(
    conn: &dyn Connection,
    database: &DatabaseSettings,
    out: &mut W,
) -> anyhow::Result<()> {
    conn.ping().await?;
    let names = conn
        .database(&database.name)
        .index_names(&database.collection)
        .await?;
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

async fn repository(
    conn: &dyn Connection,
    database: &DatabaseSettings,
) -> Result<AnalysisRepository, StoreError> {
    conn.ping().await?;
    Ok(AnalysisRepository::new(
        conn.database(&database.name),
        &database.collection,
    ))
}

/// Process exit status for a failed command; untyped failures map to 1.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if let Some(bootstrap) = err.downcast_ref::<BootstrapError>() {
        return bootstrap.exit_code();
    }
    if let Some(store) = err.downcast_ref::<StoreError>() {
        return store.exit_code();
    }
    1
}
