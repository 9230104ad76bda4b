//! Entry used by both binaries: connect per settings, then initialize.

use std::io::Write;

use sentiment_kernel::settings::Settings;

use crate::initializer::{BootstrapError, InitReport, Initializer};
use crate::steps::Step;

/// Connect to the configured MongoDB deployment and run the initializer.
pub async fn run<W: Write>(
    settings: &Settings,
    initializer: &Initializer,
    out: &mut W,
) -> Result<InitReport, BootstrapError> {
    let connection = sentiment_db::connect(&settings.database)
        .await
        .map_err(|source| BootstrapError::Store {
            step: Step::SelectDatabase,
            source,
        })?;

    initializer.run(connection.as_ref(), out).await
}
