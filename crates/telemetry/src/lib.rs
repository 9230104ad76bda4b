//! Logging bootstrap.
//!
//! Logs go to stderr so stdout stays reserved for command output.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sentiment_kernel::settings::{LogFormat, TelemetrySettings};

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .with_context(|| format!("invalid log filter '{}'", settings.filter))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    // A subscriber installed earlier (tests, embedding binaries) keeps precedence.
    if installed.is_err() {
        tracing::debug!(target: "sentiment-telemetry", "global subscriber already installed");
    }

    Ok(())
}
