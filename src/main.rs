use std::process::ExitCode;

use anyhow::Context;
use sentiment_bootstrap::{bootstrap, Initializer};
use sentiment_kernel::settings::Settings;

const CONFIGURATION_EXIT: u8 = 78;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::load().with_context(|| "failed to load bootstrap settings") {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err:#}");
            return ExitCode::from(CONFIGURATION_EXIT);
        }
    };

    if let Err(err) = sentiment_telemetry::init(&settings.telemetry) {
        eprintln!("{err:#}");
        return ExitCode::from(CONFIGURATION_EXIT);
    }

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.name,
        "sentiment-bootstrap starting"
    );

    let initializer = Initializer::from_settings(&settings);
    let mut stdout = std::io::stdout();
    match bootstrap::run(&settings, &initializer, &mut stdout).await {
        Ok(report) => {
            tracing::info!(
                collection = %report.collection,
                state = ?report.collection_state,
                seed = ?report.seed,
                "sentiment-bootstrap complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, code = err.code(), "sentiment-bootstrap failed");
            ExitCode::from(err.exit_code())
        }
    }
}
