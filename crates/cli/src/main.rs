use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sentiment_bootstrap::{bootstrap, Initializer};
use sentiment_db::MemoryConnection;
use sentiment_kernel::analyses::DEFAULT_RECENT_LIMIT;
use sentiment_kernel::settings::{SeedPolicy, Settings};

mod commands;

const CONFIGURATION_EXIT: u8 = 78;

#[derive(Parser)]
#[command(name = "sentiment-cli", version, about = "Operate the sentiment analysis store")]
struct Cli {
    /// Directory holding base.toml and <env>.toml
    #[arg(long, global = true, env = "SENTIMENT_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Configuration overlay: local, staging or production
    #[arg(long = "env", global = true, env = "SENTIMENT_ENV", default_value = "local")]
    environment: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the collection and indexes, then insert the seed record
    Init {
        /// Override the configured seed policy
        #[arg(long)]
        seed_policy: Option<SeedPolicy>,

        /// Run against an in-memory store instead of MongoDB
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the most recent analyses as JSON lines
    Recent {
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: i64,
    },
    /// Print one analysis as JSON
    Show { id: String },
    /// List the index names on the analyses collection
    Indexes,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
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

    match run(cli.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "sentiment-cli failed");
            ExitCode::from(commands::exit_code(&err))
        }
    }
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .with_context(|| "unable to resolve current directory")?
            .join("config"),
    };
    Settings::load_from(&config_dir, &cli.environment)
        .with_context(|| "failed to load sentiment settings")
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::Init {
            seed_policy,
            dry_run,
        } => {
            let initializer = Initializer::from_settings(settings)
                .with_seed_policy(seed_policy.unwrap_or(settings.seed.policy));
            let mut stdout = std::io::stdout();
            let report = if dry_run {
                tracing::info!("dry run against in-memory store");
                initializer.run(&MemoryConnection::new(), &mut stdout).await?
            } else {
                bootstrap::run(settings, &initializer, &mut stdout).await?
            };
            tracing::info!(
                database = %report.database,
                indexes = ?report.indexes,
                seed = ?report.seed,
                "init finished"
            );
        }
        Command::Recent { limit } => {
            let connection = sentiment_db::connect(&settings.database).await?;
            let mut stdout = std::io::stdout().lock();
            commands::recent(connection.as_ref(), &settings.database, limit, &mut stdout).await?;
        }
        Command::Show { id } => {
            let connection = sentiment_db::connect(&settings.database).await?;
            let mut stdout = std::io::stdout().lock();
            commands::show(connection.as_ref(), &settings.database, &id, &mut stdout).await?;
        }
        Command::Indexes => {
            let connection = sentiment_db::connect(&settings.database).await?;
            let mut stdout = std::io::stdout().lock();
            commands::indexes(connection.as_ref(), &settings.database, &mut stdout).await?;
        }
    }
    Ok(())
}
