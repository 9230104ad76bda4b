use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "SENTIMENT_ENV";
const CONFIG_DIR_ENV: &str = "SENTIMENT_CONFIG_DIR";
const ENV_PREFIX: &str = "SENTIMENT";

/// Connection string and database name used by the original deployment.
const LEGACY_URI_ENV: &str = "MONGODB_URI";
const LEGACY_DB_ENV: &str = "MONGODB_DB";

/// Deployment environment the bootstrap is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    ///
    /// `SENTIMENT_ENV` picks the overlay and `SENTIMENT_CONFIG_DIR` the directory
    /// holding `base.toml` and `<env>.toml`.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&config_dir, &environment)
    }

    /// Load configuration from an explicit directory and environment name.
    pub fn load_from(config_dir: &Path, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.uri", std::env::var(LEGACY_URI_ENV).ok())
            .with_context(|| format!("invalid {} override", LEGACY_URI_ENV))?
            .set_override_option("database.name", std::env::var(LEGACY_DB_ENV).ok())
            .with_context(|| format!("invalid {} override", LEGACY_DB_ENV))?;

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        tracing::debug!(
            config_dir = %config_dir.display(),
            environment = ?settings.environment,
            "settings loaded"
        );

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_uri")]
    pub uri: String,
    #[serde(default = "DatabaseSettings::default_name")]
    pub name: String,
    #[serde(default = "DatabaseSettings::default_collection")]
    pub collection: String,
    #[serde(default = "DatabaseSettings::default_app_name")]
    pub app_name: String,
    #[serde(default = "DatabaseSettings::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "DatabaseSettings::default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,
}

impl DatabaseSettings {
    fn default_uri() -> String {
        "mongodb://127.0.0.1:27017/".to_string()
    }

    fn default_name() -> String {
        "sentiment_analysis".to_string()
    }

    fn default_collection() -> String {
        "analyses".to_string()
    }

    fn default_app_name() -> String {
        "sentiment-bootstrap".to_string()
    }

    fn default_connect_timeout_ms() -> u64 {
        10_000
    }

    fn default_server_selection_timeout_ms() -> u64 {
        30_000
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: Self::default_uri(),
            name: Self::default_name(),
            collection: Self::default_collection(),
            app_name: Self::default_app_name(),
            connect_timeout_ms: Self::default_connect_timeout_ms(),
            server_selection_timeout_ms: Self::default_server_selection_timeout_ms(),
        }
    }
}

/// Whether a run inserts the sample record.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Insert on every run; repeated runs accumulate sample rows.
    #[default]
    Always,
    /// Insert only when no record matching the sample's text, scores and labels exists.
    IfMissing,
    /// Never insert.
    Never,
}

impl std::str::FromStr for SeedPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "always" => Ok(SeedPolicy::Always),
            "if-missing" => Ok(SeedPolicy::IfMissing),
            "never" => Ok(SeedPolicy::Never),
            other => Err(anyhow!(
                "unsupported seed policy '{}'; expected always/if-missing/never",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SeedSettings {
    #[serde(default)]
    pub policy: SeedPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info,mongodb=warn".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_targets_sentiment_analysis() {
        let settings = Settings::default();
        assert_eq!(settings.database.name, "sentiment_analysis");
        assert_eq!(settings.database.collection, "analyses");
        assert_eq!(settings.seed.policy, SeedPolicy::Always);
    }

    #[test]
    fn environment_overlay_wins_over_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[database]\nname = \"from_base\"\ncollection = \"base_analyses\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("staging.toml"),
            "[database]\nname = \"from_staging\"\n\n[seed]\npolicy = \"if-missing\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(dir.path(), "staging").unwrap();

        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.database.collection, "base_analyses");
        assert_eq!(settings.seed.policy, SeedPolicy::IfMissing);
        // MONGODB_DB, when exported in the test environment, outranks the files.
        if std::env::var(LEGACY_DB_ENV).is_err() {
            assert_eq!(settings.database.name, "from_staging");
        }
    }

    #[test]
    fn missing_config_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(dir.path(), "production").unwrap();
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path(), "qa").unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn seed_policy_parses_cli_spelling() {
        assert_eq!("if-missing".parse::<SeedPolicy>().unwrap(), SeedPolicy::IfMissing);
        assert_eq!("never".parse::<SeedPolicy>().unwrap(), SeedPolicy::Never);
        assert!("sometimes".parse::<SeedPolicy>().is_err());
    }
}
