use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    #[serde(default)]
    pub roster: RosterSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Path of the `sqlite3` database file.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Socket address the web server listens on.
    pub bind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterSettings {
    /// Roster CSV imported by the `setup` binary.
    pub path: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from the optional `config.toml`, then `GRADEBOOK__*` environment variables.
    ///
    /// `DATABASE_URL` (also read from `.env`) takes precedence over `database.url`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_sources(
            File::with_name("config").required(false),
            Environment::with_prefix("GRADEBOOK").separator("__"),
            env::var("DATABASE_URL").ok(),
        )
    }

    fn from_sources<F>(
        file: F,
        environment: Environment,
        database_url: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("database.url", "gradebook.sqlite3")?
            .set_default("server.bind", "127.0.0.1:8000")?
            .add_source(file)
            .add_source(environment)
            .set_override_option("database.url", database_url)?
            .build()?
            .try_deserialize()
    }
}
