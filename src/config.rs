//! Configuration management for the catalog server
//!
//! Sources, lowest priority first: the built-in `config/default.toml`, the
//! optional `config/{RUN_MODE}` file, `CATALOG_*` environment variables, then
//! `DATABASE_URL` and `JWT_SECRET`.

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat,
};
use serde::Deserialize;
use std::env;

/// Compiled-in defaults, so the server starts without a config directory
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    /// Staff account created at startup when no staff account exists yet.
    /// Never shipped in the defaults; set `CATALOG_AUTH__BOOTSTRAP_*`.
    #[serde(default)]
    pub bootstrap_username: Option<String>,
    #[serde(default)]
    pub bootstrap_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Page size of the public book and author lists
    pub page_size: i64,
    /// Upper bound for the `per_page` parameter of admin lists
    pub max_page_size: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

fn base() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        base()
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(
                Environment::with_prefix("CATALOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", env::var("JWT_SECRET").ok())?
            .build()?
            .try_deserialize()
    }

    /// The built-in defaults alone, ignoring files and environment
    pub fn defaults() -> Result<Self, ConfigError> {
        base().build()?.try_deserialize()
    }
}
