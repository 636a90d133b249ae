//! Application configuration management.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Payment split configuration.
    pub split: SplitSettings,
    /// Operator API configuration.
    pub api: ApiConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Apply pending migrations when the server starts.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://pdv-settlements.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

/// Raw split settings as read from configuration.
///
/// Range checks happen when these are turned into a split configuration,
/// once, at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SplitSettings {
    /// Percentage of every approved payment owed to the platform (0-100).
    pub platform_percent: Decimal,
    /// Currency payments are denominated in.
    #[serde(default)]
    pub currency: Currency,
}

/// Operator API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bearer token required on operator routes.
    pub operator_token: String,
}

impl AppConfig {
    /// Loads configuration from `config/` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads configuration from the given directory and the environment.
    ///
    /// Sources, lowest precedence first: `{dir}/default.toml`,
    /// `{dir}/{RUN_MODE}.toml`, then `PDV__SECTION__KEY` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or a required key
    /// is missing.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let app: Self = layered(dir.as_ref())?.try_deserialize()?;
        if app.api.operator_token.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "api.operator_token must not be empty".to_string(),
            ));
        }
        Ok(app)
    }
}

impl DatabaseConfig {
    /// Loads only the `database` section from `config/` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Loads only the `database` section, using the same sources as
    /// [`AppConfig::load_from`]. The other sections may be absent.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_from(dir: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        #[derive(Deserialize)]
        struct DatabaseOnly {
            #[serde(default)]
            database: DatabaseConfig,
        }

        let only: DatabaseOnly = layered(dir.as_ref())?.try_deserialize()?;
        Ok(only.database)
    }
}

/// Sources, lowest precedence first: `{dir}/default.toml`,
/// `{dir}/{RUN_MODE}.toml`, then `PDV__SECTION__KEY` variables.
fn layered(dir: &Path) -> Result<config::Config, config::ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    config::Config::builder()
        .add_source(config::File::with_name(&dir.join("default").to_string_lossy()).required(false))
        .add_source(config::File::with_name(&dir.join(&run_mode).to_string_lossy()).required(false))
        .add_source(config::Environment::with_prefix("PDV").separator("__"))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const MISSING_DIR: &str = "this-config-dir-does-not-exist";

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("PDV__SPLIT__PLATFORM_PERCENT", Some("2.5")),
                ("PDV__SPLIT__CURRENCY", Some("BRL")),
                ("PDV__API__OPERATOR_TOKEN", Some("s3cret")),
                ("PDV__DATABASE__URL", Some("sqlite::memory:")),
            ],
            || {
                let config = AppConfig::load_from(MISSING_DIR).unwrap();
                assert_eq!(config.split.platform_percent, dec!(2.5));
                assert_eq!(config.split.currency, Currency::Brl);
                assert_eq!(config.api.operator_token, "s3cret");
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.server.host, "127.0.0.1");
                assert_eq!(config.server.port, 8080);
                assert!(config.database.run_migrations);
            },
        );
    }

    #[test]
    fn test_missing_split_section_fails() {
        temp_env::with_vars(
            [
                ("PDV__SPLIT__PLATFORM_PERCENT", None::<&str>),
                ("PDV__API__OPERATOR_TOKEN", Some("s3cret")),
            ],
            || {
                assert!(AppConfig::load_from(MISSING_DIR).is_err());
            },
        );
    }

    #[test]
    fn test_blank_operator_token_fails() {
        temp_env::with_vars(
            [
                ("PDV__SPLIT__PLATFORM_PERCENT", Some("1")),
                ("PDV__API__OPERATOR_TOKEN", Some("   ")),
            ],
            || {
                assert!(AppConfig::load_from(MISSING_DIR).is_err());
            },
        );
    }

    #[test]
    fn test_database_section_loads_alone() {
        temp_env::with_vars(
            [
                ("PDV__SPLIT__PLATFORM_PERCENT", None::<&str>),
                ("PDV__API__OPERATOR_TOKEN", None),
                ("PDV__DATABASE__URL", Some("sqlite://migrate-me.db?mode=rwc")),
            ],
            || {
                let db = DatabaseConfig::load_from(MISSING_DIR).unwrap();
                assert_eq!(db.url, "sqlite://migrate-me.db?mode=rwc");
                assert_eq!(db.max_connections, 4);
            },
        );
        temp_env::with_vars([("PDV__DATABASE__URL", None::<&str>)], || {
            let db = DatabaseConfig::load_from(MISSING_DIR).unwrap();
            assert_eq!(db.url, "sqlite://pdv-settlements.db?mode=rwc");
        });
    }

    #[test]
    fn test_database_defaults() {
        let db = DatabaseConfig::default();
        assert_eq!(db.url, "sqlite://pdv-settlements.db?mode=rwc");
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.min_connections, 1);
    }
}
