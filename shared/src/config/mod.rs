//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing configuration
//! - `database` - database connection and pool configuration
//! - `environment` - environment detection
//! - `logging` - log level and output format
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod environment;
pub mod logging;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use ::config::ConfigError;
pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "TOKEN";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration; the in-memory store is used when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Token signing configuration
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: None,
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::new("127.0.0.1", 8080),
            database: None,
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::new("0.0.0.0", 8080),
            database: Some(
                DatabaseConfig::new("mysql://prod-db:3306/tokenkeeper").with_max_connections(50),
            ),
            jwt: JwtConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Layered load: environment defaults, then `config/<environment>.toml`
    /// if present, then `TOKEN__*` environment variables.
    ///
    /// Nested keys use a double underscore, e.g. `TOKEN__JWT__SECRET_KEY`.
    pub fn load() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        let defaults = match env {
            Environment::Production => Self::production(),
            _ => Self::development(),
        };

        ::config::Config::builder()
            .add_source(::config::Config::try_from(&defaults)?)
            .set_override("environment", env.to_string())?
            .add_source(::config::File::with_name(&env.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from plain environment variables
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.server = ServerConfig::from_env(config.server);
        config.database = DatabaseConfig::from_env();
        config.jwt = JwtConfig::from_env();
        config.logging = LoggingConfig::from_env(config.logging);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_in_memory_store() {
        let config = AppConfig::default();
        assert!(config.database.is_none());
        assert_eq!(config.jwt.algorithm, "HS256");
    }

    #[test]
    fn test_production_config_has_database() {
        let config = AppConfig::production();
        assert!(config.database.is_some());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_from_env_reads_plain_variables() {
        std::env::set_var("JWT_SECRET_KEY", "from-env-secret");
        std::env::set_var("JWT_ACCESS_TOKEN_EXPIRES", "120");
        std::env::set_var("JWT_USER_CLAIMS_IN_REFRESH_TOKEN", "yes");

        let config = AppConfig::from_env();

        std::env::remove_var("JWT_SECRET_KEY");
        std::env::remove_var("JWT_ACCESS_TOKEN_EXPIRES");
        std::env::remove_var("JWT_USER_CLAIMS_IN_REFRESH_TOKEN");

        assert_eq!(config.jwt.secret_key, "from-env-secret");
        assert_eq!(config.jwt.access_token_expires, 120);
        assert!(config.jwt.user_claims_in_refresh_token);
        assert_eq!(config.jwt.algorithm, "HS256");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{ "jwt": { "secret_key": "s3cr3t", "access_token_expires": 60 } }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.jwt.secret_key, "s3cr3t");
        assert_eq!(config.jwt.access_token_expires, 60);
        assert_eq!(config.jwt.refresh_token_expires, 2_592_000);
        assert_eq!(config.server.port, 8080);
    }
}
