//! Deployment environment detection

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment, selects defaults and the config file to layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Reads `ENVIRONMENT`, then `RUST_ENV`; unknown or missing values fall
    /// back to development
    pub fn from_env() -> Self {
        ["ENVIRONMENT", "RUST_ENV"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Config file stem under `config/`, the loader picks the extension
    pub fn config_file(&self) -> String {
        format!("config/{}", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let env = match normalized.as_str() {
            "dev" | "local" => Environment::Development,
            "stage" | "test" => Environment::Staging,
            "prod" => Environment::Production,
            other => Environment::ALL
                .into_iter()
                .find(|env| env.as_str() == other)
                .ok_or_else(|| format!("Invalid environment: {}", s))?,
        };
        Ok(env)
    }
}
