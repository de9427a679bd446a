//! Log output configuration consumed by the binary's tracing subscriber

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::environment::Environment;

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" | "text" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `info,tk_core=debug`
    pub level: String,
    pub format: LogFormat,
    /// ANSI colors, ignored by the JSON format
    pub colored: bool,
    /// Include file and line of the callsite
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Human-friendly output in development, JSON elsewhere
    pub fn for_environment(env: Environment) -> Self {
        let (level, format) = match env {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("warn", LogFormat::Json),
        };

        Self {
            level: level.to_string(),
            format,
            colored: format != LogFormat::Json,
            source_location: !env.is_production() && format == LogFormat::Pretty,
        }
    }

    /// Apply `LOG_LEVEL` and `LOG_FORMAT` overrides on top of `base`
    pub fn from_env(base: Self) -> Self {
        let level = std::env::var("LOG_LEVEL").unwrap_or(base.level);
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(base.format);

        Self {
            level,
            format,
            colored: base.colored && format != LogFormat::Json,
            ..base
        }
    }
}
