//! HTTP listener configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Actix worker count; 0 keeps the runtime default of one per core
    pub workers: usize,
    /// Keep-alive in seconds
    pub keep_alive: u64,
    /// Upper bound for JSON request bodies in bytes
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0,
            keep_alive: 75,
            max_payload_size: 16 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Apply `SERVER_HOST`, `SERVER_PORT` and `SERVER_WORKERS` on top of `base`;
    /// unparsable values are ignored
    pub fn from_env(base: Self) -> Self {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
        }

        Self {
            host: std::env::var("SERVER_HOST").unwrap_or(base.host),
            port: parsed("SERVER_PORT").unwrap_or(base.port),
            workers: parsed("SERVER_WORKERS").unwrap_or(base.workers),
            ..base
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Explicit worker count, `None` when the runtime should decide
    pub fn worker_count(&self) -> Option<usize> {
        (self.workers > 0).then_some(self.workers)
    }

    pub fn keep_alive_duration(&self) -> Duration {
        Duration::from_secs(self.keep_alive)
    }
}
