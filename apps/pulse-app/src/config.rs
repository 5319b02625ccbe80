//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pulse_infra::JwtConfig;

/// Which document store backs posts, comments and users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Redis,
}

impl Backend {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "redis" => Self::Redis,
            "memory" => Self::Memory,
            other => {
                tracing::warn!(backend = %other, "Unknown PULSE_BACKEND, using memory");
                Self::Memory
            }
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: Backend,
    pub redis_url: String,
    pub redis_connect_timeout: Duration,
    /// Base URL of the HTTP blob endpoint. In-memory blobs when unset.
    pub blob_base_url: Option<String>,
    /// URL probed for connectivity. Always online when unset.
    pub network_probe_url: Option<String>,
    pub network_probe_timeout: Duration,
    /// JSON preferences file. In-memory preferences when unset.
    pub settings_path: Option<PathBuf>,
    pub jwt: JwtConfig,
    /// Seed demo posts and comments at startup.
    pub seed: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            backend: env::var("PULSE_BACKEND")
                .map(|v| Backend::parse(&v))
                .unwrap_or(Backend::Memory),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            redis_connect_timeout: Duration::from_secs(
                env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            blob_base_url: non_empty_var("BLOB_BASE_URL"),
            network_probe_url: non_empty_var("NETWORK_PROBE_URL"),
            network_probe_timeout: Duration::from_millis(
                env::var("NETWORK_PROBE_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2000),
            ),
            settings_path: non_empty_var("SETTINGS_PATH").map(PathBuf::from),
            jwt: JwtConfig::from_env(),
            seed: env::var("PULSE_SEED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

impl Default for AppConfig {
    /// Everything in memory, no seed.
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            redis_url: "redis://localhost:6379".to_string(),
            redis_connect_timeout: Duration::from_secs(5),
            blob_base_url: None,
            network_probe_url: None,
            network_probe_timeout: Duration::from_millis(2000),
            settings_path: None,
            jwt: JwtConfig::default(),
            seed: false,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
