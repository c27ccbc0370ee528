use serde::Deserialize;

use crate::cloud::CloudConfig;

/// Backend used to persist preference flags
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where preference flags are persisted
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,

    /// JSON file used by the file backend
    #[serde(default = "default_preferences_path")]
    pub preferences_path: String,

    /// Redis connection URL, used by the redis backend
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Postgres URL for mood logs; takes precedence over the cloud database
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_storage_backend() -> StorageBackend {
    StorageBackend::File
}

fn default_preferences_path() -> String {
    "preferences.json".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load the cloud adapter configuration (`CLOUD_*` variables)
    pub fn cloud_from_env() -> anyhow::Result<CloudConfig> {
        dotenvy::dotenv().ok();
        envy::prefixed("CLOUD_")
            .from_env::<CloudConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load cloud config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
