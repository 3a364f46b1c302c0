use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::storage::StorageConfig;

const DEFAULT_DATABASE_FILE: &str = "runsDB";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    ///
    /// `RUN_TRACKER_CONFIG` names the TOML file (default `config.toml`);
    /// variables such as `RUN_TRACKER_SERVER__PORT` override it.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("RUN_TRACKER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RUN_TRACKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Resolve the storage configuration, validating backend settings.
    pub fn storage_runtime(&self) -> Result<StorageConfig> {
        self.storage.to_runtime()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackendKind,
    pub sqlite: Option<SqliteStorageSection>,
}

impl StorageSection {
    pub fn to_runtime(&self) -> Result<StorageConfig> {
        match self.backend {
            StorageBackendKind::Sqlite => {
                let sqlite = self.sqlite.clone().unwrap_or_default();

                if sqlite.path.trim().is_empty() {
                    bail!("storage.sqlite.path must be specified");
                }

                let path = PathBuf::from(sqlite.path.trim());
                let path = if path.is_absolute() {
                    path
                } else {
                    env::current_dir()
                        .context("failed to resolve working directory")?
                        .join(path)
                };

                Ok(StorageConfig::Sqlite {
                    path,
                    busy_timeout: Duration::from_millis(sqlite.busy_timeout_ms),
                    create_schema: sqlite.create_schema,
                })
            }
            StorageBackendKind::Memory => Ok(StorageConfig::Memory),
        }
    }
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Sqlite,
            sqlite: Some(SqliteStorageSection::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteStorageSection {
    pub path: String,
    pub busy_timeout_ms: u64,
    /// Create the `runs` table on startup when it is missing
    pub create_schema: bool,
}

impl Default for SqliteStorageSection {
    fn default() -> Self {
        Self {
            path: DEFAULT_DATABASE_FILE.to_string(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            create_schema: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}
