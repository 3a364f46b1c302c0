//! Storage abstraction layer
//!
//! Provides a unified interface over the embedded SQLite database, either
//! file-backed or a private in-memory database for ephemeral deployments

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{NewRun, Run, RunFilter, RunId};
use crate::Result;

pub mod sqlite;

/// Run store trait
///
/// Every method maps to exactly one statement against the `runs` table.
/// An `Err` is a store failure; "no matching rows" is reported through the
/// `Ok` value.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Fetch every run
    async fn list(&self) -> Result<Vec<Run>>;

    /// Fetch a single run by id
    async fn get(&self, id: RunId) -> Result<Option<Run>>;

    /// Insert a run and return it with the generated id
    async fn insert(&self, run: NewRun) -> Result<Run>;

    /// Replace every field of an existing run; `None` when no row matched
    async fn update(&self, id: RunId, run: NewRun) -> Result<Option<Run>>;

    /// Delete a run; `false` when no row matched
    async fn delete(&self, id: RunId) -> Result<bool>;

    /// Fetch the runs matching a filter predicate
    async fn filter(&self, filter: &RunFilter) -> Result<Vec<Run>>;

    /// Number of stored runs
    async fn count(&self) -> Result<usize>;
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Sqlite {
        path: PathBuf,
        busy_timeout: Duration,
        create_schema: bool,
    },
    Memory,
}

/// Create storage backend from config
pub async fn create_storage(config: StorageConfig) -> Result<Box<dyn RunStore>> {
    match config {
        StorageConfig::Sqlite {
            path,
            busy_timeout,
            create_schema,
        } => {
            let backend = tokio::task::spawn_blocking(move || {
                sqlite::SqliteStore::open(path, busy_timeout, create_schema)
            })
            .await??;
            Ok(Box::new(backend))
        }
        StorageConfig::Memory => {
            let backend =
                tokio::task::spawn_blocking(sqlite::SqliteStore::open_in_memory).await??;
            Ok(Box::new(backend))
        }
    }
}
