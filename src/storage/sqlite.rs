//! SQLite storage backend

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::types::{NewRun, Run, RunFilter, RunId};
use crate::{Error, Result};

use super::RunStore;

const SELECT_COLUMNS: &str = "SELECT id, date, distance, pace, notes FROM runs";

const CREATE_RUNS_TABLE: &str = "CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    distance REAL NOT NULL,
    pace TEXT NOT NULL,
    notes TEXT
);";

/// Store backed by a single embedded database file
///
/// The connection is opened once and shared; statements run on the
/// blocking thread pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`.
    pub fn open(
        path: impl Into<PathBuf>,
        busy_timeout: Duration,
        create_schema: bool,
    ) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(Error::config("sqlite path must not be empty"));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::init(conn, &path, create_schema)
    }

    /// Open a private in-memory database, schema included
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, Path::new(":memory:"), true)
    }

    fn init(conn: Connection, path: &Path, create_schema: bool) -> Result<Self> {
        if create_schema {
            conn.execute_batch(CREATE_RUNS_TABLE)?;
        }
        tracing::info!(path = %path.display(), "Connected to SQLite database");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the shared connection without blocking the executor
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| Error::storage("connection mutex poisoned"))?;
            f(&guard)
        })
        .await?
    }
}

fn row_to_run(row: &Row<'_>) -> rusqlite::Result<Run> {
    Ok(Run {
        id: row.get(0)?,
        date: row.get(1)?,
        distance: row.get(2)?,
        pace: row.get(3)?,
        notes: row.get(4)?,
    })
}

fn query_runs(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Run>> {
    let mut stmt = conn.prepare(sql)?;
    let runs = stmt
        .query_map(params, row_to_run)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(runs)
}

#[async_trait]
impl RunStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Run>> {
        self.with_conn(|conn| query_runs(conn, SELECT_COLUMNS, params![]))
            .await
    }

    async fn get(&self, id: RunId) -> Result<Option<Run>> {
        self.with_conn(move |conn| {
            let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
            let run = conn
                .query_row(&sql, params![id], row_to_run)
                .optional()?;
            Ok(run)
        })
        .await
    }

    async fn insert(&self, run: NewRun) -> Result<Run> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO runs (date, distance, pace, notes) VALUES (?1, ?2, ?3, ?4)",
                params![run.date, run.distance, run.pace, run.notes],
            )?;
            Ok(run.into_run(conn.last_insert_rowid()))
        })
        .await
    }

    async fn update(&self, id: RunId, run: NewRun) -> Result<Option<Run>> {
        self.with_conn(move |conn| {
            let changes = conn.execute(
                "UPDATE runs SET date = ?1, distance = ?2, pace = ?3, notes = ?4 WHERE id = ?5",
                params![run.date, run.distance, run.pace, run.notes, id],
            )?;
            Ok((changes > 0).then(|| run.into_run(id)))
        })
        .await
    }

    async fn delete(&self, id: RunId) -> Result<bool> {
        self.with_conn(move |conn| {
            let changes = conn.execute("DELETE FROM runs WHERE id = ?1", params![id])?;
            Ok(changes > 0)
        })
        .await
    }

    async fn filter(&self, filter: &RunFilter) -> Result<Vec<Run>> {
        let sql = format!("{} WHERE {}", SELECT_COLUMNS, filter.predicate());
        let value = filter.bind_value();
        self.with_conn(move |conn| query_runs(conn, &sql, params![value]))
            .await
    }

    async fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM runs", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }
}
