//! run-tracker - Running planner and tracker API
//!
//! A JSON CRUD API over a single `runs` table:
//! - Create, read, update and delete runs
//! - Filter runs by date, distance, pace and notes keyword
//! - Embedded SQLite storage, on disk or in memory
//! - Permissive CORS so browser front ends can call it directly

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
