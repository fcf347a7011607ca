//! Core library for the Quarry data-access layer.
//!
//! This crate opens an SQLite database file, brings it to the expected schema
//! version by applying versioned migrations exactly once, and exposes a small
//! query API returning raw rows or caller-transformed values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Store (facade) │───▶│    Connector    │───▶│   migrations    │
//! │ query / execute │    │ open + migrate  │    │ user_version +  │
//! │   + transforms  │    │  once, cached   │    │    batches      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`Store`]: `query_many`, `query_one`, `execute` and their transforming
//!   variants
//! - [`db::Connector`]: lazily opened connection, migrated before first use
//! - [`db::migrations`]: batches tracked through `PRAGMA user_version`
//! - [`AsyncStore`]: the same operations on tokio's blocking pool
//!
//! # Quick Start
//!
//! ```rust
//! use quarry_core::{values, NullSink, StoreBuilder};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = tempfile::TempDir::new()?;
//! let store = StoreBuilder::new()
//!     .with_database_path(Some(dir.path().join("app.db")))
//!     .with_migrations(vec![vec![
//!         "CREATE TABLE IF NOT EXISTS notes (id INTEGER PRIMARY KEY, body TEXT NOT NULL)",
//!     ]])
//!     .with_logger(NullSink)
//!     .build()?;
//!
//! store.execute("INSERT INTO notes (body) VALUES (?)", &values!["hello"])?;
//!
//! let note = store.query_one("SELECT id, body FROM notes", &[])?;
//! assert_eq!(note.map(|row| row.get::<String>("body")).transpose()?, Some("hello".into()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod db;
pub mod error;
pub mod logger;
pub mod nonblocking;
pub mod row;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use db::{
    migrations::{Batch, BatchReport, MigrationOutcome, MigrationSet, StatementOutcome},
    Connector,
};
pub use error::{Result, StoreError};
pub use logger::{LogCrateSink, LogSink, NullSink, StdoutSink};
pub use nonblocking::AsyncStore;
pub use row::Row;
pub use store::{Store, StoreBuilder};
pub use value::{FromValue, Value};
