//! Query API over a lazily migrated database file.
//!
//! Every operation on [`Store`] first makes sure the database is open and
//! migrated, then runs one statement with positional parameters. Engine
//! errors are returned exactly as SQLite reported them.
//!
//! # Example
//!
//! ```rust
//! use quarry_core::{values, MigrationSet, NullSink, Store};
//!
//! # fn example() -> quarry_core::Result<()> {
//! # let dir = tempfile::TempDir::new().unwrap();
//! # let path = dir.path().join("todos.db");
//! let migrations = MigrationSet::new([[
//!     "CREATE TABLE IF NOT EXISTS todos (id INTEGER PRIMARY KEY AUTOINCREMENT, task TEXT NOT NULL, userId INTEGER NOT NULL)",
//! ]]);
//! let store = Store::with_logger(path, migrations, NullSink);
//!
//! store.execute("INSERT INTO todos (task, userId) VALUES (?, ?)", &values!["Ship tests", 42])?;
//!
//! let tasks: Vec<String> = store.query_many_with(
//!     "SELECT task FROM todos WHERE userId = ? ORDER BY id",
//!     &values![42],
//!     |row| row.get("task"),
//! )?;
//! assert_eq!(tasks, ["Ship tests"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::path::{Path, PathBuf};

use log::trace;

use crate::{
    db::{
        migrations::{read_schema_version, MigrationSet},
        queries, Connector,
    },
    error::Result,
    logger::{LogSink, StdoutSink},
    row::Row,
    value::Value,
};

pub mod builder;


pub use builder::StoreBuilder;

/// Data-access handle bound to one database file and one migration set.
pub struct Store {
    connector: Connector,
}

impl Store {
    /// Creates a store that reports progress on standard output.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>, migrations: impl Into<MigrationSet>) -> Self {
        Self::with_logger(path, migrations, StdoutSink)
    }

    /// Creates a store that reports progress to `sink`.
    pub fn with_logger(
        path: impl Into<PathBuf>,
        migrations: impl Into<MigrationSet>,
        sink: impl LogSink + 'static,
    ) -> Self {
        Self::from_connector(Connector::new(
            path.into(),
            migrations.into(),
            Box::new(sink),
        ))
    }

    pub(crate) fn from_connector(connector: Connector) -> Self {
        Self { connector }
    }

    pub fn path(&self) -> &Path {
        self.connector.path()
    }

    pub fn migrations(&self) -> &MigrationSet {
        self.connector.migrations()
    }

    /// Whether the database has been opened and migrated.
    pub fn is_ready(&self) -> Result<bool> {
        self.connector.is_ready()
    }

    /// Opens and migrates the database now instead of on first query.
    pub fn ensure_ready(&self) -> Result<()> {
        self.connector.with_connection(|_| Ok(()))
    }

    /// Reads the schema version persisted in the database file.
    pub fn schema_version(&self) -> Result<usize> {
        self.connector.with_connection(read_schema_version)
    }

    /// Returns every row produced by `sql`. No rows yields an empty vector.
    pub fn query_many(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let rows = self
            .connector
            .with_connection(|conn| Ok(queries::fetch_all(conn, sql, params)?))?;
        trace!("Fetched {} rows", rows.len());
        Ok(rows)
    }

    /// Returns every row produced by `sql`, each passed through `transform`.
    ///
    /// The transform runs after the connection is released, so it may use
    /// the store itself.
    pub fn query_many_with<T, F>(&self, sql: &str, params: &[Value], transform: F) -> Result<Vec<T>>
    where
        F: FnMut(Row) -> Result<T>,
    {
        self.query_many(sql, params)?
            .into_iter()
            .map(transform)
            .collect()
    }

    /// Returns the first row produced by `sql`, or `None` when there is none.
    pub fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        self.connector
            .with_connection(|conn| Ok(queries::fetch_first(conn, sql, params)?))
    }

    /// Like [`Store::query_one`], with `transform` applied to the row if one
    /// was found.
    pub fn query_one_with<T, F>(
        &self,
        sql: &str,
        params: &[Value],
        transform: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(Row) -> Result<T>,
    {
        self.query_one(sql, params)?.map(transform).transpose()
    }

    /// Runs `sql` for its side effects; any result rows are discarded.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<()> {
        self.connector
            .with_connection(|conn| Ok(queries::run(conn, sql, params)?))
    }
}
