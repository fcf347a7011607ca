//! Connection lifecycle and schema management for the SQLite file.
//!
//! The [`Connector`] owns the single connection of a store. The file is
//! opened on first use and migrated before the connection is handed to any
//! caller; later calls reuse the cached connection.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{debug, trace};
use rusqlite::Connection;

use crate::{
    error::{Result, StoreError},
    logger::LogSink,
};

pub mod migrations;
pub(crate) mod queries;

use migrations::{migrate, MigrationSet};

/// Lazily opened, migrated connection.
///
/// `None` means no ready connection exists yet. The lock is held across the
/// whole open-and-migrate step, so concurrent first callers wait for a single
/// migration run instead of racing it.
pub struct Connector {
    path: PathBuf,
    migrations: MigrationSet,
    sink: Box<dyn LogSink>,
    state: Mutex<Option<Connection>>,
}

impl Connector {
    pub fn new(path: PathBuf, migrations: MigrationSet, sink: Box<dyn LogSink>) -> Self {
        Self {
            path,
            migrations,
            sink,
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn migrations(&self) -> &MigrationSet {
        &self.migrations
    }

    /// Whether a migrated connection is cached.
    pub fn is_ready(&self) -> Result<bool> {
        Ok(self.state.lock().map_err(|_| StoreError::Poisoned)?.is_some())
    }

    /// Runs `f` against the ready connection, opening and migrating it first
    /// if this is the first use.
    ///
    /// When migration fails the new connection is dropped rather than cached,
    /// so the next call opens the file again and retries the migration from
    /// the persisted version.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut state = self.state.lock().map_err(|_| StoreError::Poisoned)?;

        let conn = match state.take() {
            Some(conn) => {
                trace!("Reusing cached connection to {}", self.path.display());
                conn
            }
            None => self.open_and_migrate()?,
        };

        f(state.insert(conn))
    }

    fn open_and_migrate(&self) -> Result<Connection> {
        self.sink
            .log(&format!("[DB] Opening db file: {}", self.path.display()));
        let conn = Connection::open(&self.path)?;

        self.sink.log("[DB] Migrate");
        match migrate(&conn, &self.migrations, self.sink.as_ref()) {
            Ok(outcome) => {
                debug!(
                    "Database {} ready at schema version {}",
                    self.path.display(),
                    outcome.version()
                );
                Ok(conn)
            }
            Err(e) => {
                debug!(
                    "Discarding connection to {} after failed migration: {e}",
                    self.path.display()
                );
                Err(e)
            }
        }
    }
}
