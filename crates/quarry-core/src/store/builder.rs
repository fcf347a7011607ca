//! Builder for creating and configuring Store instances.

use std::path::{Path, PathBuf};

use super::Store;
use crate::{
    db::{migrations::MigrationSet, Connector},
    error::{Result, StoreError},
    logger::{LogSink, StdoutSink},
};

/// Builder for creating and configuring Store instances.
pub struct StoreBuilder {
    database_path: Option<PathBuf>,
    migrations: MigrationSet,
    sink: Box<dyn LogSink>,
}

impl StoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            migrations: MigrationSet::default(),
            sink: Box::new(StdoutSink),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/quarry/quarry.db` or `~/.local/share/quarry/quarry.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the migrations applied when the database is first opened.
    pub fn with_migrations(mut self, migrations: impl Into<MigrationSet>) -> Self {
        self.migrations = migrations.into();
        self
    }

    /// Sets the sink for open and migration progress messages.
    pub fn with_logger(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builds the configured store.
    ///
    /// The parent directory of the database file is created here; the file
    /// itself is opened and migrated on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::XdgDirectory` if no default path can be resolved
    /// Returns `StoreError::FileSystem` if the parent directory cannot be
    /// created
    pub fn build(self) -> Result<Store> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        Ok(Store::from_connector(Connector::new(
            db_path,
            self.migrations,
            self.sink,
        )))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("quarry")
            .place_data_file("quarry.db")
            .map_err(|e| StoreError::XdgDirectory(e.to_string()))
    }
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
