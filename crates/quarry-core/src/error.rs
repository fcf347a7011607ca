//! Error types for the store.

use std::path::PathBuf;

use thiserror::Error;

/// Every failure a store operation can surface.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Open, prepare, bind or execute failure reported by SQLite, passed
    /// through untouched
    #[error(transparent)]
    Engine(#[from] rusqlite::Error),
    /// The persisted schema version could not be read as a non-negative
    /// integer
    #[error("Could not read database version: {reason}")]
    VersionRead { reason: String },
    /// The database was written by a newer migration set than this one
    #[error("Database version {found} is ahead of the {known} known migrations")]
    VersionAhead { found: usize, known: usize },
    /// At least one statement of a migration batch failed
    #[error("Error while executing statements for version {version} ({failed} of {total} failed)")]
    BatchIncomplete {
        version: usize,
        failed: usize,
        total: usize,
    },
    /// A row has no column with the requested name
    #[error("Column '{column}' not found in row")]
    ColumnNotFound { column: String },
    /// A column value could not be converted to the requested type
    #[error("Column '{column}' holds {found}, expected {expected}")]
    InvalidColumnType {
        column: String,
        expected: &'static str,
        found: &'static str,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// A caller panicked while holding the connection
    #[error("Connection lock poisoned")]
    Poisoned,
    /// A blocking task could not be joined
    #[error("Task join error: {message}")]
    TaskJoin { message: String },
}

impl StoreError {
    /// Creates a column type mismatch error.
    pub fn invalid_type(
        column: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::InvalidColumnType {
            column: column.into(),
            expected,
            found,
        }
    }

    /// Returns true for failures raised by the migration engine rather than
    /// by SQLite itself.
    pub fn is_migration_error(&self) -> bool {
        matches!(
            self,
            Self::VersionRead { .. } | Self::VersionAhead { .. } | Self::BatchIncomplete { .. }
        )
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
