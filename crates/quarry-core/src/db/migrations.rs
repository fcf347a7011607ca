//! Versioned schema migrations tracked through `PRAGMA user_version`.
//!
//! A [`MigrationSet`] is an ordered list of [`Batch`]es; batch `i` moves the
//! schema to version `i + 1`. [`migrate`] applies every batch past the
//! persisted version and only then records the new version, so a failed run
//! resumes where it stopped.

use log::debug;
use rusqlite::Connection;

use super::queries::drain;
use crate::{
    error::{Result, StoreError},
    logger::{LogSink, ERROR_PREFIX},
};

/// Statements that together advance the schema by one version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    statements: Vec<String>,
}

impl Batch {
    pub fn new<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            statements: statements.into_iter().map(Into::into).collect(),
        }
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Batch {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Ordered batches; its length is the fully migrated schema version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSet {
    batches: Vec<Batch>,
}

impl MigrationSet {
    /// Builds a set from nested lists of statements.
    ///
    /// ```
    /// use quarry_core::MigrationSet;
    ///
    /// let set = MigrationSet::new([
    ///     vec!["CREATE TABLE IF NOT EXISTS todos(id INTEGER PRIMARY KEY)"],
    ///     vec!["ALTER TABLE todos ADD COLUMN task TEXT"],
    /// ]);
    /// assert_eq!(set.current_version(), 2);
    /// ```
    pub fn new<I, B, S>(batches: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: Into<String>,
    {
        batches.into_iter().map(Batch::new).collect()
    }

    /// Version a database reaches once every batch has been applied.
    pub fn current_version(&self) -> usize {
        self.batches.len()
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl FromIterator<Batch> for MigrationSet {
    fn from_iter<I: IntoIterator<Item = Batch>>(iter: I) -> Self {
        Self {
            batches: iter.into_iter().collect(),
        }
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for MigrationSet {
    fn from(batches: Vec<Vec<S>>) -> Self {
        Self::new(batches)
    }
}

/// Result of a single statement attempt inside a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    Applied,
    Failed { message: String },
}

impl StatementOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StatementOutcome::Applied)
    }
}

/// Per-statement outcomes of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub version: usize,
    pub outcomes: Vec<StatementOutcome>,
}

impl BatchReport {
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.applied()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

/// What a successful [`migrate`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Nothing to apply
    UpToDate { version: usize },
    /// Batches `from + 1 ..= to` were applied
    Migrated { from: usize, to: usize },
}

impl MigrationOutcome {
    /// Schema version after the run.
    pub fn version(&self) -> usize {
        match *self {
            MigrationOutcome::UpToDate { version } => version,
            MigrationOutcome::Migrated { to, .. } => to,
        }
    }
}

/// Reads the persisted schema version.
pub fn read_schema_version(conn: &Connection) -> Result<usize> {
    let raw: i64 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| StoreError::VersionRead {
            reason: e.to_string(),
        })?;
    usize::try_from(raw).map_err(|_| StoreError::VersionRead {
        reason: format!("negative version {raw}"),
    })
}

/// Persists `version` as the schema version.
pub fn write_schema_version(conn: &Connection, version: usize) -> Result<()> {
    conn.execute_batch(&format!("PRAGMA user_version = {version}"))?;
    Ok(())
}

/// Brings the database behind `conn` up to `migrations.current_version()`.
///
/// Failing statements are logged and counted but do not stop the rest of
/// their batch. A batch with any failure aborts the run with
/// [`StoreError::BatchIncomplete`]; later batches are not attempted and the
/// persisted version is left unchanged.
pub fn migrate(
    conn: &Connection,
    migrations: &MigrationSet,
    sink: &dyn LogSink,
) -> Result<MigrationOutcome> {
    let version = read_schema_version(conn)?;
    let target = migrations.current_version();

    if version == target {
        sink.log("[DB] Database is up to date");
        return Ok(MigrationOutcome::UpToDate { version });
    }
    if version > target {
        return Err(StoreError::VersionAhead {
            found: version,
            known: target,
        });
    }

    for (offset, batch) in migrations.batches()[version..].iter().enumerate() {
        let report = run_batch(conn, version + offset + 1, batch, sink);
        debug!(
            "Batch for version {}: {}/{} statements applied",
            report.version,
            report.applied(),
            batch.len()
        );
        if !report.is_complete() {
            return Err(StoreError::BatchIncomplete {
                version: report.version,
                failed: report.failed(),
                total: batch.len(),
            });
        }
    }

    sink.log(&format!("[DB] Saving database version {target}"));
    write_schema_version(conn, target)?;

    Ok(MigrationOutcome::Migrated {
        from: version,
        to: target,
    })
}

fn run_batch(conn: &Connection, version: usize, batch: &Batch, sink: &dyn LogSink) -> BatchReport {
    sink.log(&format!("[DB] Running statements for version {version}"));

    let outcomes = batch
        .statements()
        .iter()
        .map(|statement| {
            sink.log(&format!("[DB] {statement}"));
            match run_statement(conn, statement) {
                Ok(()) => StatementOutcome::Applied,
                Err(e) => {
                    let message = e.to_string();
                    sink.log(&format!("{ERROR_PREFIX} {message}"));
                    StatementOutcome::Failed { message }
                }
            }
        })
        .collect();

    BatchReport { version, outcomes }
}

fn run_statement(conn: &Connection, statement: &str) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(statement)?;
    let rows = stmt.query([])?;
    drain(rows)
}
