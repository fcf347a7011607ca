use std::sync::{Arc, Mutex};

use quarry_core::{MigrationSet, Store};
use tempfile::TempDir;

pub const TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (id INTEGER PRIMARY KEY AUTOINCREMENT, task TEXT NOT NULL, userId INTEGER NOT NULL)";

/// Shared buffer of every line a store logged.
pub type Lines = Arc<Mutex<Vec<String>>>;

/// Helper function to create a test store with a recording logger
pub fn create_test_store(migrations: impl Into<MigrationSet>) -> (TempDir, Store, Lines) {
    let _ = env_logger::builder().is_test(true).try_init();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let lines: Lines = Arc::default();
    let captured = Arc::clone(&lines);
    let store = Store::with_logger(
        temp_dir.path().join("test.db"),
        migrations,
        move |message: &str| captured.lock().unwrap().push(message.to_string()),
    );
    (temp_dir, store, lines)
}

/// Helper function to reopen an existing database file with new migrations
pub fn reopen(temp_dir: &TempDir, migrations: impl Into<MigrationSet>) -> (Store, Lines) {
    let lines: Lines = Arc::default();
    let captured = Arc::clone(&lines);
    let store = Store::with_logger(
        temp_dir.path().join("test.db"),
        migrations,
        move |message: &str| captured.lock().unwrap().push(message.to_string()),
    );
    (store, lines)
}

pub fn count_lines(lines: &Lines, predicate: impl Fn(&str) -> bool) -> usize {
    lines.lock().unwrap().iter().filter(|l| predicate(l.as_str())).count()
}
