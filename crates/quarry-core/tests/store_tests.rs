use quarry_core::{values, MigrationSet, Row, StoreError, Value};

mod common;
use common::{count_lines, create_test_store, reopen, TODOS_TABLE};

#[derive(Debug, PartialEq)]
struct Todo {
    id: i64,
    task: String,
    user_id: i64,
}

impl Todo {
    fn from_row(row: Row) -> quarry_core::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            task: row.get("task")?,
            user_id: row.get("userId")?,
        })
    }
}

#[test]
fn test_store_initialization_is_lazy() {
    let (_temp_dir, store, lines) = create_test_store(vec![vec![TODOS_TABLE]]);

    assert!(!store.path().exists());
    assert!(lines.lock().unwrap().is_empty());

    assert_eq!(store.schema_version().expect("Failed to read version"), 1);
    assert!(store.path().exists());
}

#[test]
fn test_insert_and_get_single_todo() {
    let (_temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);

    store
        .execute(
            "INSERT INTO todos(task,userId) VALUES(?,?)",
            &values!["Ship tests", 42],
        )
        .expect("Failed to insert todo");

    let todo = store
        .query_one_with(
            "SELECT id,task,userId FROM todos WHERE userId=?",
            &values![42],
            Todo::from_row,
        )
        .expect("Failed to query todo")
        .expect("Todo should exist");

    assert_eq!(todo.task, "Ship tests");
    assert_eq!(todo.user_id, 42);
    assert!(todo.id > 0);
}

#[test]
fn test_query_many_returns_tasks_in_insertion_order() {
    let (_temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);

    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["First task", 7],
        )
        .expect("Failed to insert first todo");
    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["Second task", 7],
        )
        .expect("Failed to insert second todo");
    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["Other user", 8],
        )
        .expect("Failed to insert third todo");

    let tasks = store
        .query_many_with(
            "SELECT task FROM todos WHERE userId=? ORDER BY id",
            &values![7],
            |row| row.get::<String>("task"),
        )
        .expect("Failed to query tasks");

    assert_eq!(tasks, ["First task", "Second task"]);
}

#[test]
fn test_raw_rows_without_transform() {
    let (_temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);

    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["Raw", 3],
        )
        .expect("Failed to insert todo");

    let rows = store
        .query_many("SELECT task, userId FROM todos", &[])
        .expect("Failed to query rows");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].columns(), ["task", "userId"]);
    assert_eq!(rows[0].values(), [Value::from("Raw"), Value::Integer(3)]);
}

#[test]
fn test_empty_results() {
    let (_temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);

    let many = store
        .query_many_with("SELECT * FROM todos", &[], Todo::from_row)
        .expect("Failed to query");
    assert!(many.is_empty());

    let one = store
        .query_one("SELECT * FROM todos WHERE id = ?", &values![1])
        .expect("Failed to query");
    assert!(one.is_none());
}

#[test]
fn test_rows_serialize_to_json() {
    let (_temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);
    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["json", 1],
        )
        .unwrap();

    let row = store
        .query_one("SELECT id, task, userId FROM todos", &[])
        .unwrap()
        .unwrap();

    assert_eq!(
        serde_json::to_value(&row).unwrap(),
        serde_json::json!({"id": 1, "task": "json", "userId": 1})
    );
}

#[test]
fn test_second_store_on_same_file_is_up_to_date() {
    let (temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);
    store.ensure_ready().expect("Failed to migrate");
    drop(store);

    let (store, lines) = reopen(&temp_dir, vec![vec![TODOS_TABLE]]);
    store.ensure_ready().expect("Failed to reopen");

    assert_eq!(
        count_lines(&lines, |l| l == "[DB] Database is up to date"),
        1
    );
    assert_eq!(count_lines(&lines, |l| l.contains("CREATE TABLE")), 0);
}

#[test]
fn test_new_migrations_apply_to_existing_file() {
    let (temp_dir, store, _lines) = create_test_store(vec![vec![TODOS_TABLE]]);
    store
        .execute(
            "INSERT INTO todos (task, userId) VALUES (?, ?)",
            &values!["kept", 1],
        )
        .unwrap();
    drop(store);

    let migrations = MigrationSet::new([
        vec![TODOS_TABLE],
        vec!["ALTER TABLE todos ADD COLUMN done INTEGER NOT NULL DEFAULT 0"],
    ]);
    let (store, lines) = reopen(&temp_dir, migrations);

    let done = store
        .query_one_with("SELECT done FROM todos WHERE task = ?", &values!["kept"], |row| {
            row.get::<bool>("done")
        })
        .unwrap();

    assert_eq!(done, Some(false));
    assert_eq!(store.schema_version().unwrap(), 2);
    assert_eq!(count_lines(&lines, |l| l.contains(TODOS_TABLE)), 0);
}

#[test]
fn test_failed_batch_leaves_version_and_retries_later() {
    let broken = MigrationSet::new([
        vec![TODOS_TABLE],
        vec![
            "CREATE INDEX IF NOT EXISTS todos_user ON todos (userId)",
            "CREATE INDEX todos_missing ON todos (missing_column)",
        ],
    ]);
    let (temp_dir, store, lines) = create_test_store(broken);

    let err = store.query_many("SELECT * FROM todos", &[]).unwrap_err();
    assert!(matches!(
        err,
        StoreError::BatchIncomplete {
            version: 2,
            failed: 1,
            total: 2
        }
    ));
    assert_eq!(count_lines(&lines, |l| l.starts_with("[DB ERROR]")), 1);
    assert_eq!(
        count_lines(&lines, |l| l.starts_with("[DB] Saving database version")),
        0
    );
    drop(store);

    let fixed = MigrationSet::new([
        vec![TODOS_TABLE],
        vec![
            "CREATE INDEX IF NOT EXISTS todos_user ON todos (userId)",
            "CREATE INDEX IF NOT EXISTS todos_task ON todos (task)",
        ],
    ]);
    let (store, lines) = reopen(&temp_dir, fixed);

    assert_eq!(store.schema_version().unwrap(), 2);
    assert_eq!(
        count_lines(&lines, |l| l == "[DB] Running statements for version 1"),
        1
    );
    assert_eq!(
        count_lines(&lines, |l| l == "[DB] Saving database version 2"),
        1
    );
}

#[test]
fn test_engine_error_on_missing_table() {
    let (_temp_dir, store, lines) = create_test_store(vec![vec![TODOS_TABLE]]);
    store.ensure_ready().unwrap();
    let logged = lines.lock().unwrap().len();

    let err = store
        .execute("INSERT INTO nowhere VALUES (?)", &values![1])
        .unwrap_err();

    assert!(matches!(err, StoreError::Engine(_)));
    assert!(err.to_string().contains("no such table"));
    assert_eq!(lines.lock().unwrap().len(), logged);
}
