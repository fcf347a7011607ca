//! Statement execution and row collection against a ready connection.

use std::sync::Arc;

use rusqlite::{params_from_iter, Connection, Rows, Statement};

use crate::{row::Row, value::Value};

/// Steps `rows` to completion, discarding any results.
pub(crate) fn drain(mut rows: Rows<'_>) -> rusqlite::Result<()> {
    while rows.next()?.is_some() {}
    Ok(())
}

fn column_names(stmt: &Statement<'_>) -> Arc<[String]> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_row(columns: &Arc<[String]>, row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    let values = (0..columns.len())
        .map(|idx| row.get_ref(idx).map(Value::from))
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Row::new(Arc::clone(columns), values))
}

/// Runs `sql` with positional `params` and collects every result row.
pub(crate) fn fetch_all(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns = column_names(&stmt);
    let mut rows = stmt.query(params_from_iter(params))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(read_row(&columns, row)?);
    }
    Ok(out)
}

/// Runs `sql` with positional `params` and returns the first row, if any.
pub(crate) fn fetch_first(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> rusqlite::Result<Option<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns = column_names(&stmt);
    let mut rows = stmt.query(params_from_iter(params))?;

    rows.next()?.map(|row| read_row(&columns, row)).transpose()
}

/// Runs `sql` with positional `params` for its side effects only.
pub(crate) fn run(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query(params_from_iter(params))?;
    drain(rows)
}
