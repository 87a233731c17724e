//! Schema-drift helpers for databases created by older builds.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Checks whether a column exists on a table.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let exists: i32 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
            [table, column],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to inspect columns of {}", table))?;

    Ok(exists > 0)
}

/// Adds a column if it does not already exist.
pub fn ensure_column(conn: &Connection, table: &str, column: &str, ddl: &str) -> Result<()> {
    if column_exists(conn, table, column)? {
        return Ok(());
    }

    log::warn!("{} is missing column {}; adding it", table, column);
    conn.execute(ddl, [])
        .with_context(|| format!("Failed to add {}.{}", table, column))?;
    Ok(())
}

/// Copies non-null values from an old column into its replacement.
pub fn copy_column(conn: &Connection, table: &str, from: &str, to: &str) -> Result<()> {
    let stmt = format!("UPDATE {table} SET {to} = {from} WHERE {from} IS NOT NULL");
    conn.execute(&stmt, [])
        .with_context(|| format!("Failed to copy {from} to {to} on {table}"))?;
    Ok(())
}
