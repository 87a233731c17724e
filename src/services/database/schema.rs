use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_work_blocks_table(conn)?;
    run_work_block_migrations(conn)?;
    create_indexes(conn)?;
    Ok(())
}

fn create_work_blocks_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS work_blocks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL DEFAULT '',
            start_at TEXT NOT NULL,
            end_at TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'focus',
            importance TEXT NOT NULL DEFAULT 'normal',
            project_id TEXT,
            task_id TEXT,
            user_id TEXT,
            notes TEXT,
            location TEXT,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create work_blocks table")?;

    Ok(())
}

/// Columns added after the first release. Older databases get them on open.
const ADDED_COLUMNS: &[(&str, &str)] = &[
    ("kind", "ALTER TABLE work_blocks ADD COLUMN kind TEXT NOT NULL DEFAULT 'focus'"),
    (
        "importance",
        "ALTER TABLE work_blocks ADD COLUMN importance TEXT NOT NULL DEFAULT 'normal'",
    ),
    ("project_id", "ALTER TABLE work_blocks ADD COLUMN project_id TEXT"),
    ("task_id", "ALTER TABLE work_blocks ADD COLUMN task_id TEXT"),
    ("user_id", "ALTER TABLE work_blocks ADD COLUMN user_id TEXT"),
    ("notes", "ALTER TABLE work_blocks ADD COLUMN notes TEXT"),
    ("location", "ALTER TABLE work_blocks ADD COLUMN location TEXT"),
    ("description", "ALTER TABLE work_blocks ADD COLUMN description TEXT"),
    // SQLite refuses non-constant defaults on ALTER, so these start empty.
    ("created_at", "ALTER TABLE work_blocks ADD COLUMN created_at TEXT NOT NULL DEFAULT ''"),
    ("updated_at", "ALTER TABLE work_blocks ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''"),
];

fn run_work_block_migrations(conn: &Connection) -> Result<()> {
    let had_kind = migrations::column_exists(conn, "work_blocks", "kind")?;

    for (column, ddl) in ADDED_COLUMNS {
        migrations::ensure_column(conn, "work_blocks", column, ddl)?;
    }

    // The kind column used to be called block_type.
    if !had_kind && migrations::column_exists(conn, "work_blocks", "block_type")? {
        log::warn!("migrating work_blocks.block_type into work_blocks.kind");
        migrations::copy_column(conn, "work_blocks", "block_type", "kind")?;
    }

    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_work_blocks_start ON work_blocks(start_at)",
        [],
    )
    .context("Failed to create work_blocks start index")?;

    Ok(())
}
