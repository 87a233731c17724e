use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;
use crate::services::block::BlockService;

/// How long a commit waits on another writer before the store reports failure.
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// The planner's SQLite file and the `work_blocks` table inside it.
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    /// Opens the planner database at `path` with the work block schema ready.
    ///
    /// # Examples
    /// ```
    /// use week_planner::services::database::Database;
    /// use week_planner::services::store::{BlockFilter, BlockStore};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let db = Database::open(":memory:").unwrap();
    /// let start = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 3, 16, 23, 59, 59).unwrap();
    /// let blocks = db.blocks().get_blocks(start, end, &BlockFilter::default()).unwrap();
    /// assert!(blocks.is_empty());
    /// ```
    pub fn open(path: &str) -> Result<Self> {
        let db = Self::new(path)?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens the file without touching the schema.
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Failed to open planner database at {}", path))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("Failed to set busy timeout")?;

        log::debug!("opened planner database at {}", path);
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Block store backed by this database.
    pub fn blocks(&self) -> BlockService<'_> {
        BlockService::new(&self.conn)
    }

    /// Creates the work block table and brings older databases up to date.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::initialize_schema(&self.conn)
    }
}
