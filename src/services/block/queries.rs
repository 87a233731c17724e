use super::shared::{parse_enum, to_db_timestamp, to_utc_datetime};
use super::BlockService;
use crate::models::block::{BlockId, TimeRange, WorkBlock};
use crate::services::store::{BlockFilter, BlockStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{self, params, Row};

pub(crate) const BLOCK_COLUMNS: &str = "id, title, start_at, end_at, kind, importance,
    project_id, task_id, user_id, notes, location, description";

impl<'a> BlockService<'a> {
    /// Blocks overlapping `[start, end]`, ordered by start.
    ///
    /// Id filters run in SQL; kinds are checked on the mapped rows.
    pub fn find_by_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &BlockFilter,
    ) -> Result<Vec<WorkBlock>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}
             FROM work_blocks
             WHERE start_at <= ?1 AND end_at > ?2
               AND (?3 IS NULL OR project_id = ?3)
               AND (?4 IS NULL OR task_id = ?4)
               AND (?5 IS NULL OR user_id = ?5)
             ORDER BY start_at ASC, id ASC",
            BLOCK_COLUMNS
        ))?;

        let blocks = stmt
            .query_map(
                params![
                    to_db_timestamp(end),
                    to_db_timestamp(start),
                    filter.project_id,
                    filter.task_id,
                    filter.user_id,
                ],
                map_block_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to query work blocks")?;

        Ok(blocks
            .into_iter()
            .filter(|block| filter.kinds.is_empty() || filter.kinds.contains(&block.kind))
            .collect())
    }
}

impl BlockStore for BlockService<'_> {
    fn get_blocks(
        &self,
        week_start: DateTime<Utc>,
        week_end: DateTime<Utc>,
        filter: &BlockFilter,
    ) -> Result<Vec<WorkBlock>> {
        self.find_by_range(week_start, week_end, filter)
    }

    fn update_block(&self, id: &BlockId, patch: &TimeRange) -> Result<WorkBlock> {
        self.update_range(id, patch)
    }

    fn create_block(&self, block: WorkBlock) -> Result<WorkBlock> {
        self.create(block)
    }

    fn delete_block(&self, id: &BlockId) -> Result<()> {
        self.delete(id)
    }
}

pub(crate) fn map_block_row(row: &Row<'_>) -> Result<WorkBlock, rusqlite::Error> {
    Ok(WorkBlock {
        id: Some(BlockId::from(row.get::<_, i64>(0)?)),
        title: row.get(1)?,
        start_at: to_utc_datetime(row.get::<_, String>(2)?)?,
        end_at: to_utc_datetime(row.get::<_, String>(3)?)?,
        kind: parse_enum(row.get::<_, String>(4)?)?,
        importance: parse_enum(row.get::<_, String>(5)?)?,
        project_id: row.get(6)?,
        task_id: row.get(7)?,
        user_id: row.get(8)?,
        notes: row.get(9)?,
        location: row.get(10)?,
        description: row.get(11)?,
    })
}
