use super::queries::{map_block_row, BLOCK_COLUMNS};
use super::shared::{row_id, to_db_timestamp};
use super::BlockService;
use crate::models::block::{BlockId, TimeRange, WorkBlock};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::{self, params};

impl<'a> BlockService<'a> {
    /// Insert a new block and return it with its database id.
    pub fn create(&self, mut block: WorkBlock) -> Result<WorkBlock> {
        block.validate().map_err(|e| anyhow!(e))?;
        if block.id.is_some() {
            return Err(anyhow!("New work blocks must not carry an id"));
        }

        let now = to_db_timestamp(Utc::now());
        self.conn
            .execute(
                "INSERT INTO work_blocks (
                    title, start_at, end_at, kind, importance,
                    project_id, task_id, user_id, notes, location, description,
                    created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    block.title,
                    to_db_timestamp(block.start_at),
                    to_db_timestamp(block.end_at),
                    block.kind.as_str(),
                    block.importance.as_str(),
                    block.project_id,
                    block.task_id,
                    block.user_id,
                    block.notes,
                    block.location,
                    block.description,
                    &now,
                    &now,
                ],
            )
            .context("Failed to insert work block")?;

        let id = self.conn.last_insert_rowid();
        block.id = Some(BlockId::from(id));
        log::debug!("created work block {}", id);
        Ok(block)
    }

    /// Retrieve a block by id.
    pub fn get(&self, id: &BlockId) -> Result<Option<WorkBlock>> {
        let row_id = row_id(id)?;
        let result = self.conn.query_row(
            &format!("SELECT {} FROM work_blocks WHERE id = ?", BLOCK_COLUMNS),
            [row_id],
            map_block_row,
        );

        match result {
            Ok(block) => Ok(Some(block)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to load work block {}", id)),
        }
    }

    /// Move or resize a block. Only the time range changes.
    pub fn update_range(&self, id: &BlockId, patch: &TimeRange) -> Result<WorkBlock> {
        patch.validate().map_err(|e| anyhow!(e))?;
        let row_id = row_id(id)?;

        let rows_affected = self
            .conn
            .execute(
                "UPDATE work_blocks SET start_at = ?, end_at = ?, updated_at = ? WHERE id = ?",
                params![
                    to_db_timestamp(patch.start_at),
                    to_db_timestamp(patch.end_at),
                    to_db_timestamp(Utc::now()),
                    row_id,
                ],
            )
            .context("Failed to update work block")?;

        if rows_affected == 0 {
            return Err(anyhow!("Work block with id {} not found", id));
        }

        log::debug!(
            "work block {} moved to {} .. {}",
            id,
            patch.start_at,
            patch.end_at
        );
        self.get(id)?
            .ok_or_else(|| anyhow!("Work block with id {} vanished after update", id))
    }

    /// Delete a block by id.
    pub fn delete(&self, id: &BlockId) -> Result<()> {
        let row_id = row_id(id)?;
        let rows_affected = self
            .conn
            .execute("DELETE FROM work_blocks WHERE id = ?", [row_id])
            .context("Failed to delete work block")?;

        if rows_affected == 0 {
            return Err(anyhow!("Work block with id {} not found", id));
        }

        Ok(())
    }
}
