//! SQLite-backed work block service.
//! Implements the planner's [`BlockStore`](crate::services::store::BlockStore)
//! over the `work_blocks` table.

use rusqlite::Connection;

pub mod crud;
pub mod queries;
mod shared;

/// Service for managing work blocks stored in SQLite.
pub struct BlockService<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> BlockService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}
