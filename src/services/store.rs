//! The store boundary the planner reads blocks from and commits edits to.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::block::{BlockId, BlockKind, TimeRange, WorkBlock};

/// Optional query narrowing. Set fields are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockFilter {
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub user_id: Option<String>,
    /// Empty means every kind.
    pub kinds: Vec<BlockKind>,
}

impl BlockFilter {
    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn kind(mut self, kind: BlockKind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn matches(&self, block: &WorkBlock) -> bool {
        fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
            wanted.is_none() || wanted == actual
        }

        field_matches(&self.project_id, &block.project_id)
            && field_matches(&self.task_id, &block.task_id)
            && field_matches(&self.user_id, &block.user_id)
            && (self.kinds.is_empty() || self.kinds.contains(&block.kind))
    }
}

/// Persistence collaborator for work blocks.
///
/// Every call resolves to a value or an error; nothing is dropped silently.
#[cfg_attr(test, mockall::automock)]
pub trait BlockStore {
    /// Blocks overlapping `[week_start, week_end]`, ordered by start.
    fn get_blocks(
        &self,
        week_start: DateTime<Utc>,
        week_end: DateTime<Utc>,
        filter: &BlockFilter,
    ) -> Result<Vec<WorkBlock>>;

    /// Moves or resizes an existing block and returns the stored result.
    fn update_block(&self, id: &BlockId, patch: &TimeRange) -> Result<WorkBlock>;

    /// Persists a block without an id and returns it with one assigned.
    fn create_block(&self, block: WorkBlock) -> Result<WorkBlock>;

    fn delete_block(&self, id: &BlockId) -> Result<()>;
}

/// Half-open overlap with an inclusive query end.
pub(crate) fn in_window(block: &WorkBlock, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    block.start_at <= end && block.end_at > start
}
