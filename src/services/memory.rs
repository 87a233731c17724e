//! In-process block store. Used by tests and by hosts without a database.

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use super::store::{in_window, BlockFilter, BlockStore};
use crate::models::block::{BlockId, TimeRange, WorkBlock};

#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: RefCell<BTreeMap<BlockId, WorkBlock>>,
    next_id: RefCell<i64>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store, assigning ids to blocks that have none.
    pub fn with_blocks(blocks: impl IntoIterator<Item = WorkBlock>) -> Result<Self> {
        let store = Self::new();
        for block in blocks {
            match block.id.clone() {
                Some(id) => {
                    block.validate().map_err(|e| anyhow!(e))?;
                    store.blocks.borrow_mut().insert(id, block);
                }
                None => {
                    store.create_block(block)?;
                }
            }
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.blocks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.borrow().is_empty()
    }

    pub fn get(&self, id: &BlockId) -> Option<WorkBlock> {
        self.blocks.borrow().get(id).cloned()
    }

    fn allocate_id(&self) -> BlockId {
        let blocks = self.blocks.borrow();
        let mut next = self.next_id.borrow_mut();
        loop {
            *next += 1;
            let id = BlockId::from(*next);
            if !blocks.contains_key(&id) {
                return id;
            }
        }
    }
}

impl BlockStore for MemoryBlockStore {
    fn get_blocks(
        &self,
        week_start: DateTime<Utc>,
        week_end: DateTime<Utc>,
        filter: &BlockFilter,
    ) -> Result<Vec<WorkBlock>> {
        let mut blocks: Vec<WorkBlock> = self
            .blocks
            .borrow()
            .values()
            .filter(|block| in_window(block, week_start, week_end) && filter.matches(block))
            .cloned()
            .collect();
        blocks.sort_by_key(|block| block.start_at);
        Ok(blocks)
    }

    fn update_block(&self, id: &BlockId, patch: &TimeRange) -> Result<WorkBlock> {
        patch.validate().map_err(|e| anyhow!(e))?;

        let mut blocks = self.blocks.borrow_mut();
        let block = blocks
            .get_mut(id)
            .ok_or_else(|| anyhow!("Work block with id {} not found", id))?;
        block.start_at = patch.start_at;
        block.end_at = patch.end_at;
        log::debug!("memory store updated block {}", id);
        Ok(block.clone())
    }

    fn create_block(&self, mut block: WorkBlock) -> Result<WorkBlock> {
        block.validate().map_err(|e| anyhow!(e))?;
        if block.id.is_some() {
            return Err(anyhow!("New work blocks must not carry an id"));
        }

        let id = self.allocate_id();
        block.id = Some(id.clone());
        self.blocks.borrow_mut().insert(id, block.clone());
        Ok(block)
    }

    fn delete_block(&self, id: &BlockId) -> Result<()> {
        self.blocks
            .borrow_mut()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("Work block with id {} not found", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    fn draft(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> WorkBlock {
        WorkBlock::new(title, start, end).unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let store = MemoryBlockStore::new();
        let first = store.create_block(draft("a", at(10, 9), at(10, 10))).unwrap();
        let second = store.create_block(draft("b", at(10, 9), at(10, 10))).unwrap();

        assert_eq!(first.id, Some(BlockId::from(1_i64)));
        assert_eq!(second.id, Some(BlockId::from(2_i64)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_create_rejects_existing_id() {
        let store = MemoryBlockStore::new();
        let mut block = draft("a", at(10, 9), at(10, 10));
        block.id = Some(BlockId::from("x"));
        assert!(store.create_block(block).is_err());
    }

    #[test]
    fn test_get_blocks_in_window_sorted() {
        let store = MemoryBlockStore::with_blocks(vec![
            draft("late", at(12, 14), at(12, 15)),
            draft("early", at(10, 9), at(10, 10)),
            draft("next week", at(17, 9), at(17, 10)),
        ])
        .unwrap();

        let blocks = store
            .get_blocks(at(10, 0), at(16, 23), &BlockFilter::default())
            .unwrap();
        let titles: Vec<&str> = blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["early", "late"]);
    }

    #[test]
    fn test_update_moves_block() {
        let store = MemoryBlockStore::with_blocks(vec![draft("a", at(10, 9), at(10, 10))]).unwrap();
        let id = BlockId::from(1_i64);
        let patch = TimeRange::new(at(11, 13), at(11, 14)).unwrap();

        let updated = store.update_block(&id, &patch).unwrap();
        assert_eq!(updated.range(), patch);
        assert_eq!(store.get(&id).unwrap().start_at, at(11, 13));
    }

    #[test]
    fn test_update_unknown_block_fails() {
        let store = MemoryBlockStore::new();
        let patch = TimeRange::new(at(11, 13), at(11, 14)).unwrap();
        assert!(store.update_block(&BlockId::from("nope"), &patch).is_err());
    }

    #[test]
    fn test_update_rejects_inverted_patch() {
        let store = MemoryBlockStore::with_blocks(vec![draft("a", at(10, 9), at(10, 10))]).unwrap();
        let patch = TimeRange {
            start_at: at(10, 12),
            end_at: at(10, 11),
        };
        assert!(store.update_block(&BlockId::from(1_i64), &patch).is_err());
        assert_eq!(store.get(&BlockId::from(1_i64)).unwrap().start_at, at(10, 9));
    }

    #[test]
    fn test_delete() {
        let store = MemoryBlockStore::with_blocks(vec![draft("a", at(10, 9), at(10, 10))]).unwrap();
        store.delete_block(&BlockId::from(1_i64)).unwrap();
        assert!(store.is_empty());
        assert!(store.delete_block(&BlockId::from(1_i64)).is_err());
    }
}
