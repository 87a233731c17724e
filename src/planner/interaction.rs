//! Pointer interaction state machine for moving and resizing blocks.
//!
//! One session at a time: `pointer_down` captures the pointer on a block,
//! `pointer_move` produces snapped preview ranges and `pointer_up` turns the
//! last preview into a [`CommitRequest`]. The preview stays visible until the
//! caller settles the commit with the store's answer.

use std::collections::HashMap;

use egui::Pos2;
use serde::Serialize;

use super::drag::{DragMode, DragSession};
use super::geometry::GridConfig;
use super::layout::WeekLayout;
use super::resize::ResizeHandle;
use crate::error::{PlannerError, PlannerResult};
use crate::models::block::{BlockId, TimeRange, WorkBlock};
use crate::services::store::BlockStore;
use crate::utils::date::WeekRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Dragging,
    Resizing(ResizeHandle),
}

/// Update sent to the store when a drag or resize is released.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub id: BlockId,
    #[serde(flatten)]
    pub patch: TimeRange,
}

/// What the host should do after feeding a pointer event to the controller.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerOutcome {
    /// No session, or nothing under the pointer.
    Ignored,
    /// Pointer captured on a block.
    Captured { id: BlockId },
    /// Still inside the click dead zone.
    Pending,
    Preview { id: BlockId, range: TimeRange },
    /// Released without leaving the dead zone; the block's click handler may run.
    Click { id: BlockId },
    /// Released where it started.
    Discarded { id: BlockId },
    Commit(CommitRequest),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PreviewStatus {
    Live,
    Committing,
}

#[derive(Debug, Default)]
pub struct PointerInteractionController {
    session: Option<DragSession>,
    previews: HashMap<BlockId, (TimeRange, PreviewStatus)>,
}

impl PointerInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        match self.session.as_ref().map(|session| session.mode) {
            None => InteractionState::Idle,
            Some(DragMode::Move) => InteractionState::Dragging,
            Some(DragMode::Resize(handle)) => InteractionState::Resizing(handle),
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// True while move/up events must be routed here regardless of hover.
    pub fn captures_pointer(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a session on `block`.
    ///
    /// Fails while another session is active, or while a previous commit for
    /// the same block has not settled.
    pub fn pointer_down(
        &mut self,
        block: &WorkBlock,
        mode: DragMode,
        pos: Pos2,
        grid: &GridConfig,
        week: WeekRange,
    ) -> PlannerResult<PointerOutcome> {
        if self.session.is_some() {
            return Err(PlannerError::SessionActive);
        }
        if let Some(id) = block.id.as_ref().filter(|id| self.is_committing(id)) {
            return Err(PlannerError::CommitPending { id: id.clone() });
        }

        let session = DragSession::begin(block, mode, pos, grid, week)?;
        let id = session.block_id.clone();
        log::debug!("pointer captured on block {} ({:?})", id, mode);
        self.session = Some(session);
        Ok(PointerOutcome::Captured { id })
    }

    /// Hit-tests `layout` and starts a session on whatever is under `pos`.
    pub fn pointer_down_at(
        &mut self,
        layout: &WeekLayout,
        pos: Pos2,
        grid: &GridConfig,
    ) -> PlannerResult<PointerOutcome> {
        match layout.hit_test(pos, grid) {
            Some((placement, mode)) => {
                self.pointer_down(&placement.block, mode, pos, grid, layout.range)
            }
            None => Ok(PointerOutcome::Ignored),
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2, grid: &GridConfig) -> PointerOutcome {
        let Some(session) = self.session.as_mut() else {
            return PointerOutcome::Ignored;
        };
        session.pointer_pos = pos;

        if session.preview_range.is_none()
            && !session.exceeds_dead_zone(pos, grid.drag_dead_zone_px)
        {
            return PointerOutcome::Pending;
        }

        // A candidate in a DST gap keeps the previous preview.
        if let Some(range) = session.candidate(pos, grid) {
            session.preview_range = Some(range);
            session.hovered_date = Some(grid.zone.local_date(range.start_at));
            self.previews
                .insert(session.block_id.clone(), (range, PreviewStatus::Live));
        }

        match session.preview_range {
            Some(range) => PointerOutcome::Preview {
                id: session.block_id.clone(),
                range,
            },
            None => PointerOutcome::Pending,
        }
    }

    /// Ends the session.
    ///
    /// The returned [`CommitRequest`] keeps its preview on screen until
    /// [`settle`](Self::settle) is called with the store's answer.
    pub fn pointer_up(&mut self, pos: Pos2, grid: &GridConfig) -> PlannerResult<PointerOutcome> {
        if self.session.is_none() {
            return Ok(PointerOutcome::Ignored);
        }
        self.pointer_move(pos, grid);

        let Some(session) = self.session.take() else {
            return Ok(PointerOutcome::Ignored);
        };
        let id = session.block_id;

        let Some(preview) = session.preview_range else {
            log::debug!("block {} clicked", id);
            return Ok(PointerOutcome::Click { id });
        };

        if preview == session.original_range {
            self.previews.remove(&id);
            log::debug!("block {} released at its original range", id);
            return Ok(PointerOutcome::Discarded { id });
        }

        if let Err(err) = preview.validate() {
            self.previews.remove(&id);
            return Err(err);
        }

        self.previews
            .insert(id.clone(), (preview, PreviewStatus::Committing));
        log::debug!(
            "committing block {}: {} .. {}",
            id,
            preview.start_at,
            preview.end_at
        );
        Ok(PointerOutcome::Commit(CommitRequest { id, patch: preview }))
    }

    /// Drops the active session without committing. Returns the block it was on.
    pub fn cancel(&mut self) -> Option<BlockId> {
        let session = self.session.take()?;
        self.previews.remove(&session.block_id);
        log::debug!("session on block {} cancelled", session.block_id);
        Some(session.block_id)
    }

    /// Clears the in-flight preview for `id` with the store's answer.
    ///
    /// On failure the block falls back to whatever the store still holds on
    /// the next render; the error is returned, not retried.
    pub fn settle(
        &mut self,
        id: &BlockId,
        result: anyhow::Result<WorkBlock>,
    ) -> PlannerResult<WorkBlock> {
        match self.previews.get(id) {
            Some((_, PreviewStatus::Committing)) => {
                self.previews.remove(id);
            }
            _ => return Err(PlannerError::NoPendingCommit { id: id.clone() }),
        }

        result.map_err(|source| PlannerError::CommitFailure {
            id: id.clone(),
            source,
        })
    }

    /// Sends `request` to `store` and settles it in one step.
    pub fn commit_with<S: BlockStore + ?Sized>(
        &mut self,
        store: &S,
        request: &CommitRequest,
    ) -> PlannerResult<WorkBlock> {
        let result = store.update_block(&request.id, &request.patch);
        self.settle(&request.id, result)
    }

    pub fn preview_for(&self, id: &BlockId) -> Option<TimeRange> {
        self.previews.get(id).map(|(range, _)| *range)
    }

    pub fn is_committing(&self, id: &BlockId) -> bool {
        matches!(self.previews.get(id), Some((_, PreviewStatus::Committing)))
    }

    /// Copies of `blocks` with live and in-flight previews applied.
    pub fn apply_previews(&self, blocks: &[WorkBlock]) -> Vec<WorkBlock> {
        blocks
            .iter()
            .map(|block| {
                match block.id.as_ref().and_then(|id| self.preview_for(id)) {
                    Some(range) => block.with_range(range),
                    None => block.clone(),
                }
            })
            .collect()
    }
}
