use chrono::{Duration, NaiveDate};
use egui::{Pos2, Vec2};
use serde::Serialize;

use super::geometry::{snap_minutes, GridConfig};
use super::resize::{resize_candidate, ResizeHandle};
use crate::error::{PlannerError, PlannerResult};
use crate::models::block::{BlockId, TimeRange, WorkBlock};
use crate::utils::date::{midnight, WeekRange};

/// What a pointer press on a block will do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    Move,
    Resize(ResizeHandle),
}

/// State of one pointer-down .. pointer-up interaction on a single block.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub block_id: BlockId,
    pub block: WorkBlock,
    pub mode: DragMode,
    pub pointer_origin: Pos2,
    /// Pointer position relative to the block's top-left corner at press time.
    pub pointer_offset: Vec2,
    pub pointer_pos: Pos2,
    pub original_range: TimeRange,
    pub preview_range: Option<TimeRange>,
    pub hovered_date: Option<NaiveDate>,
    /// Week shown when the press happened; column indices resolve against it.
    pub week: WeekRange,
}

impl DragSession {
    pub fn begin(
        block: &WorkBlock,
        mode: DragMode,
        pointer: Pos2,
        grid: &GridConfig,
        week: WeekRange,
    ) -> PlannerResult<Self> {
        let block_id = block.id.clone().ok_or(PlannerError::MissingBlockId)?;
        let original_range = block.range();
        original_range.validate()?;

        let start_minute = grid.zone.minute_of_day(block.start_at).clamp(
            grid.geometry.start_minutes(),
            grid.geometry.end_minutes(),
        );
        let block_top = grid.y_for_minute_of_day(start_minute);
        let column = week
            .day_index(grid.zone.local_date(block.start_at))
            .unwrap_or_else(|| grid.column_at(pointer.x));
        let block_left = grid.column_left(column);

        Ok(Self {
            block_id,
            block: block.clone(),
            mode,
            pointer_origin: pointer,
            pointer_offset: pointer - Pos2::new(block_left, block_top),
            pointer_pos: pointer,
            original_range,
            preview_range: None,
            hovered_date: Some(grid.zone.local_date(block.start_at)),
            week,
        })
    }

    /// True once the pointer has travelled past the click dead zone.
    pub fn exceeds_dead_zone(&self, pointer: Pos2, dead_zone: f32) -> bool {
        self.pointer_origin.distance(pointer) >= dead_zone
    }

    /// Candidate range for the pointer at `pointer`, according to the session mode.
    pub fn candidate(&self, pointer: Pos2, grid: &GridConfig) -> Option<TimeRange> {
        match self.mode {
            DragMode::Move => move_candidate(
                &self.original_range,
                pointer - Vec2::new(0.0, self.pointer_offset.y),
                grid,
                &self.week,
            ),
            DragMode::Resize(handle) => {
                resize_candidate(&self.original_range, handle, pointer, grid)
            }
        }
    }
}

/// Candidate range when the block's top edge sits at `anchor`.
///
/// The day comes from the column under `anchor.x`, the start from `anchor.y`
/// snapped to the grid interval. The duration is kept exactly and the start
/// is pushed back inside the grid window so the whole block fits, measured in
/// elapsed time on that day.
pub fn move_candidate(
    original: &TimeRange,
    anchor: Pos2,
    grid: &GridConfig,
    week: &WeekRange,
) -> Option<TimeRange> {
    let duration = original.duration();
    let date = week.day(grid.column_at(anchor.x));

    let grid_start = grid.geometry.start_minutes();
    let latest_start = grid.geometry.end_minutes() - duration.num_seconds() as f32 / 60.0;
    let snapped = snap_minutes(grid.minute_of_day_at(anchor.y), grid.snap_interval_minutes);
    let start_minutes = if latest_start < grid_start {
        grid_start
    } else {
        snapped.clamp(grid_start, latest_start)
    };

    let offset = Duration::seconds((start_minutes * 60.0).round() as i64);
    let mut start_at = grid.zone.resolve(midnight(date) + offset)?;

    // A DST change inside the window makes wall-clock minutes and elapsed
    // time disagree, so the end is checked against the real window bounds.
    let window_start = grid
        .zone
        .resolve_forward(midnight(date) + Duration::hours(grid.geometry.start_hour as i64));
    let window_end = grid
        .zone
        .resolve_forward(midnight(date) + Duration::hours(grid.geometry.end_hour as i64));
    if start_at + duration > window_end {
        start_at = window_end - duration;
    }
    let start_at = start_at.max(window_start);

    Some(TimeRange {
        start_at,
        end_at: start_at + duration,
    })
}
