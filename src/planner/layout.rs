//! Week layout: turns a flat block collection into lane-assigned placements.
//!
//! Recomputed from scratch on every call. Blocks are bucketed by the local
//! calendar day of their start, lanes are assigned per day, and each lane
//! record gets its vertical position from [`TimeGeometry`](super::geometry::TimeGeometry).

use chrono::NaiveDate;
use egui::{Pos2, Rect, Vec2};
use serde::Serialize;

use super::drag::DragMode;
use super::geometry::GridConfig;
use super::lanes::{lane_records, LaneRecord};
use super::resize::HandleRects;
use crate::models::block::{BlockId, WorkBlock};
use crate::utils::date::{WeekRange, DAYS_IN_WEEK};

/// Render record for one block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPlacement {
    pub block: WorkBlock,
    pub day_index: usize,
    pub lane: usize,
    pub total_lanes: usize,
    /// Offset from the top of the time grid, header excluded.
    pub top: f32,
    pub height: f32,
    /// Left edge as a fraction of the day column width.
    pub left: f32,
    /// Width as a fraction of the day column width.
    pub width: f32,
    pub color: &'static str,
    pub accent: Option<&'static str>,
}

impl BlockPlacement {
    /// Absolute rectangle of the block in grid pixel space.
    pub fn rect(&self, grid: &GridConfig) -> Rect {
        let column_width = grid.metrics.column_width;
        Rect::from_min_size(
            Pos2::new(
                grid.column_left(self.day_index) + self.left * column_width,
                grid.metrics.header_height + self.top,
            ),
            Vec2::new(self.width * column_width, self.height),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLayout {
    pub date: NaiveDate,
    pub placements: Vec<BlockPlacement>,
}

impl DayLayout {
    pub fn total_lanes(&self) -> usize {
        self.placements.first().map_or(0, |p| p.total_lanes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekLayout {
    pub range: WeekRange,
    pub days: Vec<DayLayout>,
}

impl WeekLayout {
    pub fn placements(&self) -> impl Iterator<Item = &BlockPlacement> {
        self.days.iter().flat_map(|day| day.placements.iter())
    }

    pub fn placement(&self, id: &BlockId) -> Option<&BlockPlacement> {
        self.placements()
            .find(|placement| placement.block.id.as_ref() == Some(id))
    }

    /// Block under the pointer and what a press there would start.
    ///
    /// Later placements are drawn on top, so they win.
    pub fn hit_test(&self, pos: Pos2, grid: &GridConfig) -> Option<(&BlockPlacement, DragMode)> {
        let placements: Vec<&BlockPlacement> = self.placements().collect();
        placements.into_iter().rev().find_map(|placement| {
            let rect = placement.rect(grid);
            if !rect.contains(pos) {
                return None;
            }
            let mode = HandleRects::for_timed_block(rect)
                .hit_test(pos)
                .map_or(DragMode::Move, DragMode::Resize);
            Some((placement, mode))
        })
    }
}

pub struct GridLayoutEngine;

impl GridLayoutEngine {
    /// Lays out the Monday-start week containing `reference`.
    ///
    /// Blocks starting outside the week, or with an invalid range, are left out.
    pub fn layout_week(blocks: &[WorkBlock], reference: NaiveDate, grid: &GridConfig) -> WeekLayout {
        let range = WeekRange::containing(reference, grid.zone);
        let mut buckets: Vec<Vec<WorkBlock>> = vec![Vec::new(); DAYS_IN_WEEK];

        for block in blocks {
            if block.validate().is_err() {
                log::debug!("skipping block {:?} with invalid range", block.id);
                continue;
            }
            if let Some(index) = range.day_index(grid.zone.local_date(block.start_at)) {
                buckets[index].push(block.clone());
            }
        }

        let days = buckets
            .into_iter()
            .enumerate()
            .map(|(index, day_blocks)| DayLayout {
                date: range.day(index),
                placements: Self::place_day(index, &day_blocks, grid),
            })
            .collect();

        WeekLayout { range, days }
    }

    /// Placements for one day column.
    pub fn place_day(day_index: usize, blocks: &[WorkBlock], grid: &GridConfig) -> Vec<BlockPlacement> {
        lane_records(blocks)
            .into_iter()
            .map(|record| Self::place(day_index, record, grid))
            .collect()
    }

    fn place(day_index: usize, record: LaneRecord, grid: &GridConfig) -> BlockPlacement {
        let geometry = &grid.geometry;
        let local_start = grid.zone.local_datetime(record.block.start_at).time();
        let top = geometry.time_to_y(geometry.clamp_to_window(local_start));
        let height = geometry
            .duration_to_height(record.block.start_at, record.block.end_at)
            .max(grid.min_block_height_px);
        let width = 1.0 / record.total_lanes as f32;

        BlockPlacement {
            day_index,
            lane: record.lane,
            total_lanes: record.total_lanes,
            top,
            height,
            left: record.lane as f32 * width,
            width,
            color: record.block.kind.color(),
            accent: record.block.importance.accent(),
            block: record.block,
        }
    }
}
