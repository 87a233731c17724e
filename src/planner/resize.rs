// Block Resize System
//
// Resizing a block by dragging its top or bottom edge.
// - Top handle: moves the start, end stays fixed
// - Bottom handle: moves the end, start stays fixed
// The moving edge snaps to the grid interval and may never cross the fixed
// edge; it is held one interval away from it instead.

use chrono::Duration;
use egui::{Pos2, Rect, Vec2};
use serde::Serialize;

use super::geometry::{snap_minutes, GridConfig};
use crate::models::block::TimeRange;
use crate::utils::date::midnight;

/// Which edge of the block is being resized
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    /// Top edge - adjusts start time
    Top,
    /// Bottom edge - adjusts end time
    Bottom,
}

/// Upper bound on the hit zone height at each edge
pub const HANDLE_SIZE: f32 = 10.0;

/// Hit zones for the resize handles of a placed block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleRects {
    pub top: Rect,
    pub bottom: Rect,
}

impl HandleRects {
    /// Handle zones for a timed block.
    ///
    /// Zones span the full width. Each is at most a quarter of the block's
    /// height so short blocks keep a draggable middle.
    pub fn for_timed_block(block_rect: Rect) -> Self {
        let zone_height = (block_rect.height() / 4.0).min(HANDLE_SIZE);

        Self {
            top: Rect::from_min_size(
                Pos2::new(block_rect.left(), block_rect.top()),
                Vec2::new(block_rect.width(), zone_height),
            ),
            bottom: Rect::from_min_size(
                Pos2::new(block_rect.left(), block_rect.bottom() - zone_height),
                Vec2::new(block_rect.width(), zone_height),
            ),
        }
    }

    /// Check if a point hits any handle and return which one
    pub fn hit_test(&self, pos: Pos2) -> Option<ResizeHandle> {
        if self.top.contains(pos) {
            Some(ResizeHandle::Top)
        } else if self.bottom.contains(pos) {
            Some(ResizeHandle::Bottom)
        } else {
            None
        }
    }

    pub fn get(&self, handle: ResizeHandle) -> Rect {
        match handle {
            ResizeHandle::Top => self.top,
            ResizeHandle::Bottom => self.bottom,
        }
    }
}

/// Candidate range for a resize with the pointer at `pointer`.
///
/// Returns `None` only when the snapped edge falls into a DST gap.
pub fn resize_candidate(
    original: &TimeRange,
    handle: ResizeHandle,
    pointer: Pos2,
    grid: &GridConfig,
) -> Option<TimeRange> {
    let zone = grid.zone;
    let day = zone.local_date(original.start_at);
    let interval = Duration::minutes(grid.snap_interval_minutes.max(1) as i64);

    let minutes = snap_minutes(grid.minute_of_day_at(pointer.y), grid.snap_interval_minutes)
        .clamp(grid.geometry.start_minutes(), grid.geometry.end_minutes());
    let edge = zone.resolve(midnight(day) + Duration::minutes(minutes as i64))?;

    let range = match handle {
        ResizeHandle::Top => {
            let latest = original.end_at - interval;
            TimeRange {
                start_at: edge.min(latest),
                end_at: original.end_at,
            }
        }
        ResizeHandle::Bottom => {
            let earliest = original.start_at + interval;
            TimeRange {
                start_at: original.start_at,
                end_at: edge.max(earliest),
            }
        }
    };

    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::PlannerConfig;
    use crate::planner::geometry::GridMetrics;
    use chrono::{DateTime, TimeZone, Utc};
    use test_case::test_case;

    fn grid() -> GridConfig {
        GridConfig::new(
            &PlannerConfig {
                timezone: Some("UTC".to_string()),
                ..PlannerConfig::default()
            },
            GridMetrics {
                column_width: 100.0,
                gutter_width: 50.0,
                header_height: 0.0,
            },
        )
        .unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    fn nine_to_ten() -> TimeRange {
        TimeRange::new(at(9, 0), at(10, 0)).unwrap()
    }

    /// Pointer y for a minute-of-day on the default grid (06:00 start, 60px/h).
    fn y_for(hour: u32, minute: u32) -> f32 {
        (hour as f32 - 6.0) * 60.0 + minute as f32
    }

    #[test]
    fn test_handle_rects_for_tall_block() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 60.0));
        let handles = HandleRects::for_timed_block(rect);

        assert_eq!(handles.top.height(), HANDLE_SIZE);
        assert_eq!(handles.bottom.bottom(), rect.bottom());
        assert_eq!(handles.get(ResizeHandle::Top).width(), 200.0);
    }

    #[test]
    fn test_short_block_keeps_drag_area() {
        let rect = Rect::from_min_size(Pos2::new(0.0, 0.0), Vec2::new(100.0, 20.0));
        let handles = HandleRects::for_timed_block(rect);

        assert_eq!(handles.top.height(), 5.0);
        assert_eq!(handles.hit_test(Pos2::new(50.0, 10.0)), None);
    }

    #[test]
    fn test_handle_hit_test() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 100.0), Vec2::new(200.0, 60.0));
        let handles = HandleRects::for_timed_block(rect);

        assert_eq!(handles.hit_test(Pos2::new(200.0, 102.0)), Some(ResizeHandle::Top));
        assert_eq!(handles.hit_test(Pos2::new(200.0, 158.0)), Some(ResizeHandle::Bottom));
        assert_eq!(handles.hit_test(Pos2::new(200.0, 130.0)), None);
        assert_eq!(handles.hit_test(Pos2::new(50.0, 102.0)), None);
    }

    #[test]
    fn test_bottom_edge_extends_end() {
        let range = resize_candidate(
            &nine_to_ten(),
            ResizeHandle::Bottom,
            Pos2::new(0.0, y_for(11, 8)),
            &grid(),
        )
        .unwrap();
        assert_eq!(range, TimeRange::new(at(9, 0), at(11, 15)).unwrap());
    }

    #[test]
    fn test_bottom_edge_crossing_start_is_held_one_interval_after() {
        let range = resize_candidate(
            &nine_to_ten(),
            ResizeHandle::Bottom,
            Pos2::new(0.0, y_for(8, 50)),
            &grid(),
        )
        .unwrap();
        assert_eq!(range, TimeRange::new(at(9, 0), at(9, 15)).unwrap());
    }

    #[test]
    fn test_top_edge_crossing_end_is_held_one_interval_before() {
        let range = resize_candidate(
            &nine_to_ten(),
            ResizeHandle::Top,
            Pos2::new(0.0, y_for(13, 0)),
            &grid(),
        )
        .unwrap();
        assert_eq!(range, TimeRange::new(at(9, 45), at(10, 0)).unwrap());
    }

    #[test]
    fn test_top_edge_moves_start_earlier() {
        let range = resize_candidate(
            &nine_to_ten(),
            ResizeHandle::Top,
            Pos2::new(0.0, y_for(7, 29)),
            &grid(),
        )
        .unwrap();
        assert_eq!(range.start_at, at(7, 30));
        assert_eq!(range.end_at, at(10, 0));
    }

    #[test_case(ResizeHandle::Top, -500.0, at(6, 0), at(10, 0); "top clamps to grid start")]
    #[test_case(ResizeHandle::Bottom, 5000.0, at(9, 0), at(22, 0); "bottom clamps to grid end")]
    fn test_resize_clamps_to_grid(
        handle: ResizeHandle,
        y: f32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) {
        let range = resize_candidate(&nine_to_ten(), handle, Pos2::new(0.0, y), &grid()).unwrap();
        assert_eq!(range, TimeRange::new(start, end).unwrap());
    }

    #[test]
    fn test_resize_never_shorter_than_interval() {
        let grid = grid();
        for y in (0..1000).step_by(7) {
            for handle in [ResizeHandle::Top, ResizeHandle::Bottom] {
                let range =
                    resize_candidate(&nine_to_ten(), handle, Pos2::new(0.0, y as f32), &grid)
                        .unwrap();
                assert!(range.duration() >= Duration::minutes(15));
            }
        }
    }
}
