//! Time <-> pixel mapping for the daily grid window.
//!
//! `TimeGeometry` is pure arithmetic over `start_hour`, `end_hour` and
//! `pixels_per_hour`. `GridConfig` adds the measured column metrics so layout
//! and pointer handling share one explicit description of the grid instead of
//! querying rendered widgets.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use egui::{Pos2, Rect, Vec2};

use crate::error::{PlannerError, PlannerResult};
use crate::models::settings::{PlannerConfig, TimeFormat};
use crate::utils::date::{parse_tz, GridZone, DAYS_IN_WEEK};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGeometry {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f32,
}

impl TimeGeometry {
    pub fn new(start_hour: u32, end_hour: u32, pixels_per_hour: f32) -> Self {
        Self {
            start_hour,
            end_hour,
            pixels_per_hour,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.start_hour, config.end_hour, config.pixels_per_hour)
    }

    /// Vertical offset of a wall-clock time. Times outside the window are
    /// not clamped here.
    pub fn time_to_y(&self, time: NaiveTime) -> f32 {
        let minutes = time.num_seconds_from_midnight() as f32 / 60.0;
        self.minutes_to_y(minutes - self.start_minutes())
    }

    /// Pins a wall-clock time into `[start_hour, end_hour]`.
    pub fn clamp_to_window(&self, time: NaiveTime) -> NaiveTime {
        let start = NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        match NaiveTime::from_hms_opt(self.end_hour, 0, 0) {
            Some(end) => time.clamp(start, end),
            // end_hour 24: every time of day is before the end.
            None => time.max(start),
        }
    }

    pub fn minutes_to_y(&self, minutes_from_start: f32) -> f32 {
        minutes_from_start / 60.0 * self.pixels_per_hour
    }

    /// Inverse of [`TimeGeometry::time_to_y`], unrounded.
    pub fn y_to_minutes_from_start(&self, y: f32) -> f32 {
        y / self.pixels_per_hour * 60.0
    }

    pub fn duration_to_height(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f32 {
        let hours = (end - start).num_seconds() as f32 / 3600.0;
        hours.max(0.0) * self.pixels_per_hour
    }

    pub fn start_minutes(&self) -> f32 {
        (self.start_hour * 60) as f32
    }

    pub fn end_minutes(&self) -> f32 {
        (self.end_hour * 60) as f32
    }

    pub fn grid_height(&self) -> f32 {
        self.minutes_to_y(self.end_minutes() - self.start_minutes())
    }
}

/// Round to the nearest multiple of `interval_minutes`.
pub fn snap_minutes(minutes: f32, interval_minutes: u32) -> f32 {
    let interval = interval_minutes.max(1) as f32;
    (minutes / interval).round() * interval
}

/// Host-measured pixel metrics of the rendered week grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    pub column_width: f32,
    /// Width of the time-label gutter left of the first day column.
    pub gutter_width: f32,
    /// Height of the day-header row above the first hour.
    pub header_height: f32,
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self {
            column_width: 120.0,
            gutter_width: 50.0,
            header_height: 0.0,
        }
    }
}

/// Everything layout and interaction need to know about the grid for one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub geometry: TimeGeometry,
    pub zone: GridZone,
    pub snap_interval_minutes: u32,
    pub min_block_height_px: f32,
    pub drag_dead_zone_px: f32,
    pub time_format: TimeFormat,
    pub secondary_zones: Vec<Tz>,
    pub metrics: GridMetrics,
}

impl GridConfig {
    pub fn new(config: &PlannerConfig, metrics: GridMetrics) -> PlannerResult<Self> {
        config.validate()?;
        if !(metrics.column_width > 0.0) {
            return Err(PlannerError::InvalidConfig(
                "column_width must be positive".to_string(),
            ));
        }

        Ok(Self {
            geometry: TimeGeometry::from_config(config),
            zone: config.zone()?,
            snap_interval_minutes: config.snap_interval_minutes,
            min_block_height_px: config.min_block_height_px,
            drag_dead_zone_px: config.drag_dead_zone_px,
            time_format: config.time_format,
            secondary_zones: config
                .secondary_timezones
                .iter()
                .map(|name| parse_tz(name))
                .collect::<PlannerResult<Vec<_>>>()?,
            metrics,
        })
    }

    /// Day column under a horizontal pixel offset, clamped to the week.
    pub fn column_at(&self, x: f32) -> usize {
        let raw = ((x - self.metrics.gutter_width) / self.metrics.column_width).floor();
        raw.clamp(0.0, (DAYS_IN_WEEK - 1) as f32) as usize
    }

    pub fn column_left(&self, index: usize) -> f32 {
        self.metrics.gutter_width + index as f32 * self.metrics.column_width
    }

    /// Minute-of-day under a vertical pixel offset, unrounded and unclamped.
    pub fn minute_of_day_at(&self, y: f32) -> f32 {
        self.geometry.start_minutes()
            + self
                .geometry
                .y_to_minutes_from_start(y - self.metrics.header_height)
    }

    /// Pixel offset of a minute-of-day, header included.
    pub fn y_for_minute_of_day(&self, minute_of_day: f32) -> f32 {
        self.metrics.header_height
            + self
                .geometry
                .minutes_to_y(minute_of_day - self.geometry.start_minutes())
    }

    /// Rectangle covering all seven day columns of the time grid.
    pub fn grid_rect(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.metrics.gutter_width, self.metrics.header_height),
            Vec2::new(
                self.metrics.column_width * DAYS_IN_WEEK as f32,
                self.geometry.grid_height(),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn geometry() -> TimeGeometry {
        TimeGeometry::new(6, 22, 60.0)
    }

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test_case(t(6, 0), 0.0; "grid start")]
    #[test_case(t(8, 0), 120.0; "two hours in")]
    #[test_case(t(9, 30), 210.0; "half hour")]
    #[test_case(t(21, 45), 945.0; "near grid end")]
    fn test_time_to_y(time: NaiveTime, expected: f32) {
        assert_eq!(geometry().time_to_y(time), expected);
    }

    #[test]
    fn test_time_to_y_counts_seconds() {
        let time = NaiveTime::from_hms_opt(6, 0, 30).unwrap();
        assert_eq!(geometry().time_to_y(time), 0.5);
    }

    #[test_case(t(5, 0), t(6, 0); "before start")]
    #[test_case(t(9, 45), t(9, 45); "inside")]
    #[test_case(t(23, 10), t(22, 0); "after end")]
    fn test_clamp_to_window(time: NaiveTime, expected: NaiveTime) {
        assert_eq!(geometry().clamp_to_window(time), expected);
    }

    #[test]
    fn test_clamp_to_window_when_grid_runs_to_midnight() {
        let g = TimeGeometry::new(8, 24, 60.0);
        assert_eq!(g.clamp_to_window(t(23, 30)), t(23, 30));
        assert_eq!(g.clamp_to_window(t(7, 0)), t(8, 0));
    }

    #[test]
    fn test_time_before_grid_is_negative() {
        assert_eq!(geometry().time_to_y(t(5, 0)), -60.0);
    }

    #[test]
    fn test_y_to_minutes_is_inverse() {
        let g = TimeGeometry::new(6, 22, 48.0);
        for minutes in [0.0_f32, 15.0, 37.5, 600.0] {
            let y = g.minutes_to_y(minutes);
            assert!((g.y_to_minutes_from_start(y) - minutes).abs() < 1e-3);
        }
    }

    #[test]
    fn test_duration_to_height() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        assert_eq!(geometry().duration_to_height(start, end), 60.0);
        assert_eq!(geometry().duration_to_height(end, start), 0.0);
    }

    #[test]
    fn test_grid_height() {
        assert_eq!(geometry().grid_height(), 16.0 * 60.0);
    }

    #[test_case(852.0, 15, 855.0; "rounds up past midpoint")]
    #[test_case(847.0, 15, 840.0; "rounds down below midpoint")]
    #[test_case(855.0, 15, 855.0; "already snapped")]
    #[test_case(7.4, 5, 5.0; "five minute grid")]
    fn test_snap_minutes(raw: f32, interval: u32, expected: f32) {
        assert_eq!(snap_minutes(raw, interval), expected);
    }

    #[test]
    fn test_snap_is_idempotent() {
        for raw in [0.0_f32, 13.0, 22.6, 599.9, 1439.0] {
            let once = snap_minutes(raw, 15);
            assert_eq!(snap_minutes(once, 15), once);
        }
    }

    fn grid() -> GridConfig {
        GridConfig::new(
            &PlannerConfig::default(),
            GridMetrics {
                column_width: 100.0,
                gutter_width: 50.0,
                header_height: 20.0,
            },
        )
        .unwrap()
    }

    #[test_case(0.0, 0; "inside gutter clamps to first day")]
    #[test_case(149.9, 0; "first column")]
    #[test_case(150.0, 1; "second column boundary")]
    #[test_case(749.0, 6; "last column")]
    #[test_case(5000.0, 6; "far right clamps to last day")]
    fn test_column_at(x: f32, expected: usize) {
        assert_eq!(grid().column_at(x), expected);
    }

    #[test]
    fn test_minute_of_day_accounts_for_header() {
        let grid = grid();
        assert_eq!(grid.minute_of_day_at(20.0), 360.0);
        assert_eq!(grid.minute_of_day_at(80.0), 420.0);
        assert_eq!(grid.y_for_minute_of_day(420.0), 80.0);
    }

    #[test]
    fn test_grid_rejects_zero_column_width() {
        let result = GridConfig::new(
            &PlannerConfig::default(),
            GridMetrics {
                column_width: 0.0,
                ..GridMetrics::default()
            },
        );
        assert!(matches!(result, Err(PlannerError::InvalidConfig(_))));
    }

    #[test]
    fn test_grid_rect() {
        let rect = grid().grid_rect();
        assert_eq!(rect.min, Pos2::new(50.0, 20.0));
        assert_eq!(rect.width(), 700.0);
        assert_eq!(rect.height(), 960.0);
    }
}
