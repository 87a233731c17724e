// Test fixtures - reusable test data
// Provides consistent blocks and grid configuration across test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use week_planner::models::block::{BlockKind, WorkBlock};
use week_planner::models::settings::PlannerConfig;
use week_planner::planner::{GridConfig, GridMetrics};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, March 10 2025
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// Instant on the week of [`monday`], `offset` days after it.
    pub fn at(offset: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10 + offset, hour, minute, 0)
            .unwrap()
    }
}

/// Grid configuration used by the integration tests: UTC, 06:00-22:00,
/// 60px per hour, 100px columns after a 50px gutter, no header.
pub mod grid {
    use super::*;

    pub fn config() -> PlannerConfig {
        PlannerConfig {
            timezone: Some("UTC".to_string()),
            ..PlannerConfig::default()
        }
    }

    pub fn utc() -> GridConfig {
        GridConfig::new(&config(), metrics()).unwrap()
    }

    pub fn metrics() -> GridMetrics {
        GridMetrics {
            column_width: 100.0,
            gutter_width: 50.0,
            header_height: 0.0,
        }
    }

    /// Pointer y for a wall-clock time on [`utc`].
    pub fn y(hour: u32, minute: u32) -> f32 {
        (hour as f32 - 6.0) * 60.0 + minute as f32
    }

    /// Pointer x inside the column `offset` days after Monday.
    pub fn x(offset: u32) -> f32 {
        50.0 + offset as f32 * 100.0 + 20.0
    }
}

/// Sample blocks for testing
pub mod blocks {
    use super::*;

    pub fn block(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> WorkBlock {
        WorkBlock::new(title, start, end).unwrap()
    }

    /// A typical Monday: standup, an overlapping review and back-to-back focus time.
    pub fn busy_monday() -> Vec<WorkBlock> {
        vec![
            WorkBlock::builder()
                .title("Standup")
                .start(dates::at(0, 9, 0))
                .end(dates::at(0, 10, 0))
                .kind(BlockKind::Meeting)
                .build()
                .unwrap(),
            WorkBlock::builder()
                .title("Review")
                .start(dates::at(0, 9, 30))
                .end(dates::at(0, 10, 30))
                .kind(BlockKind::Meeting)
                .build()
                .unwrap(),
            block("Focus", dates::at(0, 10, 0), dates::at(0, 11, 0)),
        ]
    }
}
