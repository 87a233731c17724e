//! Hour labels for the time gutter, with optional secondary timezone columns.
//! Display only: stored instants are never affected.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike};
use serde::Serialize;

use super::geometry::GridConfig;
use crate::models::settings::TimeFormat;
use crate::utils::date::{midnight, WeekRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneLabel {
    pub zone: String,
    pub label: String,
    /// Calendar-day difference from the grid day (`-1`, `0`, `+1`).
    pub day_offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourLabel {
    pub hour: u32,
    pub y: f32,
    pub primary: String,
    pub secondary: Vec<ZoneLabel>,
}

pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>, format: TimeFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
        TimeFormat::TwelveHour if time.minute() == 0 => time.format("%-I %p").to_string(),
        TimeFormat::TwelveHour => time.format("%-I:%M %p").to_string(),
    }
}

/// One label per grid hour on `date`. Hours that do not exist locally
/// (DST gap) are skipped.
pub fn hour_labels(date: NaiveDate, grid: &GridConfig) -> Vec<HourLabel> {
    let geometry = &grid.geometry;
    (geometry.start_hour..geometry.end_hour)
        .filter_map(|hour| {
            let instant = grid
                .zone
                .resolve(midnight(date) + Duration::hours(hour as i64))?;
            let local_minutes = (hour * 60) as f32;

            let secondary = grid
                .secondary_zones
                .iter()
                .map(|tz| {
                    let there = instant.with_timezone(tz);
                    ZoneLabel {
                        zone: tz.name().to_string(),
                        label: format_time(&there, grid.time_format),
                        day_offset: (there.date_naive() - date).num_days(),
                    }
                })
                .collect();

            Some(HourLabel {
                hour,
                y: grid.y_for_minute_of_day(local_minutes),
                primary: format_primary(hour, grid.time_format),
                secondary,
            })
        })
        .collect()
}

/// Gutter labels for one day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGutter {
    pub date: NaiveDate,
    pub labels: Vec<HourLabel>,
}

/// Gutter labels for each day of `week`. Secondary labels shift on days
/// where either zone changes its offset.
pub fn week_gutter(week: &WeekRange, grid: &GridConfig) -> Vec<DayGutter> {
    week.days()
        .into_iter()
        .map(|date| DayGutter {
            date,
            labels: hour_labels(date, grid),
        })
        .collect()
}

fn format_primary(hour: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwentyFourHour => format!("{:02}:00", hour),
        TimeFormat::TwelveHour => {
            let suffix = if hour < 12 { "AM" } else { "PM" };
            let display = match hour % 12 {
                0 => 12,
                h => h,
            };
            format!("{} {}", display, suffix)
        }
    }
}
