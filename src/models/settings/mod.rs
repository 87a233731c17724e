// Settings module
// Recognized planner configuration surface

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};
use crate::utils::date::{parse_tz, GridZone};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    TwelveHour,
    #[default]
    #[serde(rename = "24h")]
    TwentyFourHour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub pixels_per_hour: f32,
    pub snap_interval_minutes: u32,
    pub min_block_height_px: f32,
    /// Pointer travel (px) below which a press-release is a click.
    pub drag_dead_zone_px: f32,
    /// IANA zone for the grid columns; system local when unset.
    pub timezone: Option<String>,
    /// Display-only label columns.
    pub secondary_timezones: Vec<String>,
    pub time_format: TimeFormat,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 22,
            pixels_per_hour: 60.0,
            snap_interval_minutes: 15,
            min_block_height_px: 40.0,
            drag_dead_zone_px: 4.0,
            timezone: None,
            secondary_timezones: Vec::new(),
            time_format: TimeFormat::TwentyFourHour,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> PlannerResult<()> {
        if self.start_hour >= self.end_hour {
            return Err(PlannerError::InvalidConfig(format!(
                "start_hour ({}) must be before end_hour ({})",
                self.start_hour, self.end_hour
            )));
        }

        if self.end_hour > 24 {
            return Err(PlannerError::InvalidConfig(format!(
                "end_hour ({}) must not exceed 24",
                self.end_hour
            )));
        }

        if !(self.pixels_per_hour > 0.0) {
            return Err(PlannerError::InvalidConfig(
                "pixels_per_hour must be positive".to_string(),
            ));
        }

        if !(1..=60).contains(&self.snap_interval_minutes) {
            return Err(PlannerError::InvalidConfig(format!(
                "snap_interval_minutes ({}) must be between 1 and 60",
                self.snap_interval_minutes
            )));
        }

        if self.min_block_height_px < 0.0 || self.drag_dead_zone_px < 0.0 {
            return Err(PlannerError::InvalidConfig(
                "min_block_height_px and drag_dead_zone_px must not be negative".to_string(),
            ));
        }

        self.zone()?;
        for name in &self.secondary_timezones {
            parse_tz(name)?;
        }

        Ok(())
    }

    pub fn zone(&self) -> PlannerResult<GridZone> {
        GridZone::parse(self.timezone.as_deref())
    }
}
