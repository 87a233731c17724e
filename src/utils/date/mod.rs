// Date utility functions
// Week window calculation and grid timezone resolution

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{PlannerError, PlannerResult};

pub const DAYS_IN_WEEK: usize = 7;

/// Timezone the week grid is drawn in. Stored instants are always UTC;
/// the zone only decides which calendar day and wall-clock time a block lands on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridZone {
    #[default]
    Local,
    Named(Tz),
}

impl GridZone {
    /// `None` selects the system local zone.
    pub fn parse(name: Option<&str>) -> PlannerResult<Self> {
        match name {
            None => Ok(GridZone::Local),
            Some(name) => parse_tz(name).map(GridZone::Named),
        }
    }

    pub fn name(&self) -> String {
        match self {
            GridZone::Local => "Local".to_string(),
            GridZone::Named(tz) => tz.name().to_string(),
        }
    }

    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            GridZone::Local => instant.with_timezone(&Local).naive_local(),
            GridZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    /// Minutes since local midnight of the instant's own calendar day.
    pub fn minute_of_day(&self, instant: DateTime<Utc>) -> f32 {
        let local = self.local_datetime(instant);
        (local - midnight(local.date())).num_seconds() as f32 / 60.0
    }

    /// Wall-clock to instant. Ambiguous times take the earlier reading,
    /// times inside a DST gap resolve to `None`.
    pub fn resolve(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            GridZone::Local => Local
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            GridZone::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }

    /// Like [`GridZone::resolve`] but steps forward out of a DST gap.
    pub fn resolve_forward(&self, local: NaiveDateTime) -> DateTime<Utc> {
        // Real-world gaps are at most two hours.
        for step in 0..=8 {
            if let Some(instant) = self.resolve(local + Duration::minutes(15 * step)) {
                return instant;
            }
        }
        Utc.from_utc_datetime(&local)
    }
}

pub fn parse_tz(name: &str) -> PlannerResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| PlannerError::UnknownTimezone(name.to_string()))
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn is_same_day(zone: GridZone, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    zone.local_date(a) == zone.local_date(b)
}

pub fn start_of_day(zone: GridZone, date: NaiveDate) -> DateTime<Utc> {
    zone.resolve_forward(midnight(date))
}

/// Last millisecond before the next local midnight.
pub fn end_of_day(zone: GridZone, date: NaiveDate) -> DateTime<Utc> {
    start_of_day(zone, date + Duration::days(1)) - Duration::milliseconds(1)
}

/// Monday-start seven-day window, used both to query the store and to build the grid columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRange {
    pub first_day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekRange {
    /// Window for the week containing `date`: Monday 00:00:00.000 through Sunday 23:59:59.999.
    pub fn containing(date: NaiveDate, zone: GridZone) -> Self {
        let first_day = week_start(date);
        let last_day = first_day + Duration::days(DAYS_IN_WEEK as i64 - 1);
        Self {
            first_day,
            start: start_of_day(zone, first_day),
            end: end_of_day(zone, last_day),
        }
    }

    pub fn containing_instant(instant: DateTime<Utc>, zone: GridZone) -> Self {
        Self::containing(zone.local_date(instant), zone)
    }

    pub fn days(&self) -> Vec<NaiveDate> {
        (0..DAYS_IN_WEEK as i64)
            .map(|offset| self.first_day + Duration::days(offset))
            .collect()
    }

    pub fn day(&self, index: usize) -> NaiveDate {
        self.first_day + Duration::days(index.min(DAYS_IN_WEEK - 1) as i64)
    }

    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_day).num_days();
        (0..DAYS_IN_WEEK as i64)
            .contains(&offset)
            .then_some(offset as usize)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    pub fn next(&self, zone: GridZone) -> Self {
        Self::containing(self.first_day + Duration::days(DAYS_IN_WEEK as i64), zone)
    }

    pub fn previous(&self, zone: GridZone) -> Self {
        Self::containing(self.first_day - Duration::days(DAYS_IN_WEEK as i64), zone)
    }
}
