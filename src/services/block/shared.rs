use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::block::BlockId;

pub(crate) fn to_utc_datetime(value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

pub(crate) fn parse_enum<T>(value: String) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(|e| {
        rusqlite::Error::ToSqlConversionFailure(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })
}

/// Row id behind a block id. Ids from this store are always integers.
pub(crate) fn row_id(id: &BlockId) -> Result<i64> {
    id.as_str()
        .parse::<i64>()
        .with_context(|| format!("Work block id {} is not a database id", id))
}

/// Stored timestamp format. Fixed width and always UTC so that text
/// comparison in SQL matches instant order.
pub(crate) fn to_db_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
