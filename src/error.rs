//! Error taxonomy for the planner engine.
//!
//! Geometry and snapping never fail; out-of-bounds positions are clamped.
//! Everything that reaches the caller is listed here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::block::BlockId;

pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid time range: end {end} is not after start {start}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("failed to commit block {id}")]
    CommitFailure {
        id: BlockId,
        #[source]
        source: anyhow::Error,
    },

    #[error("a drag or resize session is already active")]
    SessionActive,

    #[error("block {id} still has a commit in flight")]
    CommitPending { id: BlockId },

    #[error("no commit is pending for block {id}")]
    NoPendingCommit { id: BlockId },

    #[error("work block {0} is required")]
    MissingField(&'static str),

    #[error("block has no id yet and cannot be moved")]
    MissingBlockId,

    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

impl PlannerError {
    /// Builds an `InvalidRange` for the given pair.
    pub fn invalid_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::InvalidRange { start, end }
    }
}
