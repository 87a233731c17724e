//! Greedy interval partitioning of one day's blocks into display lanes.
//!
//! Blocks are visited by ascending start (stable, so equal starts keep input
//! order) and placed in the first lane whose last block has already ended.
//! Back-to-back blocks share a lane. The lane count is only known after the
//! whole day is placed, so `total_lanes` is broadcast at the end.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::block::{TimeRange, WorkBlock};

/// Anything with a half-open time span.
pub trait Interval {
    fn start_at(&self) -> DateTime<Utc>;
    fn end_at(&self) -> DateTime<Utc>;
}

impl Interval for WorkBlock {
    fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }
}

impl Interval for TimeRange {
    fn start_at(&self) -> DateTime<Utc> {
        self.start_at
    }

    fn end_at(&self) -> DateTime<Utc> {
        self.end_at
    }
}

/// Lane of the input item at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneAssignment {
    pub index: usize,
    pub lane: usize,
    pub total_lanes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneRecord {
    pub block: WorkBlock,
    pub lane: usize,
    pub total_lanes: usize,
}

/// Assigns lanes and returns them in visiting order (start ascending, ties by input order).
pub fn assign_lanes<T: Interval>(items: &[T]) -> Vec<LaneAssignment> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    // `sort_by_key` is stable.
    order.sort_by_key(|&index| items[index].start_at());

    let mut lane_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut assignments = Vec::with_capacity(items.len());

    for index in order {
        let item = &items[index];
        let lane = match lane_ends.iter().position(|end| *end <= item.start_at()) {
            Some(free) => {
                lane_ends[free] = item.end_at();
                free
            }
            None => {
                lane_ends.push(item.end_at());
                lane_ends.len() - 1
            }
        };
        assignments.push(LaneAssignment {
            index,
            lane,
            total_lanes: 0,
        });
    }

    let total_lanes = lane_ends.len();
    for assignment in &mut assignments {
        assignment.total_lanes = total_lanes;
    }

    log::trace!(
        "assigned {} blocks to {} lanes",
        assignments.len(),
        total_lanes
    );
    assignments
}

/// Lane records for one calendar day's blocks.
pub fn lane_records(blocks: &[WorkBlock]) -> Vec<LaneRecord> {
    assign_lanes(blocks)
        .into_iter()
        .map(|assignment| LaneRecord {
            block: blocks[assignment.index].clone(),
            lane: assignment.lane,
            total_lanes: assignment.total_lanes,
        })
        .collect()
}

/// Largest number of items open at the same instant. Touching endpoints do not overlap.
pub fn max_concurrency<T: Interval>(items: &[T]) -> usize {
    let mut edges: Vec<(DateTime<Utc>, i32)> = items
        .iter()
        .flat_map(|item| [(item.start_at(), 1), (item.end_at(), -1)])
        .collect();
    // Ends sort before starts at the same instant.
    edges.sort();

    let mut open = 0i32;
    let mut peak = 0i32;
    for (_, delta) in edges {
        open += delta;
        peak = peak.max(open);
    }
    peak as usize
}
