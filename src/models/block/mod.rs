// Work block module
// The scheduled unit placed on the weekly planner grid

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Opaque, server-assigned block identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for BlockId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Classification tag. Only used for coloring, never for scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Meeting,
    #[default]
    Focus,
    Planning,
    Other,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Meeting => "meeting",
            BlockKind::Focus => "focus",
            BlockKind::Planning => "planning",
            BlockKind::Other => "other",
        }
    }

    /// Base fill color for blocks of this kind.
    pub fn color(&self) -> &'static str {
        match self {
            BlockKind::Meeting => "#4A90D9",
            BlockKind::Focus => "#3FA66B",
            BlockKind::Planning => "#D9A441",
            BlockKind::Other => "#8A8F98",
        }
    }
}

impl FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "meeting" => Ok(BlockKind::Meeting),
            "focus" => Ok(BlockKind::Focus),
            "planning" => Ok(BlockKind::Planning),
            "other" => Ok(BlockKind::Other),
            other => Err(format!("Unknown block type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Normal,
    High,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Normal => "normal",
            Importance::High => "high",
        }
    }

    /// Border accent used on top of the kind color.
    pub fn accent(&self) -> Option<&'static str> {
        match self {
            Importance::Low => None,
            Importance::Normal => None,
            Importance::High => Some("#D64545"),
        }
    }
}

impl FromStr for Importance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Importance::Low),
            "normal" => Ok(Importance::Normal),
            "high" => Ok(Importance::High),
            other => Err(format!("Unknown importance: {}", other)),
        }
    }
}

/// A validated `[start, end)` pair of absolute instants.
///
/// Doubles as the `{startAt, endAt}` patch sent to the store on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl TimeRange {
    /// Rejects empty and inverted ranges.
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> PlannerResult<Self> {
        let range = Self { start_at, end_at };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.end_at <= self.start_at {
            return Err(PlannerError::invalid_range(self.start_at, self.end_at));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }

    /// Touching endpoints do not count as overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_at < other.end_at && other.start_at < self.end_at
    }
}

/// Scheduled unit on the planner grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkBlock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    #[serde(default)]
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl WorkBlock {
    /// Create a new, not-yet-persisted block.
    ///
    /// # Examples
    /// ```
    /// use week_planner::models::block::WorkBlock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let block = WorkBlock::new("Deep work", start, start + Duration::hours(2)).unwrap();
    /// assert!(block.id.is_none());
    /// ```
    pub fn new(
        title: impl Into<String>,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    ) -> PlannerResult<Self> {
        let block = Self {
            id: None,
            title: title.into(),
            start_at,
            end_at,
            kind: BlockKind::default(),
            importance: Importance::default(),
            project_id: None,
            task_id: None,
            user_id: None,
            notes: None,
            location: None,
            description: None,
        };
        block.validate()?;
        Ok(block)
    }

    pub fn builder() -> WorkBlockBuilder {
        WorkBlockBuilder::new()
    }

    pub fn validate(&self) -> PlannerResult<()> {
        self.range().validate()
    }

    pub fn range(&self) -> TimeRange {
        TimeRange {
            start_at: self.start_at,
            end_at: self.end_at,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_at - self.start_at
    }

    /// Returns a copy carrying the given time range, same identity.
    pub fn with_range(&self, range: TimeRange) -> Self {
        let mut block = self.clone();
        block.start_at = range.start_at;
        block.end_at = range.end_at;
        block
    }
}

/// Builder for blocks with optional associations.
#[derive(Default)]
pub struct WorkBlockBuilder {
    id: Option<BlockId>,
    title: Option<String>,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
    kind: BlockKind,
    importance: Importance,
    project_id: Option<String>,
    task_id: Option<String>,
    user_id: Option<String>,
    notes: Option<String>,
    location: Option<String>,
    description: Option<String>,
}

impl WorkBlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    pub fn end(mut self, end_at: DateTime<Utc>) -> Self {
        self.end_at = Some(end_at);
        self
    }

    pub fn kind(mut self, kind: BlockKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> PlannerResult<WorkBlock> {
        let start_at = self.start_at.ok_or(PlannerError::MissingField("start"))?;
        let end_at = self.end_at.ok_or(PlannerError::MissingField("end"))?;

        let block = WorkBlock {
            id: self.id,
            title: self.title.unwrap_or_default(),
            start_at,
            end_at,
            kind: self.kind,
            importance: self.importance,
            project_id: self.project_id,
            task_id: self.task_id,
            user_id: self.user_id,
            notes: self.notes,
            location: self.location,
            description: self.description,
        };

        block.validate()?;
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_new_block_success() {
        let block = WorkBlock::new("Standup", at(9, 0), at(9, 15)).unwrap();
        assert_eq!(block.title, "Standup");
        assert!(block.id.is_none());
        assert_eq!(block.kind, BlockKind::Focus);
        assert_eq!(block.duration(), Duration::minutes(15));
    }

    #[test]
    fn test_new_block_rejects_inverted_range() {
        let result = WorkBlock::new("Standup", at(10, 0), at(9, 0));
        assert!(matches!(result, Err(PlannerError::InvalidRange { .. })));
    }

    #[test]
    fn test_new_block_rejects_empty_range() {
        let result = WorkBlock::new("Standup", at(10, 0), at(10, 0));
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_associations() {
        let block = WorkBlock::builder()
            .id(42_i64)
            .title("Sprint planning")
            .start(at(13, 0))
            .end(at(14, 30))
            .kind(BlockKind::Planning)
            .importance(Importance::High)
            .project("p-1")
            .task("t-9")
            .user("u-3")
            .location("Room 4")
            .build()
            .unwrap();

        assert_eq!(block.id, Some(BlockId::from(42_i64)));
        assert_eq!(block.project_id.as_deref(), Some("p-1"));
        assert_eq!(block.task_id.as_deref(), Some("t-9"));
        assert_eq!(block.user_id.as_deref(), Some("u-3"));
        assert_eq!(block.importance.accent(), Some("#D64545"));
    }

    #[test]
    fn test_builder_missing_start() {
        let result = WorkBlock::builder().title("x").end(at(9, 0)).build();
        assert!(matches!(result, Err(PlannerError::MissingField("start"))));
    }

    #[test]
    fn test_builder_missing_end() {
        let result = WorkBlock::builder().title("x").start(at(9, 0)).build();
        assert!(matches!(result, Err(PlannerError::MissingField("end"))));
    }

    #[test]
    fn test_range_overlap_excludes_touching() {
        let a = TimeRange::new(at(9, 0), at(10, 0)).unwrap();
        let b = TimeRange::new(at(10, 0), at(11, 0)).unwrap();
        let c = TimeRange::new(at(9, 30), at(10, 30)).unwrap();

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_with_range_keeps_identity() {
        let block = WorkBlock::builder()
            .id("abc")
            .start(at(9, 0))
            .end(at(10, 0))
            .build()
            .unwrap();
        let moved = block.with_range(TimeRange::new(at(11, 0), at(12, 0)).unwrap());

        assert_eq!(moved.id, block.id);
        assert_eq!(moved.start_at, at(11, 0));
        assert_eq!(moved.end_at, at(12, 0));
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [
            BlockKind::Meeting,
            BlockKind::Focus,
            BlockKind::Planning,
            BlockKind::Other,
        ] {
            assert_eq!(kind.as_str().parse::<BlockKind>().unwrap(), kind);
        }
        assert!("lunch".parse::<BlockKind>().is_err());
    }

    #[test]
    fn test_wire_shape_uses_camel_case_and_type() {
        let block = WorkBlock::builder()
            .id("7")
            .title("Review")
            .start(at(9, 0))
            .end(at(10, 0))
            .kind(BlockKind::Meeting)
            .build()
            .unwrap();

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["type"], "meeting");
        assert_eq!(json["startAt"], "2025-03-10T09:00:00Z");
        assert!(json.get("projectId").is_none());

        let parsed: WorkBlock = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, block);
    }
}
