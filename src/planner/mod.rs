// Weekly planner engine
// Geometry, lane layout and pointer interaction for the week grid

pub mod drag;
pub mod geometry;
pub mod interaction;
pub mod lanes;
pub mod layout;
pub mod resize;
pub mod timezones;

pub use drag::{DragMode, DragSession};
pub use geometry::{GridConfig, GridMetrics, TimeGeometry};
pub use interaction::{CommitRequest, InteractionState, PointerInteractionController, PointerOutcome};
pub use lanes::{assign_lanes, max_concurrency, LaneRecord};
pub use layout::{BlockPlacement, DayLayout, GridLayoutEngine, WeekLayout};
pub use resize::{HandleRects, ResizeHandle};
pub use timezones::{hour_labels, week_gutter, DayGutter, HourLabel};
