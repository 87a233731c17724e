// Week Planner Library
// Lane layout, time geometry and drag/resize interaction for a weekly block planner

pub mod error;
pub mod models;
pub mod planner;
pub mod services;
pub mod utils;

pub use error::{PlannerError, PlannerResult};
