//! Capture grid planner.
//!
//! Converts a target geographic bounding box plus the device screen
//! geometry into an ordered row-major grid of capture cells, one per
//! device frame, with the pixel pan distance between neighboring cells.
//! The sequencer and the stitcher both consume the step distances from
//! here so all three stages share the same overlap arithmetic.

mod planner;
mod types;

pub use planner::{GridPlanner, GridPlanError};
pub use types::{CaptureGrid, GridCell};
