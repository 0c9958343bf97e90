//! Navigation sequencer.
//!
//! Walks a planned [`heatzones_grid::CaptureGrid`] on a live device,
//! issuing relative pan gestures and frame captures through the narrow
//! [`MapDevice`] seam. Individual capture failures are tolerated (the grid
//! is allowed to come back sparse); only failing to reach the grid origin
//! or blowing the cycle deadline aborts a run.

mod device;
mod sequencer;

pub use device::MapDevice;
pub use sequencer::{CaptureError, CaptureRun, CapturedFrame, Sequencer, SequencerParams};
