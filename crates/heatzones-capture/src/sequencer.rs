use std::time::{Duration, Instant};

use image::RgbImage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use heatzones_core::{GeoPoint, MapProjection, ScreenGeometry};
use heatzones_grid::CaptureGrid;

use crate::device::MapDevice;

/// One successfully captured grid cell.
#[derive(Clone, Debug)]
pub struct CapturedFrame {
    pub row: u32,
    pub col: u32,
    pub image: RgbImage,
}

/// All frames obtained in one pass over the grid. Sparse: cells whose
/// capture failed are simply absent.
#[derive(Clone, Debug)]
pub struct CaptureRun {
    pub frames: Vec<CapturedFrame>,
    pub rows: u32,
    pub cols: u32,
}

impl CaptureRun {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, row: u32, col: u32) -> Option<&CapturedFrame> {
        self.frames.iter().find(|f| f.row == row && f.col == col)
    }

    /// Grid positions that did not yield a frame.
    pub fn missing(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.frame(row, col).is_none() {
                    out.push((row, col));
                }
            }
        }
        out
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SequencerParams {
    /// Wait after every pan before the next action. Panning triggers
    /// asynchronous re-rendering on the device; capturing too early yields
    /// a blurred or half-drawn frame, so this is a hard timing contract.
    pub settle: Duration,
    /// Stop refining the approach once within this many pixels of the
    /// grid origin.
    pub approach_tolerance_px: u32,
    /// Overall budget for one capture pass. `None` disables the check.
    pub deadline: Option<Duration>,
}

impl Default for SequencerParams {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(1),
            approach_tolerance_px: 50,
            deadline: None,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("device rejected an approach pan of ({dx}, {dy}) px")]
    ApproachFailed { dx: i32, dy: i32 },
    #[error("capture cycle exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

/// Drives a [`MapDevice`] through a planned grid, row-major, left to
/// right, returning to the first column before descending one row.
///
/// Diagonal pans are never issued: some map apps misinterpret them as
/// rotate/tilt gestures, so movement is decomposed per axis.
#[derive(Clone, Copy, Debug)]
pub struct Sequencer {
    pub params: SequencerParams,
    pub screen: ScreenGeometry,
    pub projection: MapProjection,
}

impl Sequencer {
    pub fn new(params: SequencerParams, screen: ScreenGeometry, projection: MapProjection) -> Self {
        Self {
            params,
            screen,
            projection,
        }
    }

    /// Walk the grid from the device's current live position `start`.
    ///
    /// Per-cell capture failures are logged and skipped; the run only
    /// fails if the grid origin cannot be reached or the deadline passes.
    pub fn run<D: MapDevice>(
        &self,
        device: &mut D,
        grid: &CaptureGrid,
        start: GeoPoint,
    ) -> Result<CaptureRun, CaptureError> {
        let started = Instant::now();
        let mut frames = Vec::with_capacity(grid.len());

        let Some(origin) = grid.cell(0, 0) else {
            return Ok(CaptureRun {
                frames,
                rows: grid.rows,
                cols: grid.cols,
            });
        };

        self.approach(device, start, origin.center, started)?;

        let step_x = grid.step_x_px as i32;
        let step_y = grid.step_y_px as i32;

        for row in 0..grid.rows {
            for col in 0..grid.cols {
                self.check_deadline(started)?;

                match device.capture() {
                    Some(image) => {
                        debug!("captured cell ({row}, {col})");
                        frames.push(CapturedFrame { row, col, image });
                    }
                    // Non-fatal: the cell stays absent and the walk
                    // continues, no retry at this level.
                    None => warn!("capture failed for cell ({row}, {col}), skipping"),
                }

                if col + 1 < grid.cols {
                    self.pan_best_effort(device, step_x, 0, row, col);
                }
            }

            if row + 1 < grid.rows {
                // Back to column 0 one step at a time, then one row down.
                for col in (1..grid.cols).rev() {
                    self.check_deadline(started)?;
                    self.pan_best_effort(device, -step_x, 0, row, col);
                }
                self.check_deadline(started)?;
                self.pan_best_effort(device, 0, step_y, row, 0);
            }
        }

        info!(
            "capture pass finished: {}/{} cells in {:.1}s",
            frames.len(),
            grid.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(CaptureRun {
            frames,
            rows: grid.rows,
            cols: grid.cols,
        })
    }

    /// Multi-step pan from `start` to `target`, one axis at a time.
    ///
    /// Long gestures overshoot or fail gesture recognition, so every leg
    /// is capped at one third of the shorter screen dimension and the
    /// remaining offset is re-derived until it falls inside the tolerance.
    fn approach<D: MapDevice>(
        &self,
        device: &mut D,
        start: GeoPoint,
        target: GeoPoint,
        started: Instant,
    ) -> Result<(), CaptureError> {
        let cap = (self.screen.width.min(self.screen.height) / 3).max(1) as i32;
        let tolerance = self.params.approach_tolerance_px as i32;
        let (mut dx, mut dy) = self.projection.geo_to_pixel(target, start);
        debug!("approaching grid origin, offset ({dx}, {dy}) px, leg cap {cap} px");

        while dx.abs() > tolerance {
            self.check_deadline(started)?;
            let leg = dx.clamp(-cap, cap);
            if !device.pan(leg, 0) {
                return Err(CaptureError::ApproachFailed { dx: leg, dy: 0 });
            }
            dx -= leg;
            self.settle();
        }
        while dy.abs() > tolerance {
            self.check_deadline(started)?;
            let leg = dy.clamp(-cap, cap);
            if !device.pan(0, leg) {
                return Err(CaptureError::ApproachFailed { dx: 0, dy: leg });
            }
            dy -= leg;
            self.settle();
        }
        Ok(())
    }

    /// In-cycle pans are best effort: a refused gesture shifts the frame
    /// alignment but a misplaced tile beats an aborted cycle.
    fn pan_best_effort<D: MapDevice>(&self, device: &mut D, dx: i32, dy: i32, row: u32, col: u32) {
        if !device.pan(dx, dy) {
            warn!("pan ({dx}, {dy}) rejected near cell ({row}, {col}); composite may drift");
        }
        self.settle();
    }

    fn settle(&self) {
        if !self.params.settle.is_zero() {
            std::thread::sleep(self.params.settle);
        }
    }

    fn check_deadline(&self, started: Instant) -> Result<(), CaptureError> {
        if let Some(deadline) = self.params.deadline {
            if started.elapsed() > deadline {
                return Err(CaptureError::DeadlineExceeded(deadline));
            }
        }
        Ok(())
    }
}
