use serde::{Deserialize, Serialize};

use heatzones_core::{GeoBounds, GeoPoint};

/// One capture position: the device frame centered on `center` nominally
/// shows `bounds`. Identified by `(row, col)`; immutable once planned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    pub center: GeoPoint,
    pub bounds: GeoBounds,
}

/// The full row-major capture plan plus the pan step between cells.
///
/// `step_x_px`/`step_y_px` are the pixel pan distances the sequencer must
/// issue between horizontally/vertically adjacent cells; `step_lng_deg`/
/// `step_lat_deg` are the same steps expressed in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureGrid {
    pub cells: Vec<GridCell>,
    pub rows: u32,
    pub cols: u32,
    pub step_x_px: u32,
    pub step_y_px: u32,
    pub step_lng_deg: f64,
    pub step_lat_deg: f64,
}

impl CaptureGrid {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    /// Union of all cell bounds; the planned coverage envelope.
    pub fn coverage(&self) -> Option<GeoBounds> {
        let mut iter = self.cells.iter();
        let first = iter.next()?.bounds;
        Some(iter.fold(first, |acc, cell| acc.union(&cell.bounds)))
    }
}
