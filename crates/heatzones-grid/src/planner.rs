use log::{debug, info};

use heatzones_core::{ConfigError, GeoBounds, GeoPoint, MapProjection, ScreenGeometry};

use crate::types::{CaptureGrid, GridCell};

#[derive(thiserror::Error, Debug)]
pub enum GridPlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("pan step collapsed to zero pixels (display {width}x{height}, overlap {overlap})")]
    ZeroPanStep {
        width: u32,
        height: u32,
        overlap: f64,
    },
}

/// Plans the capture grid for one harvesting cycle.
#[derive(Clone, Copy, Debug)]
pub struct GridPlanner {
    pub screen: ScreenGeometry,
    pub overlap: f64,
    pub projection: MapProjection,
}

impl GridPlanner {
    pub fn new(screen: ScreenGeometry, overlap: f64, projection: MapProjection) -> Self {
        Self {
            screen,
            overlap,
            projection,
        }
    }

    /// Lay a row-major grid of capture cells over `target`.
    ///
    /// Grid sizing uses `ceil(span / step) + 1` per axis so the union of
    /// cell bounds strictly covers the box even when the span does not
    /// divide evenly; the final row/column may be redundant overlap.
    pub fn plan(&self, target: GeoBounds) -> Result<CaptureGrid, GridPlanError> {
        target.validate()?;
        self.screen.validate()?;
        if !(self.overlap > 0.0 && self.overlap < 1.0) {
            return Err(ConfigError::InvalidOverlap(self.overlap).into());
        }

        let display_w = self.screen.display_width();
        let display_h = self.screen.display_height();

        let step_x_px = (display_w as f64 * (1.0 - self.overlap)).floor() as u32;
        let step_y_px = (display_h as f64 * (1.0 - self.overlap)).floor() as u32;
        if step_x_px == 0 || step_y_px == 0 {
            return Err(GridPlanError::ZeroPanStep {
                width: display_w,
                height: display_h,
                overlap: self.overlap,
            });
        }

        let step_lng_deg = step_x_px as f64 * self.projection.lng_per_pixel();
        let step_lat_deg = step_y_px as f64 * self.projection.lat_per_pixel();

        // Geographic footprint of one full displayable frame.
        let frame_lng_deg = display_w as f64 * self.projection.lng_per_pixel();
        let frame_lat_deg = display_h as f64 * self.projection.lat_per_pixel();

        let cols = ((target.lng_span() / step_lng_deg).ceil() as u32 + 1).max(1);
        let rows = ((target.lat_span() / step_lat_deg).ceil() as u32 + 1).max(1);
        info!("planned capture grid: {rows} rows x {cols} cols");

        let mut cells = Vec::with_capacity((rows * cols) as usize);
        for row in 0..rows {
            for col in 0..cols {
                let center = GeoPoint::new(
                    target.north - (row as f64 + 0.5) * step_lat_deg,
                    target.west + (col as f64 + 0.5) * step_lng_deg,
                );
                let bounds = GeoBounds::new(
                    center.lat + frame_lat_deg / 2.0,
                    center.lat - frame_lat_deg / 2.0,
                    center.lng + frame_lng_deg / 2.0,
                    center.lng - frame_lng_deg / 2.0,
                );
                cells.push(GridCell {
                    row,
                    col,
                    center,
                    bounds,
                });
            }
        }
        debug!(
            "pan steps: {step_x_px}x{step_y_px} px = {step_lng_deg:.6}x{step_lat_deg:.6} deg"
        );

        Ok(CaptureGrid {
            cells,
            rows,
            cols,
            step_x_px,
            step_y_px,
            step_lng_deg,
            step_lat_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatzones_core::UiMargins;

    fn lhasa_planner(overlap: f64) -> GridPlanner {
        let screen = ScreenGeometry::new(
            1080,
            2340,
            UiMargins {
                top: 200,
                bottom: 150,
                left: 50,
                right: 50,
            },
        );
        GridPlanner::new(screen, overlap, MapProjection::new(14, 29.65))
    }

    fn lhasa_bounds() -> GeoBounds {
        GeoBounds::new(29.70, 29.60, 91.20, 91.05)
    }

    #[test]
    fn rejects_degenerate_overlap() {
        for overlap in [0.0, 1.0, 1.5, -0.1] {
            assert!(lhasa_planner(overlap).plan(lhasa_bounds()).is_err());
        }
    }

    #[test]
    fn grid_is_row_major_and_indexed() {
        let grid = lhasa_planner(0.2).plan(lhasa_bounds()).unwrap();
        assert_eq!(grid.len() as u32, grid.rows * grid.cols);
        for (idx, cell) in grid.cells.iter().enumerate() {
            assert_eq!(idx as u32, cell.row * grid.cols + cell.col);
            assert_eq!(grid.cell(cell.row, cell.col), Some(cell));
        }
        assert!(grid.cell(grid.rows, 0).is_none());
    }

    #[test]
    fn centers_step_by_planned_degrees() {
        let grid = lhasa_planner(0.2).plan(lhasa_bounds()).unwrap();
        let a = grid.cell(0, 0).unwrap();
        let b = grid.cell(0, 1).unwrap();
        let c = grid.cell(1, 0).unwrap();
        approx::assert_relative_eq!(b.center.lng - a.center.lng, grid.step_lng_deg);
        approx::assert_relative_eq!(a.center.lat - c.center.lat, grid.step_lat_deg);
    }

    #[test]
    fn union_of_cell_bounds_covers_target() {
        let target = lhasa_bounds();
        for overlap in [0.1, 0.2, 0.35, 0.5, 0.8] {
            let grid = lhasa_planner(overlap).plan(target).unwrap();
            let coverage = grid.coverage().unwrap();
            assert!(coverage.north >= target.north, "overlap {overlap}");
            assert!(coverage.south <= target.south, "overlap {overlap}");
            assert!(coverage.east >= target.east, "overlap {overlap}");
            assert!(coverage.west <= target.west, "overlap {overlap}");

            // Spot-check interior points: every sample must fall inside at
            // least one cell's bounds.
            for i in 0..10 {
                for j in 0..10 {
                    let p = GeoPoint::new(
                        target.south + target.lat_span() * (i as f64 + 0.5) / 10.0,
                        target.west + target.lng_span() * (j as f64 + 0.5) / 10.0,
                    );
                    assert!(
                        grid.cells.iter().any(|c| c.bounds.contains(p)),
                        "uncovered point {p:?} at overlap {overlap}"
                    );
                }
            }
        }
    }

    #[test]
    fn tiny_target_still_gets_one_cell() {
        let target = GeoBounds::new(29.6501, 29.6500, 91.1001, 91.1000);
        let grid = lhasa_planner(0.2).plan(target).unwrap();
        assert!(grid.rows >= 1 && grid.cols >= 1);
        assert!(grid.coverage().unwrap().contains(target.center()));
    }
}
