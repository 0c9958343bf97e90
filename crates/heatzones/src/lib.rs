//! High-level facade crate for the `heatzones-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying pipeline crates
//! - the end-to-end capture cycle (`run_cycle`): grid planning, device
//!   sequencing, stitching and hot-zone detection in one call
//! - the aggregated JSON-loadable configuration
//! - the persistence seam (`RegionSink`) for handing composites and
//!   detected zones to whatever store the surrounding service uses.
//!
//! ## Quickstart
//!
//! ```no_run
//! use heatzones::{run_cycle, HarvestConfig};
//! use heatzones::capture::MapDevice;
//! use heatzones::core::GeoPoint;
//! # struct Adb;
//! # impl MapDevice for Adb {
//! #     fn pan(&mut self, _dx: i32, _dy: i32) -> bool { true }
//! #     fn capture(&mut self) -> Option<image::RgbImage> { None }
//! # }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarvestConfig::from_json_file("harvest.json")?;
//! let mut device = Adb;
//! let live_position = GeoPoint::new(29.6516, 91.1175);
//!
//! let report = run_cycle(&mut device, live_position, &config)?;
//! println!("{} hot zone(s) over {} captured cells", report.zones.len(), report.captured);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `heatzones::core`: geographic types, screen geometry, projection.
//! - `heatzones::grid`: the capture grid planner.
//! - `heatzones::capture`: the device seam and navigation sequencer.
//! - `heatzones::stitch`: the composite stitcher.
//! - `heatzones::detect`: color/contour hot-zone detection.

pub use heatzones_capture as capture;
pub use heatzones_core as core;
pub use heatzones_detect as detect;
pub use heatzones_grid as grid;
pub use heatzones_stitch as stitch;

pub use heatzones_core::{GeoBounds, GeoPoint, MapProjection, ScreenGeometry, UiMargins};
pub use heatzones_detect::{DetectParams, HotZone, HotZoneDetector};
pub use heatzones_grid::CaptureGrid;
pub use heatzones_stitch::StitchedMap;

mod config;
mod pipeline;

pub use config::{ConfigLoadError, HarvestConfig};
pub use pipeline::{run_cycle, run_cycle_with_sink, CycleError, CycleReport, RegionSink};
