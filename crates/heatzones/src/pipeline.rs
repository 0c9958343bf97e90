use log::{info, warn};

use heatzones_capture::{CaptureError, MapDevice, Sequencer};
use heatzones_core::{ConfigError, GeoPoint};
use heatzones_detect::{HotZone, HotZoneDetector};
use heatzones_grid::{GridPlanError, GridPlanner};
use heatzones_stitch::{StitchError, StitchParams, StitchedMap, Stitcher};

/// Persistence seam. The pipeline produces one composite and one zone
/// list per cycle and hands both over; storage format and location are
/// the implementor's business.
pub trait RegionSink {
    fn store_cycle(&mut self, map: &StitchedMap, zones: &[HotZone]) -> std::io::Result<()>;
}

/// Anything that can abort one harvesting cycle. Every variant is local
/// to the cycle; the surrounding scheduler decides whether to retry.
#[derive(thiserror::Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Plan(#[from] GridPlanError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Stitch(#[from] StitchError),
    #[error("persistence sink failed: {0}")]
    Sink(#[from] std::io::Error),
}

/// Outcome of one successful cycle.
#[derive(Debug)]
pub struct CycleReport {
    pub map: StitchedMap,
    pub zones: Vec<HotZone>,
    /// Cells that actually yielded a frame.
    pub captured: usize,
    /// Cells the planner laid out.
    pub planned: usize,
}

/// One full harvesting cycle: plan the grid, drive the device across it,
/// stitch whatever came back and extract hot zones.
///
/// `start` is the device's current live map position, used only for the
/// initial approach to the grid origin. Sparse captures are tolerated all
/// the way through; only configuration problems, an unreachable grid
/// origin, a blown deadline or a completely frameless stitch abort the
/// cycle.
pub fn run_cycle<D: MapDevice>(
    device: &mut D,
    start: GeoPoint,
    config: &crate::HarvestConfig,
) -> Result<CycleReport, CycleError> {
    config.validate()?;
    let projection = config.projection();

    let planner = GridPlanner::new(config.screen, config.overlap, projection);
    let grid = planner.plan(config.bounds)?;

    let sequencer = Sequencer::new(config.sequencer, config.screen, projection);
    let run = sequencer.run(device, &grid, start)?;
    if run.len() < grid.len() {
        warn!(
            "sparse capture: {} of {} cells missing",
            grid.len() - run.len(),
            grid.len()
        );
    }

    let stitcher = Stitcher::new(StitchParams {
        screen: config.screen,
        overlap: config.overlap,
    });
    let map = stitcher.stitch(&run)?;

    let detector = HotZoneDetector::new(config.detect.clone());
    let zones = detector.detect(&map.image, &config.bounds);

    info!(
        "cycle complete: {}x{} composite, {}/{} cells, {} zone(s)",
        map.width(),
        map.height(),
        run.len(),
        grid.len(),
        zones.len()
    );
    Ok(CycleReport {
        captured: run.len(),
        planned: grid.len(),
        map,
        zones,
    })
}

/// `run_cycle` followed by a hand-off to the persistence sink.
pub fn run_cycle_with_sink<D: MapDevice, S: RegionSink>(
    device: &mut D,
    start: GeoPoint,
    config: &crate::HarvestConfig,
    sink: &mut S,
) -> Result<CycleReport, CycleError> {
    let report = run_cycle(device, start, config)?;
    sink.store_cycle(&report.map, &report.zones)?;
    Ok(report)
}
