use std::path::Path;

use serde::{Deserialize, Serialize};

use heatzones_capture::SequencerParams;
use heatzones_core::{ConfigError, GeoBounds, MapProjection, ScreenGeometry, UiMargins};
use heatzones_detect::DetectParams;

#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_zoom() -> u8 {
    14
}

/// Everything one harvesting cycle needs, in one JSON-loadable value.
///
/// There is deliberately no process-global configuration: callers build
/// (or load) a `HarvestConfig` and pass it down, so every stage stays
/// testable with synthetic parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Target area to cover.
    pub bounds: GeoBounds,
    /// Device frame geometry including the app's fixed UI chrome.
    pub screen: ScreenGeometry,
    /// Map zoom level the app is held at during capture.
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    /// Reference latitude for the projection. Defaults to the center of
    /// `bounds`; every stage must use the same value to avoid drift.
    #[serde(default)]
    pub reference_lat: Option<f64>,
    /// Intentional redundancy between consecutive frames, in (0, 1).
    pub overlap: f64,
    #[serde(default)]
    pub sequencer: SequencerParams,
    #[serde(default)]
    pub detect: DetectParams,
}

impl Default for HarvestConfig {
    /// The original deployment's constants: a 1080x2340 handset at zoom
    /// 14 over the Lhasa urban core.
    fn default() -> Self {
        Self {
            bounds: GeoBounds::new(29.70, 29.60, 91.20, 91.05),
            screen: ScreenGeometry::new(
                1080,
                2340,
                UiMargins {
                    top: 200,
                    bottom: 150,
                    left: 50,
                    right: 50,
                },
            ),
            zoom: 14,
            reference_lat: None,
            overlap: 0.2,
            sequencer: SequencerParams::default(),
            detect: DetectParams::default(),
        }
    }
}

impl HarvestConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The one projection shared by planning, sequencing and stitching.
    pub fn projection(&self) -> MapProjection {
        let reference_lat = self.reference_lat.unwrap_or_else(|| self.bounds.center().lat);
        MapProjection::new(self.zoom, reference_lat)
    }

    /// Reject configurations the pipeline must not even start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bounds.validate()?;
        self.screen.validate()?;
        if !(self.overlap > 0.0 && self.overlap < 1.0) {
            return Err(ConfigError::InvalidOverlap(self.overlap));
        }
        Ok(())
    }
}
