//! Hot-zone detector for stitched heat-overlay composites.
//!
//! Pipeline, per configured color band:
//! 1. RGB -> HSV threshold into a binary mask, then morphological opening
//!    and closing to drop speckle and fill pinholes.
//! 2. External contour extraction over the mask foreground.
//! 3. Geometric classification: pixel area, approximated vertex count,
//!    bounding-box aspect ratio, convex-hull solidity and circularity all
//!    have to pass before a contour becomes a candidate.
//! 4. Additive confidence scoring from a fixed rule table.
//!
//! Candidates from all bands are then merged (nearby centers collapse to
//! the larger region) and geocoded by linear interpolation over the
//! composite's nominal geographic bounds.
//!
//! Detection never fails: an unusable composite logs a warning and yields
//! an empty list, which downstream treats the same as "no hot zones". The
//! whole pipeline is deterministic, so repeated runs over the same
//! composite produce identical results.

mod classify;
mod contour;
mod detector;
mod geocode;
mod hsv;
mod mask;
mod merge;

pub use classify::{confidence_score, passes_shape_filter, RegionCandidate, ShapeThresholds};
pub use contour::{ContourStats, PixelRect};
pub use detector::{DetectParams, HotZone, HotZoneDetector};
pub use geocode::LinearGeocoder;
pub use hsv::rgb_to_hsv;
pub use mask::{band_mask, denoise_mask, ColorBand};
pub use merge::dedup_by_center;
