//! Map stitcher.
//!
//! Reassembles the frames of a capture pass into one composite raster:
//! UI-margin crop per frame, then row-wise horizontal concatenation, then
//! vertical concatenation of the row strips. Overlap between consecutive
//! frames is removed by trimming a fixed leading band derived from the
//! configured overlap ratio; no visual seam detection is attempted, so any
//! drift in the device's actual pan distance misaligns the composite
//! silently (an accepted limitation of the fixed-offset design).

mod stitcher;

pub use stitcher::{StitchError, StitchParams, StitchedMap, Stitcher};
