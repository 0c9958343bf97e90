//! Core types and utilities for heat-overlay map harvesting.
//!
//! This crate is intentionally small and purely geometric. It holds the
//! WGS84 bounding-box and screen-geometry value types shared by every
//! pipeline stage, plus the fixed-latitude Mercator approximation that maps
//! pixel pans to degree offsets. It does *not* depend on any image type or
//! device backend.

mod geo;
mod logger;
mod projection;
mod screen;

pub use geo::{GeoBounds, GeoPoint, METERS_PER_DEG_LAT};
pub use projection::{MapProjection, EARTH_CIRCUMFERENCE_M};
pub use screen::{ConfigError, ScreenGeometry, UiMargins};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_scoped, init_with_level};
