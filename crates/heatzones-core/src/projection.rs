//! Fixed-latitude Mercator approximation between screen pixels and WGS84
//! degrees.
//!
//! All pan planning and geocoding in the pipeline goes through one
//! `MapProjection` value so every stage agrees on the same per-pixel degree
//! deltas. The approximation is valid for city-scale areas around the
//! reference latitude; it makes no attempt to track latitude-dependent
//! scale change across the target box.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, METERS_PER_DEG_LAT};

/// Equatorial circumference of the Earth in meters (Web Mercator).
pub const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Pixel/degree conversion at a fixed zoom level and reference latitude.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MapProjection {
    pub zoom: u8,
    pub reference_lat: f64,
}

impl MapProjection {
    pub fn new(zoom: u8, reference_lat: f64) -> Self {
        Self {
            zoom,
            reference_lat,
        }
    }

    /// Ground meters covered by one screen pixel at the reference latitude.
    pub fn meters_per_pixel(&self) -> f64 {
        let lat_correction = self.reference_lat.to_radians().cos();
        EARTH_CIRCUMFERENCE_M * lat_correction / (256.0 * f64::powi(2.0, self.zoom as i32))
    }

    /// Degrees of latitude per vertical screen pixel.
    pub fn lat_per_pixel(&self) -> f64 {
        self.meters_per_pixel() / METERS_PER_DEG_LAT
    }

    /// Degrees of longitude per horizontal screen pixel, corrected for
    /// meridian convergence at the reference latitude.
    pub fn lng_per_pixel(&self) -> f64 {
        self.meters_per_pixel() / (METERS_PER_DEG_LAT * self.reference_lat.to_radians().cos())
    }

    /// Coordinate reached by panning `(dx, dy)` pixels from `reference`.
    ///
    /// Screen Y grows downward while latitude grows northward, so a
    /// positive `dy` moves south.
    pub fn pixel_to_geo(&self, dx: i32, dy: i32, reference: GeoPoint) -> GeoPoint {
        GeoPoint {
            lat: reference.lat - dy as f64 * self.lat_per_pixel(),
            lng: reference.lng + dx as f64 * self.lng_per_pixel(),
        }
    }

    /// Pixel pan from `reference` to `target`, truncated to whole pixels.
    pub fn geo_to_pixel(&self, target: GeoPoint, reference: GeoPoint) -> (i32, i32) {
        let dx = (target.lng - reference.lng) / self.lng_per_pixel();
        let dy = -(target.lat - reference.lat) / self.lat_per_pixel();
        (dx as i32, dy as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LHASA_LAT: f64 = 29.65;

    #[test]
    fn meters_per_pixel_matches_tile_formula() {
        let proj = MapProjection::new(14, LHASA_LAT);
        let expected =
            EARTH_CIRCUMFERENCE_M * LHASA_LAT.to_radians().cos() / (256.0 * 16384.0);
        assert_relative_eq!(proj.meters_per_pixel(), expected, epsilon = 1e-9);
    }

    #[test]
    fn pixel_to_geo_moves_north_for_negative_dy() {
        let proj = MapProjection::new(14, LHASA_LAT);
        let reference = GeoPoint::new(29.6516, 91.1175);
        let p = proj.pixel_to_geo(0, -100, reference);
        assert!(p.lat > reference.lat);
        assert_relative_eq!(p.lng, reference.lng);
    }

    #[test]
    fn round_trip_within_one_pixel() {
        let proj = MapProjection::new(14, LHASA_LAT);
        let reference = GeoPoint::new(29.6516, 91.1175);
        // Deterministic pseudo-random offsets; no RNG dependency needed.
        let mut seed = 0x2545_f491u64;
        for _ in 0..200 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let dx = ((seed >> 16) % 4001) as i32 - 2000;
            let dy = ((seed >> 40) % 4001) as i32 - 2000;

            let geo = proj.pixel_to_geo(dx, dy, reference);
            let (rx, ry) = proj.geo_to_pixel(geo, reference);
            assert!((rx - dx).abs() <= 1, "dx {dx} -> {rx}");
            assert!((ry - dy).abs() <= 1, "dy {dy} -> {ry}");
        }
    }

    #[test]
    fn higher_zoom_shrinks_pixel_footprint() {
        let coarse = MapProjection::new(12, LHASA_LAT);
        let fine = MapProjection::new(16, LHASA_LAT);
        assert!(fine.meters_per_pixel() < coarse.meters_per_pixel());
        assert_relative_eq!(
            coarse.meters_per_pixel() / fine.meters_per_pixel(),
            16.0,
            epsilon = 1e-9
        );
    }
}
