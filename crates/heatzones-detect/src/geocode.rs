use nalgebra::Point2;

use heatzones_core::{GeoBounds, GeoPoint, METERS_PER_DEG_LAT};

use crate::contour::PixelRect;

/// Linear pixel-to-geographic interpolation over a composite image.
///
/// The composite's pixel extents are assumed to span exactly the nominal
/// bounding box (north-west origin), so this is a plain ratio mapping,
/// deliberately simpler than the zoom-level projection used for pan
/// planning.
#[derive(Clone, Copy, Debug)]
pub struct LinearGeocoder {
    bounds: GeoBounds,
    lat_per_px: f64,
    lng_per_px: f64,
}

impl LinearGeocoder {
    pub fn new(bounds: GeoBounds, width: u32, height: u32) -> Self {
        Self {
            bounds,
            lat_per_px: bounds.lat_span() / height as f64,
            lng_per_px: bounds.lng_span() / width as f64,
        }
    }

    pub fn point(&self, p: Point2<f64>) -> GeoPoint {
        GeoPoint {
            lat: self.bounds.north - p.y * self.lat_per_px,
            lng: self.bounds.west + p.x * self.lng_per_px,
        }
    }

    pub fn rect(&self, r: &PixelRect) -> GeoBounds {
        GeoBounds {
            north: self.bounds.north - r.y as f64 * self.lat_per_px,
            south: self.bounds.north - (r.y + r.height as i32) as f64 * self.lat_per_px,
            west: self.bounds.west + r.x as f64 * self.lng_per_px,
            east: self.bounds.west + (r.x + r.width as i32) as f64 * self.lng_per_px,
        }
    }

    /// Planar rectangle approximation of the physical footprint in m²:
    /// the lat/lng spans converted to meters and multiplied, with the
    /// longitude span corrected for the region's own latitude.
    pub fn area_m2(bounds: &GeoBounds, at_lat: f64) -> f64 {
        let lat_m = bounds.lat_span().abs() * METERS_PER_DEG_LAT;
        let lng_m = bounds.lng_span().abs() * METERS_PER_DEG_LAT * at_lat.to_radians().cos();
        lat_m * lng_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geocoder() -> LinearGeocoder {
        LinearGeocoder::new(GeoBounds::new(29.70, 29.60, 91.20, 91.05), 1500, 1000)
    }

    #[test]
    fn image_corners_map_to_bounds_corners() {
        let g = geocoder();
        let nw = g.point(Point2::new(0.0, 0.0));
        assert_relative_eq!(nw.lat, 29.70);
        assert_relative_eq!(nw.lng, 91.05);

        let se = g.point(Point2::new(1500.0, 1000.0));
        assert_relative_eq!(se.lat, 29.60);
        assert_relative_eq!(se.lng, 91.20);
    }

    #[test]
    fn image_center_maps_to_bounds_center() {
        let g = geocoder();
        let c = g.point(Point2::new(750.0, 500.0));
        assert_relative_eq!(c.lat, 29.65, epsilon = 1e-12);
        assert_relative_eq!(c.lng, 91.125, epsilon = 1e-12);
    }

    #[test]
    fn rect_mapping_preserves_ordering() {
        let g = geocoder();
        let bounds = g.rect(&PixelRect {
            x: 100,
            y: 100,
            width: 200,
            height: 150,
        });
        assert!(bounds.validate().is_ok());
        assert!(bounds.north < 29.70 && bounds.south > 29.60);
    }

    #[test]
    fn area_of_a_degree_square_near_the_equator() {
        let square = GeoBounds::new(0.5, -0.5, 0.5, -0.5);
        let area = LinearGeocoder::area_m2(&square, 0.0);
        assert_relative_eq!(area, METERS_PER_DEG_LAT * METERS_PER_DEG_LAT, epsilon = 1.0);
    }

    #[test]
    fn area_shrinks_with_latitude() {
        let square = GeoBounds::new(60.5, 59.5, 10.5, 9.5);
        let polar = LinearGeocoder::area_m2(&square, 60.0);
        let equatorial = LinearGeocoder::area_m2(&square, 0.0);
        assert!(polar < equatorial);
        assert_relative_eq!(polar / equatorial, 0.5, epsilon = 1e-9);
    }
}
