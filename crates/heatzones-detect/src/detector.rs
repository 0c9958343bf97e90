use image::{Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use log::{debug, info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use heatzones_core::{GeoBounds, GeoPoint};

use crate::classify::{confidence_score, passes_shape_filter, RegionCandidate, ShapeThresholds};
use crate::contour::{analyze_contour, PixelRect};
use crate::geocode::LinearGeocoder;
use crate::mask::{band_mask, denoise_mask, ColorBand};
use crate::merge::dedup_by_center;

/// One detected, deduplicated, geocoded hot zone. Immutable value object;
/// serializable for the persistence hand-off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotZone {
    pub contour: Vec<[i32; 2]>,
    pub center: Point2<f64>,
    pub bbox: PixelRect,
    pub area_px: f64,
    pub vertex_count: usize,
    pub aspect_ratio: f64,
    pub solidity: f64,
    pub circularity: f64,
    pub band: String,
    pub confidence: f64,
    pub geo_center: GeoPoint,
    pub geo_bounds: GeoBounds,
    pub geo_area_m2: f64,
}

/// Full detector configuration: which colors to look for, which shapes to
/// accept, and how close two centers may sit before they are one zone.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectParams {
    pub bands: Vec<ColorBand>,
    #[serde(default)]
    pub shape: ShapeThresholds,
    pub dedup_distance_px: f64,
}

impl Default for DetectParams {
    fn default() -> Self {
        Self {
            bands: vec![
                ColorBand::new("orange_dark", [10, 100, 100], [25, 255, 255]),
                ColorBand::new("orange_light", [15, 50, 150], [35, 255, 255]),
            ],
            shape: ShapeThresholds::default(),
            dedup_distance_px: 50.0,
        }
    }
}

/// Hot-zone detector over a stitched composite.
#[derive(Clone, Debug, Default)]
pub struct HotZoneDetector {
    pub params: DetectParams,
}

impl HotZoneDetector {
    pub fn new(params: DetectParams) -> Self {
        Self { params }
    }

    /// Detect hot zones in `composite`, geocoding against the bounding box
    /// the composite nominally covers.
    ///
    /// Never raises: unusable input is logged as a detection failure and
    /// yields an empty list, which downstream handles like "nothing
    /// found". Deterministic; repeated calls return identical lists.
    pub fn detect(&self, composite: &RgbImage, bounds: &GeoBounds) -> Vec<HotZone> {
        if composite.width() == 0 || composite.height() == 0 {
            warn!("detection failed: empty composite image");
            return Vec::new();
        }
        if bounds.validate().is_err() {
            warn!("detection failed: degenerate geographic bounds {bounds:?}");
            return Vec::new();
        }

        let mut candidates = Vec::new();
        for band in &self.params.bands {
            let found = self.scan_band(composite, band);
            debug!("band {}: {} candidate contour(s)", band.name, found.len());
            candidates.extend(found);
        }

        let merged = dedup_by_center(candidates, self.params.dedup_distance_px);

        let geocoder = LinearGeocoder::new(*bounds, composite.width(), composite.height());
        let zones: Vec<HotZone> = merged
            .into_iter()
            .map(|c| finalize(c, &geocoder))
            .collect();

        info!("detected {} hot zone(s)", zones.len());
        zones
    }

    fn scan_band(&self, composite: &RgbImage, band: &ColorBand) -> Vec<RegionCandidate> {
        let mask = denoise_mask(&band_mask(composite, band));
        let mut out = Vec::new();
        for contour in find_contours::<i32>(&mask) {
            if contour.border_type != BorderType::Outer {
                continue;
            }
            let Some(stats) = analyze_contour(&contour.points, self.params.shape.poly_epsilon_ratio)
            else {
                continue;
            };
            if !passes_shape_filter(&stats, &self.params.shape) {
                continue;
            }
            let confidence = confidence_score(&stats);
            out.push(RegionCandidate {
                stats,
                band: band.name.clone(),
                confidence,
            });
        }
        out
    }

    /// Debug rendering: contour outlines and center dots over a copy of
    /// the composite.
    pub fn annotate(&self, composite: &RgbImage, zones: &[HotZone]) -> RgbImage {
        use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

        let outline = Rgb([255u8, 0, 0]);
        let mut annotated = composite.clone();
        for zone in zones {
            let n = zone.contour.len();
            for i in 0..n {
                let [x0, y0] = zone.contour[i];
                let [x1, y1] = zone.contour[(i + 1) % n];
                draw_line_segment_mut(
                    &mut annotated,
                    (x0 as f32, y0 as f32),
                    (x1 as f32, y1 as f32),
                    outline,
                );
            }
            draw_filled_circle_mut(
                &mut annotated,
                (zone.center.x as i32, zone.center.y as i32),
                4,
                outline,
            );
        }
        annotated
    }
}

fn finalize(candidate: RegionCandidate, geocoder: &LinearGeocoder) -> HotZone {
    let stats = candidate.stats;
    let geo_center = geocoder.point(stats.centroid);
    let geo_bounds = geocoder.rect(&stats.bbox);
    let geo_area_m2 = LinearGeocoder::area_m2(&geo_bounds, geo_center.lat);
    HotZone {
        contour: stats.points,
        center: stats.centroid,
        bbox: stats.bbox,
        area_px: stats.area,
        vertex_count: stats.vertex_count,
        aspect_ratio: stats.aspect_ratio,
        solidity: stats.solidity,
        circularity: stats.circularity,
        band: candidate.band,
        confidence: candidate.confidence,
        geo_center,
        geo_bounds,
        geo_area_m2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;

    const ORANGE: Rgb<u8> = Rgb([230, 120, 20]);

    fn lhasa_bounds() -> GeoBounds {
        GeoBounds::new(29.70, 29.60, 91.20, 91.05)
    }

    fn hexagon(cx: i32, cy: i32, radius: f64) -> Vec<Point<i32>> {
        (0..6)
            .map(|i| {
                let angle = std::f64::consts::PI / 3.0 * i as f64;
                Point::new(
                    cx + (radius * angle.cos()).round() as i32,
                    cy + (radius * angle.sin()).round() as i32,
                )
            })
            .collect()
    }

    fn composite_with_hexagon() -> RgbImage {
        let mut img = RgbImage::new(400, 400);
        draw_polygon_mut(&mut img, &hexagon(200, 200, 60.0), ORANGE);
        img
    }

    #[test]
    fn detects_orange_hexagon_with_full_confidence() {
        let detector = HotZoneDetector::default();
        let zones = detector.detect(&composite_with_hexagon(), &lhasa_bounds());

        assert_eq!(zones.len(), 1);
        let zone = &zones[0];
        assert_eq!(zone.band, "orange_dark");
        assert!(zone.area_px > 500.0);
        assert!((5..=7).contains(&zone.vertex_count), "{}", zone.vertex_count);
        assert!(zone.solidity > 0.9);
        // Big regular shape: every strong bucket fires and the score
        // clamps at the top.
        assert_eq!(zone.confidence, 1.0);
        assert!((zone.center.x - 200.0).abs() < 3.0);
        assert!((zone.center.y - 200.0).abs() < 3.0);
    }

    #[test]
    fn geocoding_stays_inside_the_nominal_bounds() {
        let bounds = lhasa_bounds();
        let zones = HotZoneDetector::default().detect(&composite_with_hexagon(), &bounds);
        let zone = &zones[0];
        assert!(bounds.contains(zone.geo_center));
        assert!(zone.geo_bounds.validate().is_ok());
        assert!(zone.geo_area_m2 > 0.0);
    }

    #[test]
    fn detection_is_idempotent() {
        let detector = HotZoneDetector::default();
        let composite = composite_with_hexagon();
        let first = detector.detect(&composite, &lhasa_bounds());
        let second = detector.detect(&composite, &lhasa_bounds());
        assert_eq!(first, second);
    }

    #[test]
    fn blank_composite_yields_nothing() {
        let detector = HotZoneDetector::default();
        let blank = RgbImage::new(64, 64);
        assert!(detector.detect(&blank, &lhasa_bounds()).is_empty());
    }

    #[test]
    fn unusable_input_returns_empty_not_error() {
        let detector = HotZoneDetector::default();
        assert!(detector
            .detect(&RgbImage::new(0, 0), &lhasa_bounds())
            .is_empty());

        let flipped = GeoBounds::new(29.60, 29.70, 91.20, 91.05);
        assert!(detector
            .detect(&composite_with_hexagon(), &flipped)
            .is_empty());
    }

    #[test]
    fn two_shades_of_the_same_zone_merge() {
        // A large dark-orange hexagon with a lighter rim drawn slightly
        // offset; both bands fire, the merge keeps one zone.
        let mut img = RgbImage::new(400, 400);
        draw_polygon_mut(&mut img, &hexagon(200, 200, 60.0), ORANGE);
        draw_polygon_mut(&mut img, &hexagon(210, 200, 40.0), Rgb([250, 170, 90]));

        let zones = HotZoneDetector::default().detect(&img, &lhasa_bounds());
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].band, "orange_dark");
    }

    #[test]
    fn speckle_noise_is_ignored() {
        let mut img = composite_with_hexagon();
        // Isolated band-colored pixels well away from the zone.
        for &(x, y) in &[(20, 20), (380, 40), (40, 380)] {
            img.put_pixel(x, y, ORANGE);
        }
        let zones = HotZoneDetector::default().detect(&img, &lhasa_bounds());
        assert_eq!(zones.len(), 1);
    }

    #[test]
    fn annotate_marks_the_zone_without_resizing() {
        let composite = composite_with_hexagon();
        let detector = HotZoneDetector::default();
        let zones = detector.detect(&composite, &lhasa_bounds());
        let annotated = detector.annotate(&composite, &zones);
        assert_eq!(annotated.dimensions(), composite.dimensions());
        assert_ne!(annotated, composite);
    }

    #[test]
    fn hot_zone_serializes_for_persistence() {
        let zones = HotZoneDetector::default().detect(&composite_with_hexagon(), &lhasa_bounds());
        let json = serde_json::to_string(&zones).unwrap();
        let back: Vec<HotZone> = serde_json::from_str(&json).unwrap();
        assert_eq!(zones, back);
    }
}
