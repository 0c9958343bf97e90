use serde::{Deserialize, Serialize};

use crate::contour::ContourStats;

/// Geometric acceptance thresholds for hot-zone contours.
///
/// Defaults match the overlay rendering this pipeline was built against:
/// roughly-hexagonal markers, so 4..=8 approximated vertices, near-square
/// bounding boxes and high hull solidity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ShapeThresholds {
    pub min_area_px: f64,
    pub min_vertices: usize,
    pub max_vertices: usize,
    pub min_aspect_ratio: f64,
    pub max_aspect_ratio: f64,
    pub min_solidity: f64,
    pub min_circularity: f64,
    pub max_circularity: f64,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub poly_epsilon_ratio: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            min_area_px: 50.0,
            min_vertices: 4,
            max_vertices: 8,
            min_aspect_ratio: 0.5,
            max_aspect_ratio: 2.0,
            min_solidity: 0.7,
            min_circularity: 0.3,
            max_circularity: 1.0,
            poly_epsilon_ratio: 0.02,
        }
    }
}

/// A contour that survived classification for one color band, before
/// cross-band merging and geocoding.
#[derive(Clone, Debug)]
pub struct RegionCandidate {
    pub stats: ContourStats,
    pub band: String,
    pub confidence: f64,
}

/// Every threshold has to hold; one miss rejects the contour.
pub fn passes_shape_filter(stats: &ContourStats, t: &ShapeThresholds) -> bool {
    stats.area >= t.min_area_px
        && (t.min_vertices..=t.max_vertices).contains(&stats.vertex_count)
        && stats.aspect_ratio >= t.min_aspect_ratio
        && stats.aspect_ratio <= t.max_aspect_ratio
        && stats.solidity >= t.min_solidity
        && stats.circularity >= t.min_circularity
        && stats.circularity <= t.max_circularity
}

/// Additive confidence score from a fixed rule table, clamped to [0, 1].
///
/// Base 0.5, then bonuses for size, hexagon-like vertex counts, square-ish
/// aspect, high solidity and mid-range circularity. The table is part of
/// the detector's contract; tuning happens via `ShapeThresholds`, not
/// here.
pub fn confidence_score(stats: &ContourStats) -> f64 {
    let mut score: f64 = 0.5;

    if stats.area > 500.0 {
        score += 0.2;
    } else if stats.area > 200.0 {
        score += 0.1;
    }

    match stats.vertex_count {
        6 => score += 0.2,
        5 | 7 => score += 0.1,
        _ => {}
    }

    if (0.8..=1.2).contains(&stats.aspect_ratio) {
        score += 0.15;
    } else if (0.6..=1.4).contains(&stats.aspect_ratio) {
        score += 0.1;
    }

    if stats.solidity > 0.9 {
        score += 0.15;
    } else if stats.solidity > 0.8 {
        score += 0.1;
    }

    if (0.7..=0.9).contains(&stats.circularity) {
        score += 0.1;
    } else if (0.5..=1.0).contains(&stats.circularity) {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::PixelRect;
    use nalgebra::Point2;

    fn stats(
        area: f64,
        vertex_count: usize,
        aspect_ratio: f64,
        solidity: f64,
        circularity: f64,
    ) -> ContourStats {
        ContourStats {
            points: Vec::new(),
            area,
            perimeter: 100.0,
            vertex_count,
            bbox: PixelRect {
                x: 0,
                y: 0,
                width: 10,
                height: 10,
            },
            centroid: Point2::new(5.0, 5.0),
            aspect_ratio,
            solidity,
            circularity,
        }
    }

    #[test]
    fn filter_rejects_single_threshold_misses() {
        let t = ShapeThresholds::default();
        let good = stats(800.0, 6, 1.0, 0.95, 0.8);
        assert!(passes_shape_filter(&good, &t));

        assert!(!passes_shape_filter(&stats(10.0, 6, 1.0, 0.95, 0.8), &t));
        assert!(!passes_shape_filter(&stats(800.0, 3, 1.0, 0.95, 0.8), &t));
        assert!(!passes_shape_filter(&stats(800.0, 9, 1.0, 0.95, 0.8), &t));
        assert!(!passes_shape_filter(&stats(800.0, 6, 2.5, 0.95, 0.8), &t));
        assert!(!passes_shape_filter(&stats(800.0, 6, 1.0, 0.5, 0.8), &t));
        assert!(!passes_shape_filter(&stats(800.0, 6, 1.0, 0.95, 0.1), &t));
    }

    #[test]
    fn confidence_table_is_additive() {
        // Every bucket at its strongest: 0.5+0.2+0.2+0.15+0.15+0.1 clamps.
        let best = stats(800.0, 6, 1.0, 0.95, 0.8);
        assert_eq!(confidence_score(&best), 1.0);

        // All weak buckets: 0.5+0.1+0.1+0.1+0.1+0.05.
        let weak = stats(300.0, 5, 1.3, 0.85, 0.95);
        assert!((confidence_score(&weak) - 0.95).abs() < 1e-12);

        // No bonuses at all.
        let floor = stats(100.0, 4, 1.9, 0.72, 0.35);
        assert!((confidence_score(&floor) - 0.5).abs() < 1e-12);
    }
}
