use std::f64::consts::PI;

use imageproc::geometry::{approximate_polygon_dp, arc_length, convex_hull};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }
}

/// Geometric measurements of one external contour.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourStats {
    pub points: Vec<[i32; 2]>,
    pub area: f64,
    pub perimeter: f64,
    pub vertex_count: usize,
    pub bbox: PixelRect,
    pub centroid: Point2<f64>,
    pub aspect_ratio: f64,
    pub solidity: f64,
    pub circularity: f64,
}

/// Measure a traced boundary: area and centroid via the shoelace formula,
/// vertex count via Douglas-Peucker approximation with a tolerance of
/// `epsilon_ratio` times the perimeter, solidity against the convex hull,
/// circularity as 4*pi*area/perimeter^2.
///
/// Returns `None` for boundaries too short or too thin to measure.
pub fn analyze_contour(points: &[Point<i32>], epsilon_ratio: f64) -> Option<ContourStats> {
    if points.len() < 3 {
        return None;
    }

    let perimeter = arc_length(points, true);
    if perimeter <= 0.0 {
        return None;
    }

    let signed = signed_area(points);
    let area = signed.abs();

    let approx = approximate_polygon_dp(points, epsilon_ratio * perimeter, true);
    let vertex_count = approx.len();

    let (min_x, max_x) = minmax(points.iter().map(|p| p.x))?;
    let (min_y, max_y) = minmax(points.iter().map(|p| p.y))?;
    let bbox = PixelRect {
        x: min_x,
        y: min_y,
        width: (max_x - min_x + 1) as u32,
        height: (max_y - min_y + 1) as u32,
    };
    let aspect_ratio = bbox.width as f64 / bbox.height as f64;

    let hull = convex_hull(points.to_vec());
    let hull_area = signed_area(&hull).abs();
    let solidity = if hull_area > 0.0 { area / hull_area } else { 0.0 };

    let circularity = 4.0 * PI * area / (perimeter * perimeter);

    // Moment-based centroid; a degenerate (zero-area) boundary falls back
    // to the bounding-box center.
    let centroid = if area > f64::EPSILON {
        polygon_centroid(points, signed)
    } else {
        bbox.center()
    };

    Some(ContourStats {
        points: points.iter().map(|p| [p.x, p.y]).collect(),
        area,
        perimeter,
        vertex_count,
        bbox,
        centroid,
        aspect_ratio,
        solidity,
        circularity,
    })
}

fn minmax(values: impl Iterator<Item = i32>) -> Option<(i32, i32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn signed_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
    }
    sum / 2.0
}

fn polygon_centroid(points: &[Point<i32>], signed: f64) -> Point2<f64> {
    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cross = a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        cx += (a.x as f64 + b.x as f64) * cross;
        cy += (a.y as f64 + b.y as f64) * cross;
    }
    Point2::new(cx / (6.0 * signed), cy / (6.0 * signed))
}
