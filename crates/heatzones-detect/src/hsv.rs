//! RGB to HSV conversion on the OpenCV integer scale.
//!
//! Band thresholds in deployed configurations are written against the
//! OpenCV convention (H in 0..=179, S and V in 0..=255), so the conversion
//! here reproduces that scale exactly rather than the 0..=359 degree one.

/// Convert one RGB pixel to OpenCV-scale HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    let delta = (max - min) as f32;

    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    if delta == 0.0 {
        return [0, s, v];
    }

    let rf = r as f32;
    let gf = g as f32;
    let bf = b as f32;
    let mut hue = if max == r {
        60.0 * (gf - bf) / delta
    } else if max == g {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let h = (hue / 2.0).round() as u16;
    [(h % 180) as u8, s, v]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    }

    #[test]
    fn grays_have_zero_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
        assert_eq!(rgb_to_hsv([255, 255, 255]), [0, 0, 255]);
    }

    #[test]
    fn heatmap_orange_falls_in_the_dark_orange_band() {
        // Representative heat-overlay fill color.
        let [h, s, v] = rgb_to_hsv([230, 120, 20]);
        assert!((10..=25).contains(&h), "h = {h}");
        assert!(s >= 100 && v >= 100);
    }
}
