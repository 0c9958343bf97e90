use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use serde::{Deserialize, Serialize};

use crate::hsv::rgb_to_hsv;

/// A named HSV range (OpenCV scale) describing one overlay color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub name: String,
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorBand {
    pub fn new(name: &str, lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }

    fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

/// Binary mask (0/255) of pixels whose HSV value falls inside the band.
pub fn band_mask(image: &RgbImage, band: &ColorBand) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        if band.contains(rgb_to_hsv(pixel.0)) {
            mask.put_pixel(x, y, Luma([255u8]));
        }
    }
    mask
}

/// Morphological opening then closing with a small disc element, removing
/// speckle noise and filling pinholes without disturbing zone outlines.
pub fn denoise_mask(mask: &GrayImage) -> GrayImage {
    close(&open(mask, Norm::L2, 2), Norm::L2, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn dark_orange() -> ColorBand {
        ColorBand::new("orange_dark", [10, 100, 100], [25, 255, 255])
    }

    #[test]
    fn mask_selects_band_pixels_only() {
        let mut img = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        img.put_pixel(3, 4, Rgb([230, 120, 20]));
        let mask = band_mask(&img, &dark_orange());
        assert_eq!(mask.get_pixel(3, 4).0, [255]);
        assert_eq!(mask.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn opening_removes_isolated_speckle() {
        let mut mask = GrayImage::new(32, 32);
        mask.put_pixel(5, 5, Luma([255]));
        let cleaned = denoise_mask(&mask);
        assert!(cleaned.pixels().all(|p| p.0 == [0]));
    }

    #[test]
    fn large_blobs_survive_denoising() {
        let mut mask = GrayImage::new(64, 64);
        for y in 16..48 {
            for x in 16..48 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let cleaned = denoise_mask(&mask);
        assert_eq!(cleaned.get_pixel(32, 32).0, [255]);
    }
}
