use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::RgbImage;
use log::{debug, info, warn};

use heatzones_capture::CaptureRun;
use heatzones_core::{ConfigError, ScreenGeometry};

/// The reassembled composite raster. Never mutated after creation; its
/// geographic extent is the union of the present cells' bounds.
#[derive(Clone, Debug)]
pub struct StitchedMap {
    pub image: RgbImage,
}

impl StitchedMap {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// PNG encoding for the persistence hand-off.
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StitchParams {
    pub screen: ScreenGeometry,
    pub overlap: f64,
}

#[derive(thiserror::Error, Debug)]
pub enum StitchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no rows with usable frames, nothing to stitch")]
    NoRows,
}

/// Deterministic row-then-column compositor over a (possibly sparse)
/// capture run.
#[derive(Clone, Copy, Debug)]
pub struct Stitcher {
    pub params: StitchParams,
}

impl Stitcher {
    pub fn new(params: StitchParams) -> Self {
        Self { params }
    }

    pub fn stitch(&self, run: &CaptureRun) -> Result<StitchedMap, StitchError> {
        let screen = self.params.screen;
        screen.validate()?;
        if !(self.params.overlap > 0.0 && self.params.overlap < 1.0) {
            return Err(ConfigError::InvalidOverlap(self.params.overlap).into());
        }

        let overlap_x = (screen.display_width() as f64 * self.params.overlap).floor() as u32;
        let overlap_y = (screen.display_height() as f64 * self.params.overlap).floor() as u32;

        let mut strips = Vec::new();
        for row in 0..run.rows {
            let mut frames = Vec::new();
            for col in 0..run.cols {
                let Some(frame) = run.frame(row, col) else {
                    continue;
                };
                match crop_margins(&frame.image, screen) {
                    Some(cropped) => frames.push(cropped),
                    // Treated the same as a failed capture.
                    None => warn!("frame ({row}, {col}) smaller than its UI margins, dropping"),
                }
            }
            if frames.is_empty() {
                warn!("row {row} has no usable frames");
                continue;
            }
            strips.push(concat_horizontal(frames, overlap_x));
        }

        if strips.is_empty() {
            return Err(StitchError::NoRows);
        }

        let image = concat_vertical(strips, overlap_y);
        info!("stitched composite: {}x{} px", image.width(), image.height());
        Ok(StitchedMap { image })
    }
}

/// Strip the fixed UI chrome, leaving the displayable map area. `None` if
/// the frame is too small for the configured margins.
fn crop_margins(frame: &RgbImage, screen: ScreenGeometry) -> Option<RgbImage> {
    let m = screen.margins;
    let w = frame.width().checked_sub(m.left + m.right)?;
    let h = frame.height().checked_sub(m.top + m.bottom)?;
    if w == 0 || h == 0 {
        return None;
    }
    Some(imageops::crop_imm(frame, m.left, m.top, w, h).to_image())
}

/// Width (or height) of the leading band to discard from every image
/// after the first. The band normally equals the planned overlap; a frame
/// narrower than the band keeps half of it, the inherited degraded mode.
fn overlap_band(overlap_px: u32, dimension: u32) -> u32 {
    if overlap_px < dimension {
        overlap_px
    } else {
        (overlap_px / 2).min(dimension.saturating_sub(1))
    }
}

fn concat_horizontal(frames: Vec<RgbImage>, overlap_px: u32) -> RgbImage {
    let target_h = frames[0].height();
    let mut prepared = Vec::with_capacity(frames.len());

    for (idx, frame) in frames.into_iter().enumerate() {
        // Normalize to the first frame's height, preserving aspect ratio.
        let frame = if frame.height() != target_h {
            let new_w = ((target_h as f64 / frame.height() as f64) * frame.width() as f64) as u32;
            debug!(
                "resizing row frame {}x{} -> {}x{}",
                frame.width(),
                frame.height(),
                new_w,
                target_h
            );
            imageops::resize(&frame, new_w.max(1), target_h, FilterType::Triangle)
        } else {
            frame
        };

        let frame = if idx == 0 {
            frame
        } else {
            let band = overlap_band(overlap_px, frame.width());
            imageops::crop_imm(&frame, band, 0, frame.width() - band, target_h).to_image()
        };
        prepared.push(frame);
    }

    let total_w: u32 = prepared.iter().map(|f| f.width()).sum();
    let mut canvas = RgbImage::new(total_w, target_h);
    let mut x = 0i64;
    for frame in &prepared {
        imageops::replace(&mut canvas, frame, x, 0);
        x += frame.width() as i64;
    }
    canvas
}

fn concat_vertical(strips: Vec<RgbImage>, overlap_px: u32) -> RgbImage {
    let target_w = strips[0].width();
    let mut prepared = Vec::with_capacity(strips.len());

    for (idx, strip) in strips.into_iter().enumerate() {
        let strip = if strip.width() != target_w {
            let new_h = ((target_w as f64 / strip.width() as f64) * strip.height() as f64) as u32;
            debug!(
                "resizing row strip {}x{} -> {}x{}",
                strip.width(),
                strip.height(),
                target_w,
                new_h
            );
            imageops::resize(&strip, target_w, new_h.max(1), FilterType::Triangle)
        } else {
            strip
        };

        let strip = if idx == 0 {
            strip
        } else {
            let band = overlap_band(overlap_px, strip.height());
            imageops::crop_imm(&strip, 0, band, target_w, strip.height() - band).to_image()
        };
        prepared.push(strip);
    }

    let total_h: u32 = prepared.iter().map(|s| s.height()).sum();
    let mut canvas = RgbImage::new(target_w, total_h);
    let mut y = 0i64;
    for strip in &prepared {
        imageops::replace(&mut canvas, strip, 0, y);
        y += strip.height() as i64;
    }
    canvas
}
