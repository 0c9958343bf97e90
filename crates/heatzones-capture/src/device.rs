use image::RgbImage;

/// Capability seam to the device-automation layer.
///
/// The sequencer only ever asks for relative pixel-distance pans and raw
/// frame captures; connection lifecycle, gesture synthesis and screenshot
/// transport belong to the implementor. A pan of `(dx, dy)` shifts the
/// visible map content so that the point previously `dx` pixels right of /
/// `dy` pixels below the screen center ends up at the center (positive
/// `dx` pans the view east, positive `dy` pans it south).
pub trait MapDevice {
    /// Pan the viewport by the given pixel distances. `false` means the
    /// gesture was not executed.
    fn pan(&mut self, dx: i32, dy: i32) -> bool;

    /// Photograph the current frame. `None` means the capture failed.
    fn capture(&mut self) -> Option<RgbImage>;
}
