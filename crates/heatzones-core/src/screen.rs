use serde::{Deserialize, Serialize};

/// Fixed UI chrome around the map viewport, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiMargins {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Device frame geometry: full screen size plus the UI margins that
/// surround the displayable map area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub margins: UiMargins,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32, margins: UiMargins) -> Self {
        Self {
            width,
            height,
            margins,
        }
    }

    /// Width of the map viewport once UI chrome is stripped.
    pub fn display_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margins.left + self.margins.right)
    }

    /// Height of the map viewport once UI chrome is stripped.
    pub fn display_height(&self) -> u32 {
        self.height
            .saturating_sub(self.margins.top + self.margins.bottom)
    }

    /// The margins must leave a positive-area map rectangle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_width() == 0 || self.display_height() == 0 {
            return Err(ConfigError::DegenerateMargins {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Configuration problems that must abort a cycle before any device
/// interaction happens.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("overlap ratio {0} is outside (0, 1)")]
    InvalidOverlap(f64),
    #[error("UI margins leave no displayable map area on a {width}x{height} screen")]
    DegenerateMargins { width: u32, height: u32 },
    #[error("invalid bounds: north={north} south={south} east={east} west={west}")]
    InvalidBounds {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_area_subtracts_margins() {
        let screen = ScreenGeometry::new(
            1080,
            2340,
            UiMargins {
                top: 200,
                bottom: 150,
                left: 50,
                right: 50,
            },
        );
        assert_eq!(screen.display_width(), 980);
        assert_eq!(screen.display_height(), 1990);
        assert!(screen.validate().is_ok());
    }

    #[test]
    fn sparse_json_defaults_margins_to_zero() {
        // Config files may give just the screen size; margins fall back to
        // no chrome at all.
        let screen: ScreenGeometry =
            serde_json::from_str(r#"{"width": 1080, "height": 2340}"#).unwrap();
        assert_eq!(screen.margins, UiMargins::default());
        assert_eq!(screen.display_width(), 1080);
        assert_eq!(screen.display_height(), 2340);
    }

    #[test]
    fn degenerate_margins_rejected() {
        let screen = ScreenGeometry::new(
            100,
            100,
            UiMargins {
                top: 60,
                bottom: 60,
                left: 0,
                right: 0,
            },
        );
        assert!(screen.validate().is_err());
    }
}
