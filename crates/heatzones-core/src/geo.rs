use serde::{Deserialize, Serialize};

use crate::screen::ConfigError;

/// Approximate length of one degree of latitude, in meters.
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// A WGS84 coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned geographic rectangle in WGS84 degrees.
///
/// `north > south` and `east > west` must hold; `validate` enforces this
/// before any planning starts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl GeoBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.north <= self.south || self.east <= self.west {
            return Err(ConfigError::InvalidBounds {
                north: self.north,
                south: self.south,
                east: self.east,
                west: self.west,
            });
        }
        Ok(())
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        p.lat <= self.north && p.lat >= self.south && p.lng >= self.west && p.lng <= self.east
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}
