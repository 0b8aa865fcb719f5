//! Geographic and pixel positions.
//!
//! Both types use `NaN` components to mark a position that is invalid or
//! could not be resolved. Lookups hand back such positions instead of
//! errors, so callers branch on [`GeoPos::is_valid`] / [`PixelPos::is_valid`].

use serde::{Deserialize, Serialize};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPos {
    /// Create a new position from latitude and longitude in degrees.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// A position marking "no geolocation".
    pub fn invalid() -> Self {
        Self {
            lat: f64::NAN,
            lon: f64::NAN,
        }
    }

    /// True when neither component is NaN.
    pub fn is_valid(&self) -> bool {
        !(self.lat.is_nan() || self.lon.is_nan())
    }

    pub fn set_invalid(&mut self) {
        self.lat = f64::NAN;
        self.lon = f64::NAN;
    }

    pub fn set_location(&mut self, lat: f64, lon: f64) {
        self.lat = lat;
        self.lon = lon;
    }
}

impl Default for GeoPos {
    fn default() -> Self {
        Self::invalid()
    }
}

impl std::fmt::Display for GeoPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(lat={}, lon={})", self.lat, self.lon)
    }
}

/// A position in fractional pixel coordinates.
///
/// Pixel centers sit at `x + 0.5` / `y + 0.5` when the raster offset is
/// the usual half pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    /// Create a new pixel position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A position marking "not resolvable".
    pub fn invalid() -> Self {
        Self {
            x: f64::NAN,
            y: f64::NAN,
        }
    }

    /// True when neither component is NaN.
    pub fn is_valid(&self) -> bool {
        !(self.x.is_nan() || self.y.is_nan())
    }

    pub fn set_invalid(&mut self) {
        self.x = f64::NAN;
        self.y = f64::NAN;
    }

    pub fn set_location(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

impl Default for PixelPos {
    fn default() -> Self {
        Self::invalid()
    }
}

impl std::fmt::Display for PixelPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(x={}, y={})", self.x, self.y)
    }
}
