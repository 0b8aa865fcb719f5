use serde::{Deserialize, Serialize};

/// A coordinate pair in one of the ISIN coordinate spaces.
///
/// Depending on the call this is `(lon, lat)` in radians or degrees,
/// `(x, y)` in global map meters, or `(x, y)` tile image pixels. Tile image
/// results additionally carry the tile column and line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsinPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_line: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_col: Option<i32>,
}

impl IsinPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            tile_line: None,
            tile_col: None,
        }
    }

    /// A point with tile identifiers attached.
    pub fn with_tile(x: f64, y: f64, tile_col: i32, tile_line: i32) -> Self {
        Self {
            x,
            y,
            tile_line: Some(tile_line),
            tile_col: Some(tile_col),
        }
    }

    /// Result for input outside the projection domain.
    pub fn invalid() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    pub fn is_valid(&self) -> bool {
        !(self.x.is_nan() || self.y.is_nan())
    }
}
