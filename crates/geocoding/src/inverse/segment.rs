//! Rectangular pixel ranges of a raster with their geographic bounding box.

use crate::error::{GeocodingError, Result};
use crate::inverse::GeoPosCalculator;

/// Segments narrower than this (in pixels) are never split.
pub const MIN_DIMENSION: i32 = 5;

/// Pixel diagonal above which edge midpoints and center are sampled too.
const DENSE_SAMPLING_DIAGONAL: f64 = 64.0;

/// How a segment relates to its own geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentCoverage {
    /// All edge midpoints fall inside the box.
    Inside,
    /// A left or right edge midpoint falls outside.
    Across,
    /// A top or bottom edge midpoint falls outside.
    Along,
}

/// Inclusive pixel range `[x_min, x_max] x [y_min, y_max]`.
///
/// The geographic bounds are only meaningful after
/// [`Segment::calculate_geo_points`]; until then they are NaN and nothing
/// is inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,

    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,

    /// Set when the longitude range wraps through +/-180.
    pub contains_anti_meridian: bool,
}

impl Segment {
    pub fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            lon_min: f64::NAN,
            lon_max: f64::NAN,
            lat_min: f64::NAN,
            lat_max: f64::NAN,
            contains_anti_meridian: false,
        }
    }

    pub fn width(&self) -> i32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> i32 {
        self.y_max - self.y_min + 1
    }

    /// Split in two halves, across track (rows) or along track (columns).
    ///
    /// Segments with a side below [`MIN_DIMENSION`] come back unchanged.
    pub fn split(&self, across_track: bool) -> Vec<Segment> {
        if self.width() < MIN_DIMENSION || self.height() < MIN_DIMENSION {
            return vec![self.clone()];
        }

        if across_track {
            let mid = self.y_min + self.height() / 2;
            vec![
                self.with_rows(self.y_min, mid),
                self.with_rows(mid + 1, self.y_max),
            ]
        } else {
            let mid = self.x_min + self.width() / 2;
            vec![
                self.with_columns(self.x_min, mid),
                self.with_columns(mid + 1, self.x_max),
            ]
        }
    }

    /// Split before `column` into `[x_min, column - 1]` and `[column, x_max]`.
    ///
    /// Returns the segment unchanged if one part would be narrower than
    /// [`MIN_DIMENSION`].
    pub fn split_x(&self, column: i32) -> Result<Vec<Segment>> {
        if column <= self.x_min || column >= self.x_max {
            return Err(GeocodingError::invalid_argument(
                "column",
                format!(
                    "{} is not inside ({}, {})",
                    column, self.x_min, self.x_max
                ),
            ));
        }

        let left = self.with_columns(self.x_min, column - 1);
        let right = self.with_columns(column, self.x_max);
        if left.width() < MIN_DIMENSION || right.width() < MIN_DIMENSION {
            return Ok(vec![self.clone()]);
        }
        Ok(vec![left, right])
    }

    /// Split before `row`, the row counterpart of [`Segment::split_x`].
    pub fn split_y(&self, row: i32) -> Result<Vec<Segment>> {
        if row <= self.y_min || row >= self.y_max {
            return Err(GeocodingError::invalid_argument(
                "row",
                format!("{} is not inside ({}, {})", row, self.y_min, self.y_max),
            ));
        }

        let upper = self.with_rows(self.y_min, row - 1);
        let lower = self.with_rows(row, self.y_max);
        if upper.height() < MIN_DIMENSION || lower.height() < MIN_DIMENSION {
            return Ok(vec![self.clone()]);
        }
        Ok(vec![upper, lower])
    }

    /// Sample the segment and derive its geographic bounding box.
    pub fn calculate_geo_points<C: GeoPosCalculator + ?Sized>(&mut self, calculator: &C) {
        let width = self.width();
        let height = self.height();

        let mut pixels = vec![
            (self.x_min, self.y_min),
            (self.x_max, self.y_min),
            (self.x_min, self.y_max),
            (self.x_max, self.y_max),
        ];

        let diagonal = ((width as f64).powi(2) + (height as f64).powi(2)).sqrt();
        if diagonal > DENSE_SAMPLING_DIAGONAL {
            let x_mid = self.x_min + width / 2;
            let y_mid = self.y_min + height / 2;
            pixels.extend_from_slice(&[
                (x_mid, self.y_min),
                (self.x_max, y_mid),
                (x_mid, self.y_max),
                (self.x_min, y_mid),
                (x_mid, y_mid),
            ]);
        }

        let samples: Vec<(f64, f64)> = pixels
            .iter()
            .map(|&(x, y)| calculator.geo_pos_at(x, y))
            .filter(|pos| !pos.lon.is_nan() && !pos.lat.is_nan())
            .map(|pos| (pos.lon, pos.lat))
            .collect();

        let mut lon_min = f64::MAX;
        let mut lon_max = -f64::MAX;
        let mut lat_min = f64::MAX;
        let mut lat_max = -f64::MAX;
        for &(lon, lat) in &samples {
            lon_min = lon_min.min(lon);
            lon_max = lon_max.max(lon);
            lat_min = lat_min.min(lat);
            lat_max = lat_max.max(lat);
        }

        self.contains_anti_meridian = false;
        if lon_max - lon_min > 180.0 {
            self.contains_anti_meridian = true;

            let far: Vec<f64> = samples
                .iter()
                .map(|&(lon, _)| lon)
                .filter(|lon| lon.abs() >= 90.0)
                .collect();
            let candidates: Vec<f64> = if far.is_empty() {
                samples.iter().map(|&(lon, _)| lon).collect()
            } else {
                far
            };

            lon_min = candidates
                .iter()
                .copied()
                .filter(|&lon| lon < 0.0)
                .fold(-f64::MAX, f64::max);
            lon_max = candidates
                .iter()
                .copied()
                .filter(|&lon| lon >= 0.0)
                .fold(f64::MAX, f64::min);
        }

        self.lon_min = lon_min;
        self.lon_max = lon_max;
        self.lat_min = lat_min;
        self.lat_max = lat_max;
    }

    /// Whether a position lies in the geographic bounding box.
    pub fn is_inside(&self, lon: f64, lat: f64) -> bool {
        if !(lat >= self.lat_min && lat <= self.lat_max) {
            return false;
        }

        if self.contains_anti_meridian {
            lon >= self.lon_max || lon <= self.lon_min
        } else {
            lon >= self.lon_min && lon <= self.lon_max
        }
    }

    fn with_rows(&self, y_min: i32, y_max: i32) -> Segment {
        Segment::new(self.x_min, self.x_max, y_min, y_max)
    }

    fn with_columns(&self, x_min: i32, x_max: i32) -> Segment {
        Segment::new(x_min, x_max, self.y_min, self.y_max)
    }
}
