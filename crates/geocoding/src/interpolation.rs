//! Sub-pixel refinement of inverse-coding matches.
//!
//! A match found by one of the inverse strategies is a whole pixel. The
//! interpolator looks at the pixel's neighbourhood and blends the indices
//! of the unit square that faces the query, weighted by inverse squared
//! distance.

use geo_common::{GeoPos, PixelPos, SphericalDistance};
use serde::{Deserialize, Serialize};

/// Distances below this snap to the pixel itself.
const SNAP_DISTANCE: f64 = 1e-12;

/// Distance metric used for interpolation weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolatorType {
    /// Great-circle angle between the positions.
    Geodetic,
    /// Planar distance in degrees, longitude difference wrapped to +/-180.
    Euclidian,
}

impl InterpolatorType {
    /// Parse from string (case-insensitive). Unknown names yield `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GEODETIC" => Some(Self::Geodetic),
            "EUCLIDIAN" => Some(Self::Euclidian),
            _ => None,
        }
    }

    /// Get the type name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geodetic => "GEODETIC",
            Self::Euclidian => "EUCLIDIAN",
        }
    }
}

impl std::fmt::Display for InterpolatorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One geolocated pixel of an interpolation context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ContextPixel {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) lon: f64,
    pub(crate) lat: f64,
}

/// The 3x3 neighbourhood around a matched pixel.
#[derive(Debug, Clone, Default)]
pub struct InterpolationContext {
    center_x: i32,
    center_y: i32,
    pixels: Vec<ContextPixel>,
}

impl InterpolationContext {
    /// Collect pixel `(x, y)` and its eight neighbours from row-major
    /// geolocation arrays.
    ///
    /// Neighbours outside the raster and pixels with NaN geolocation are
    /// left out.
    pub fn extract(
        x: i32,
        y: i32,
        longitudes: &[f64],
        latitudes: &[f64],
        width: usize,
        height: usize,
    ) -> Self {
        let mut pixels = Vec::with_capacity(9);
        for py in (y - 1)..=(y + 1) {
            if py < 0 || py as usize >= height {
                continue;
            }
            for px in (x - 1)..=(x + 1) {
                if px < 0 || px as usize >= width {
                    continue;
                }
                let index = py as usize * width + px as usize;
                let (lon, lat) = match (longitudes.get(index), latitudes.get(index)) {
                    (Some(&lon), Some(&lat)) => (lon, lat),
                    _ => continue,
                };
                if lon.is_nan() || lat.is_nan() {
                    continue;
                }
                pixels.push(ContextPixel { x: px, y: py, lon, lat });
            }
        }

        Self {
            center_x: x,
            center_y: y,
            pixels,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub(crate) fn pixels(&self) -> &[ContextPixel] {
        &self.pixels
    }

    fn pixel_at(&self, x: i32, y: i32) -> Option<&ContextPixel> {
        self.pixels.iter().find(|p| p.x == x && p.y == y)
    }
}

/// Inverse-distance interpolator over an [`InterpolationContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XYInterpolator {
    interpolator_type: InterpolatorType,
}

impl XYInterpolator {
    pub fn new(interpolator_type: InterpolatorType) -> Self {
        Self { interpolator_type }
    }

    pub fn interpolator_type(&self) -> InterpolatorType {
        self.interpolator_type
    }

    /// Refine `pixel_pos` (a pixel index) for the query `geo_pos`.
    ///
    /// The result is in pixel index space; callers add the raster offset.
    pub fn interpolate(
        &self,
        geo_pos: &GeoPos,
        pixel_pos: PixelPos,
        context: &InterpolationContext,
    ) -> PixelPos {
        if context.is_empty() {
            return pixel_pos;
        }

        let metric = Metric::new(self.interpolator_type, geo_pos);
        let (cx, cy) = (context.center_x, context.center_y);
        let dx = toward_query(context, &metric, (cx - 1, cy), (cx + 1, cy));
        let dy = toward_query(context, &metric, (cx, cy - 1), (cx, cy + 1));

        let mut weight_sum = 0.0;
        let mut x_sum = 0.0;
        let mut y_sum = 0.0;
        for pixel in context.pixels() {
            let ox = pixel.x - cx;
            let oy = pixel.y - cy;
            if !(ox == 0 || ox == dx) || !(oy == 0 || oy == dy) {
                continue;
            }

            let distance = metric.distance(pixel.lon, pixel.lat);
            if distance < SNAP_DISTANCE {
                return PixelPos::new(pixel.x as f64, pixel.y as f64);
            }
            let weight = 1.0 / (distance * distance);
            weight_sum += weight;
            x_sum += weight * pixel.x as f64;
            y_sum += weight * pixel.y as f64;
        }

        if weight_sum > 0.0 {
            PixelPos::new(x_sum / weight_sum, y_sum / weight_sum)
        } else {
            pixel_pos
        }
    }
}

/// Offset (-1, 0 or 1) of the neighbour closer to the query.
fn toward_query(
    context: &InterpolationContext,
    metric: &Metric,
    before: (i32, i32),
    after: (i32, i32),
) -> i32 {
    let d_before = context
        .pixel_at(before.0, before.1)
        .map(|p| metric.distance(p.lon, p.lat));
    let d_after = context
        .pixel_at(after.0, after.1)
        .map(|p| metric.distance(p.lon, p.lat));

    match (d_before, d_after) {
        (Some(b), Some(a)) if a < b => 1,
        (Some(_), _) => -1,
        (None, Some(_)) => 1,
        (None, None) => 0,
    }
}

enum Metric {
    Geodetic(SphericalDistance),
    Euclidian { lon: f64, lat: f64 },
}

impl Metric {
    fn new(interpolator_type: InterpolatorType, geo_pos: &GeoPos) -> Self {
        match interpolator_type {
            InterpolatorType::Geodetic => {
                Self::Geodetic(SphericalDistance::new(geo_pos.lon, geo_pos.lat))
            }
            InterpolatorType::Euclidian => Self::Euclidian {
                lon: geo_pos.lon,
                lat: geo_pos.lat,
            },
        }
    }

    fn distance(&self, lon: f64, lat: f64) -> f64 {
        match self {
            Self::Geodetic(distance) => distance.distance(lon, lat),
            Self::Euclidian { lon: ref_lon, lat: ref_lat } => {
                let mut dlon = lon - ref_lon;
                if dlon > 180.0 {
                    dlon -= 360.0;
                } else if dlon < -180.0 {
                    dlon += 360.0;
                }
                let dlat = lat - ref_lat;
                (dlon * dlon + dlat * dlat).sqrt()
            }
        }
    }
}
