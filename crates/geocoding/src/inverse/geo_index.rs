//! Geo-index inverse coding.
//!
//! Every valid pixel is hashed into a cell of a regular lon/lat grid whose
//! spacing follows the raster resolution. Each cell keeps the pixel
//! bounding box of the pixels that fell into it, so a lookup only scans a
//! handful of pixels.

use std::collections::BTreeMap;
use std::sync::Arc;

use geo_common::{GeoPos, GeoRaster, PixelPos, SphericalDistance, MEAN_EARTH_RADIUS};
use tracing::debug;

use super::{check_raster, GeoPosCalculator, InverseCoding, SearchResult};
use crate::error::Result;
use crate::interpolation::{InterpolationContext, XYInterpolator};

pub const KEY: &str = "INV_PIXEL_GEO_INDEX";
pub const KEY_INTERPOLATING: &str = "INV_PIXEL_GEO_INDEX_INTERPOLATING";

/// Stride between longitude cells in an index key.
const LON_STRIDE: i64 = 100_000;

/// Pixel bounding box of the pixels hashed into one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterRegion {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl RasterRegion {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    pub fn extend(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }
}

/// Cell-hash inverse over per-pixel geolocation.
#[derive(Debug, Clone)]
pub struct PixelGeoIndexInverse {
    interpolator: Option<XYInterpolator>,
    state: Option<GeoIndexState>,
}

#[derive(Debug, Clone)]
struct GeoIndexState {
    raster: GeoRaster,
    index: Arc<BTreeMap<i64, RasterRegion>>,
    multiplicator: f64,
    /// Acceptance distance in meters.
    epsilon: f64,
    /// One pixel in degrees of latitude.
    lat_footprint: f64,
}

impl PixelGeoIndexInverse {
    pub fn new(interpolator: Option<XYInterpolator>) -> Self {
        Self {
            interpolator,
            state: None,
        }
    }

    /// Cells per degree for a pixel size in kilometers.
    pub fn multiplicator(resolution_km: f64) -> f64 {
        if resolution_km > 33.3 {
            1.0
        } else if resolution_km <= 0.333 {
            100.0
        } else {
            100.0 / (3.0 * resolution_km)
        }
    }

    /// Index key of the cell containing `(lon, lat)`.
    ///
    /// Coordinates are clamped to the valid lon/lat range first.
    pub fn to_index(lon: f64, lat: f64, multiplicator: f64) -> i64 {
        let lon = lon.clamp(-180.0, 180.0);
        let lat = lat.clamp(-90.0, 90.0);
        let lon_idx = ((lon + 180.0) * multiplicator).floor() as i64;
        let lat_idx = ((lat + 90.0) * multiplicator).floor() as i64;
        LON_STRIDE * lon_idx + lat_idx
    }

    /// Number of occupied cells, zero before initialization.
    pub fn cell_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.index.len())
    }
}

impl Default for PixelGeoIndexInverse {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InverseCoding for PixelGeoIndexInverse {
    fn key(&self) -> &'static str {
        if self.interpolator.is_some() {
            KEY_INTERPOLATING
        } else {
            KEY
        }
    }

    fn initialize(
        &mut self,
        raster: &GeoRaster,
        _contains_anti_meridian: bool,
        _pole_locations: &[PixelPos],
    ) -> Result<()> {
        check_raster(raster)?;

        let multiplicator = Self::multiplicator(raster.resolution_km);
        let width = raster.raster_width;
        let mut index: BTreeMap<i64, RasterRegion> = BTreeMap::new();
        for (i, (&lon, &lat)) in raster
            .longitudes
            .iter()
            .zip(raster.latitudes.iter())
            .enumerate()
        {
            if lon.is_nan() || lat.is_nan() {
                continue;
            }
            let x = (i % width) as i32;
            let y = (i / width) as i32;
            index
                .entry(Self::to_index(lon, lat, multiplicator))
                .and_modify(|region| region.extend(x, y))
                .or_insert_with(|| RasterRegion::new(x, y));
        }

        let epsilon = raster.resolution_km * 1000.0 / 2.0_f64.sqrt();
        let lat_footprint = (raster.resolution_km * 1000.0 / MEAN_EARTH_RADIUS).to_degrees();

        debug!(
            cells = index.len(),
            multiplicator, epsilon, "Initialized geo-index inverse"
        );

        self.state = Some(GeoIndexState {
            raster: raster.clone(),
            index: Arc::new(index),
            multiplicator,
            epsilon,
            lat_footprint,
        });
        Ok(())
    }

    fn pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        let Some(state) = &self.state else {
            return PixelPos::invalid();
        };
        if !geo_pos.is_valid() {
            return PixelPos::invalid();
        }

        let mut best: Option<(i32, i32)> = None;
        let mut min_delta = f64::MAX;
        for key in state.candidate_cells(geo_pos) {
            let Some(region) = state.index.get(&key) else {
                continue;
            };
            if let Some((x, y, delta)) = state.closest_in_region(region, geo_pos) {
                if delta < min_delta {
                    min_delta = delta;
                    best = Some((x, y));
                }
            }
        }

        let Some((x, y)) = best else {
            return PixelPos::invalid();
        };

        let raster = &state.raster;
        let found = raster.geo_pos_at(x, y);
        let distance = SphericalDistance::new(geo_pos.lon, geo_pos.lat).distance(found.lon, found.lat)
            * MEAN_EARTH_RADIUS;
        if !(distance < state.epsilon) {
            return PixelPos::invalid();
        }

        let pixel = match &self.interpolator {
            Some(interpolator) => {
                let context = InterpolationContext::extract(
                    x,
                    y,
                    &raster.longitudes,
                    &raster.latitudes,
                    raster.raster_width,
                    raster.raster_height,
                );
                interpolator.interpolate(geo_pos, PixelPos::new(x as f64, y as f64), &context)
            }
            None => PixelPos::new(x as f64, y as f64),
        };

        PixelPos::new(pixel.x + raster.offset_x, pixel.y + raster.offset_y)
    }

    fn geo_pos(&self, pixel_x: i32, pixel_y: i32) -> GeoPos {
        match &self.state {
            Some(state) => state.raster.geo_pos_at(pixel_x, pixel_y),
            None => GeoPos::invalid(),
        }
    }

    fn clone_boxed(&self) -> Box<dyn InverseCoding> {
        Box::new(self.clone())
    }

    fn dispose(&mut self) {
        self.state = None;
    }
}

impl GeoIndexState {
    /// Keys of the query cell followed by the neighbour cells that lie
    /// within one pixel footprint of the query.
    fn candidate_cells(&self, geo_pos: &GeoPos) -> Vec<i64> {
        let lat_fp = self.lat_footprint;
        let cos_lat = geo_pos.lat.to_radians().cos().abs();
        let lon_fp = if cos_lat > 1e-6 {
            (lat_fp / cos_lat).min(180.0)
        } else {
            180.0
        };

        let mut keys = Vec::with_capacity(9);
        for dlat in [0.0, -lat_fp, lat_fp] {
            for dlon in [0.0, -lon_fp, lon_fp] {
                let key = PixelGeoIndexInverse::to_index(
                    wrap_lon(geo_pos.lon + dlon),
                    geo_pos.lat + dlat,
                    self.multiplicator,
                );
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        keys
    }

    /// Closest pixel of a region with its squared degree distance.
    fn closest_in_region(&self, region: &RasterRegion, geo_pos: &GeoPos) -> Option<(i32, i32, f64)> {
        if region.is_point() {
            let pos = self.raster.geo_pos_at(region.min_x, region.min_y);
            return Some((region.min_x, region.min_y, squared_distance(&pos, geo_pos)));
        }

        let mut result = SearchResult::new();
        for y in region.min_y..=region.max_y {
            for x in region.min_x..=region.max_x {
                let pos = self.raster.geo_pos_at(x, y);
                result.update(x, y, squared_distance(&pos, geo_pos));
            }
        }

        if result.x < 0 {
            None
        } else {
            Some((result.x, result.y, result.delta))
        }
    }
}

fn wrap_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Squared degree distance with the longitude difference wrapped to +/-180.
fn squared_distance(pos: &GeoPos, query: &GeoPos) -> f64 {
    let d_lon = wrap_lon(pos.lon - query.lon);
    let d_lat = pos.lat - query.lat;
    d_lon * d_lon + d_lat * d_lat
}
