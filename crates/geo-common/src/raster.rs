//! Geolocation description of a raster.

use std::io::{Read, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::position::GeoPos;

/// Per-pixel (or tie-point) longitude/latitude arrays of a raster.
///
/// The arrays are row-major and shared through `Arc`, so inverse-coding
/// components can hold on to them without copying. A `GeoRaster` is never
/// mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoRaster {
    /// Longitudes in degrees, `raster_width * raster_height` values.
    pub longitudes: Arc<[f64]>,
    /// Latitudes in degrees, `raster_width * raster_height` values.
    pub latitudes: Arc<[f64]>,
    /// Width of the geolocation arrays (tie-point grid width when subsampled).
    pub raster_width: usize,
    /// Height of the geolocation arrays.
    pub raster_height: usize,
    /// Width of the full-resolution scene.
    pub scene_width: usize,
    /// Height of the full-resolution scene.
    pub scene_height: usize,
    /// Nominal pixel size in kilometers.
    pub resolution_km: f64,
    /// Pixel coordinate of the first geolocation sample (0.5 = pixel center).
    pub offset_x: f64,
    pub offset_y: f64,
    pub subsampling_x: f64,
    pub subsampling_y: f64,
}

impl GeoRaster {
    /// Create a raster description and check it for consistency.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        longitudes: impl Into<Arc<[f64]>>,
        latitudes: impl Into<Arc<[f64]>>,
        raster_width: usize,
        raster_height: usize,
        scene_width: usize,
        scene_height: usize,
        resolution_km: f64,
        offset_x: f64,
        offset_y: f64,
        subsampling_x: f64,
        subsampling_y: f64,
    ) -> GeoResult<Self> {
        let raster = Self {
            longitudes: longitudes.into(),
            latitudes: latitudes.into(),
            raster_width,
            raster_height,
            scene_width,
            scene_height,
            resolution_km,
            offset_x,
            offset_y,
            subsampling_x,
            subsampling_y,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Geolocation given for every pixel, sampled at the pixel centers.
    pub fn full_resolution(
        longitudes: impl Into<Arc<[f64]>>,
        latitudes: impl Into<Arc<[f64]>>,
        width: usize,
        height: usize,
        resolution_km: f64,
    ) -> GeoResult<Self> {
        Self::new(
            longitudes,
            latitudes,
            width,
            height,
            width,
            height,
            resolution_km,
            0.5,
            0.5,
            1.0,
            1.0,
        )
    }

    /// Check array sizes, dimensions and resolution.
    ///
    /// Rasters read through serde skip the constructor, so callers loading
    /// them from JSON should run this before use.
    pub fn validate(&self) -> GeoResult<()> {
        if self.raster_width == 0 || self.raster_height == 0 {
            return Err(GeoError::invalid_raster(format!(
                "raster dimensions must be > 0, got {}x{}",
                self.raster_width, self.raster_height
            )));
        }

        if self.scene_width == 0 || self.scene_height == 0 {
            return Err(GeoError::invalid_raster(format!(
                "scene dimensions must be > 0, got {}x{}",
                self.scene_width, self.scene_height
            )));
        }

        let expected = self.raster_width * self.raster_height;
        if self.longitudes.len() != expected || self.latitudes.len() != expected {
            return Err(GeoError::invalid_raster(format!(
                "expected {} geolocation values, got {} longitudes and {} latitudes",
                expected,
                self.longitudes.len(),
                self.latitudes.len()
            )));
        }

        if !(self.resolution_km.is_finite() && self.resolution_km > 0.0) {
            return Err(GeoError::invalid_argument(
                "resolution_km",
                format!("must be a positive number, got {}", self.resolution_km),
            ));
        }

        Ok(())
    }

    /// Read a JSON-encoded raster and validate it.
    pub fn from_json_reader<R: Read>(reader: R) -> GeoResult<Self> {
        let raster: Self = serde_json::from_reader(reader)?;
        raster.validate()?;
        Ok(raster)
    }

    /// Write the raster as JSON.
    ///
    /// NaN geolocation is written as `null` and cannot be read back.
    pub fn write_json<W: Write>(&self, mut writer: W) -> GeoResult<()> {
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// True when the arrays hold one sample per scene pixel.
    pub fn is_full_resolution(&self) -> bool {
        self.raster_width == self.scene_width && self.raster_height == self.scene_height
    }

    /// Geolocation sample at array position `(x, y)`.
    ///
    /// Positions outside the arrays yield an invalid `GeoPos`.
    pub fn geo_pos(&self, x: usize, y: usize) -> GeoPos {
        if x >= self.raster_width || y >= self.raster_height {
            return GeoPos::invalid();
        }
        let index = y * self.raster_width + x;
        GeoPos::new(self.latitudes[index], self.longitudes[index])
    }
}
