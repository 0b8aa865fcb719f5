//! Inverse geocoding strategies: geographic position to pixel position.
//!
//! Both strategies are built once from a [`GeoRaster`] and then answer
//! lookups through `&self`, so an initialized instance can be shared
//! between threads.

pub mod geo_index;
pub mod quad_tree;
pub mod segment;

use std::fmt;

use geo_common::{GeoPos, GeoRaster, PixelPos};

use crate::error::{GeocodingError, Result};

/// Pixel-indexed access to geolocation.
pub trait GeoPosCalculator {
    /// Geolocation of pixel `(x, y)`, invalid outside the raster.
    fn geo_pos_at(&self, x: i32, y: i32) -> GeoPos;
}

impl GeoPosCalculator for GeoRaster {
    fn geo_pos_at(&self, x: i32, y: i32) -> GeoPos {
        if x < 0 || y < 0 {
            return GeoPos::invalid();
        }
        self.geo_pos(x as usize, y as usize)
    }
}

/// Common interface of the inverse strategies.
pub trait InverseCoding: Send + Sync + fmt::Debug {
    /// Strategy key, with an `_INTERPOLATING` suffix when sub-pixel
    /// interpolation is enabled.
    fn key(&self) -> &'static str;

    /// Build the search structures for a raster.
    ///
    /// `pole_locations` lists pixels at which a pole lies inside the swath;
    /// strategies that cannot cope with them exclude the area around them.
    fn initialize(
        &mut self,
        raster: &GeoRaster,
        contains_anti_meridian: bool,
        pole_locations: &[PixelPos],
    ) -> Result<()>;

    /// Pixel position of a geographic position, invalid when nothing matches
    /// or the instance is not initialized.
    fn pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos;

    /// Geolocation of a pixel read from the raster arrays.
    fn geo_pos(&self, pixel_x: i32, pixel_y: i32) -> GeoPos;

    fn clone_boxed(&self) -> Box<dyn InverseCoding>;

    /// Release this instance's search structures and raster arrays.
    fn dispose(&mut self);
}

impl Clone for Box<dyn InverseCoding> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Best pixel seen so far during a search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchResult {
    pub x: i32,
    pub y: i32,
    pub delta: f64,
}

impl SearchResult {
    pub fn new() -> Self {
        Self {
            x: -1,
            y: -1,
            delta: f64::MAX,
        }
    }

    /// Take the candidate if it is strictly closer.
    pub fn update(&mut self, x: i32, y: i32, delta: f64) -> bool {
        if delta < self.delta {
            self.x = x;
            self.y = y;
            self.delta = delta;
            true
        } else {
            false
        }
    }
}

/// Check that a raster carries usable per-pixel geolocation.
pub(crate) fn check_raster(raster: &GeoRaster) -> Result<()> {
    raster.validate()?;
    if !raster.is_full_resolution() {
        return Err(GeocodingError::invalid_raster(format!(
            "inverse coding needs one geolocation per pixel, got {}x{} samples for a {}x{} scene",
            raster.raster_width, raster.raster_height, raster.scene_width, raster.scene_height
        )));
    }
    if raster.raster_width > i32::MAX as usize || raster.raster_height > i32::MAX as usize {
        return Err(GeocodingError::invalid_raster(format!(
            "raster of {}x{} pixels is too large",
            raster.raster_width, raster.raster_height
        )));
    }
    Ok(())
}
