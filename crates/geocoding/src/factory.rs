//! Construction of inverse codings from configuration.
//!
//! # Example
//!
//! ```rust,ignore
//! use geocoding::{build_inverse, GeocodingConfig};
//!
//! let config = GeocodingConfig::from_env();
//! let inverse = build_inverse(&config, &raster)?;
//! let pixel = inverse.pixel_pos(&GeoPos::new(53.55, 9.99));
//! ```

use geo_common::GeoRaster;
use tracing::debug;

use crate::config::{GeocodingConfig, InverseKind};
use crate::error::{GeocodingError, Result};
use crate::inverse::geo_index::PixelGeoIndexInverse;
use crate::inverse::quad_tree::PixelQuadTreeInverse;
use crate::inverse::InverseCoding;
use crate::raster_utils;

/// Create an uninitialized inverse coding for the configured strategy.
pub fn create_inverse(config: &GeocodingConfig) -> Box<dyn InverseCoding> {
    let interpolator = config.xy_interpolator();
    match config.inverse {
        InverseKind::QuadTree => Box::new(PixelQuadTreeInverse::new(interpolator)),
        InverseKind::GeoIndex => Box::new(PixelGeoIndexInverse::new(interpolator)),
    }
}

/// Create the configured inverse coding and initialize it for a raster.
///
/// Antimeridian crossing and pole locations are derived from the raster's
/// geolocation arrays.
pub fn build_inverse(config: &GeocodingConfig, raster: &GeoRaster) -> Result<Box<dyn InverseCoding>> {
    config.validate().map_err(GeocodingError::config)?;

    let (width, height) = (raster.raster_width, raster.raster_height);
    raster.validate()?;
    let anti_meridian = raster_utils::contains_anti_meridian(&raster.longitudes, width, height)?;
    let poles = raster_utils::pole_locations(
        &raster.longitudes,
        &raster.latitudes,
        width,
        height,
        raster.resolution_km,
    )?;

    let mut inverse = create_inverse(config);
    inverse.initialize(raster, anti_meridian, &poles)?;

    debug!(
        key = inverse.key(),
        anti_meridian,
        poles = poles.len(),
        "Built inverse coding"
    );
    Ok(inverse)
}
