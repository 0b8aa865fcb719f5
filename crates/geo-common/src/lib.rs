//! Common types and utilities shared across the geocoding crates.

pub mod distance;
pub mod error;
pub mod position;
pub mod raster;

pub use distance::{SphericalDistance, MEAN_EARTH_RADIUS, WGS84_MEAN_RADIUS_KM};
pub use error::{GeoError, GeoResult};
pub use position::{GeoPos, PixelPos};
pub use raster::GeoRaster;
