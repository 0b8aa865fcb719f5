//! Coordinate transformations for global tiled grids.
//!
//! Implements the Integerized Sinusoidal (ISIN) projection used by
//! MODIS-style 1 km / 500 m / 250 m tile grids, from scratch and without
//! external geodesy dependencies.

pub mod error;
pub mod isin;

pub use error::{ProjectionError, Result};
pub use isin::{
    IsinApi, IsinForward, IsinInverse, IsinPoint, ProjectionParam, ProjectionType, Raster,
    TileGeoLocations,
};
