//! Integerized Sinusoidal (ISIN) projection.
//!
//! The sinusoidal projection is equal-area; the integerized variant snaps
//! every latitude band ("row") to a whole number of columns so that grid
//! cells stay nearly equal in size while the column count shrinks towards
//! the poles. Each row keeps its column count, its central column and the
//! inverse column count in a precomputed table.
//!
//! Three layers:
//! - [`IsinForward`] / [`IsinInverse`]: radians <-> global map meters
//! - [`IsinApi`]: degrees <-> global map <-> tile image coordinates
//! - [`Raster`] / [`ProjectionParam`]: the fixed 1 km / 500 m / 250 m grids

mod api;
mod forward;
mod grid;
mod inverse;
mod params;
mod point;

pub use api::{IsinApi, TileGeoLocations};
pub use forward::IsinForward;
pub use grid::IsinRow;
pub use inverse::IsinInverse;
pub use params::{ProjectionParam, ProjectionType, Raster};
pub use point::IsinPoint;

pub(crate) const TWO_PI: f64 = std::f64::consts::TAU;
pub(crate) const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;
