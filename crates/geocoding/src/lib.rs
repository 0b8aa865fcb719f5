//! Inverse geocoding for swath and grid geolocation rasters.
//!
//! Given per-pixel longitude/latitude arrays, this crate answers the
//! question "which pixel covers this geographic position?". Two strategies
//! are provided:
//!
//! - **Quad tree** ([`PixelQuadTreeInverse`]): the raster is cut into
//!   segments that never straddle the antimeridian or a pole, and each
//!   lookup descends into the segments whose geographic box contains the
//!   query.
//! - **Geo index** ([`PixelGeoIndexInverse`]): every pixel is hashed into a
//!   lon/lat cell sized after the raster resolution, so a lookup only
//!   scans the pixels of a few cells.
//!
//! Both return the nearest pixel centre, or a fractional position when an
//! [`XYInterpolator`] is attached.
//!
//! # Architecture
//!
//! ```text
//! GeocodingConfig ──► create_inverse() ──► Box<dyn InverseCoding>
//!                                               │
//! GeoRaster ──► raster_utils (antimeridian, poles) ──► initialize()
//!                                               │
//! GeoPos ───────────────────────────────► pixel_pos() ──► PixelPos
//! ```
//!
//! # Example
//!
//! ```ignore
//! use geocoding::{build_inverse, GeocodingConfig};
//! use geo_common::GeoPos;
//!
//! let inverse = build_inverse(&GeocodingConfig::default(), &raster)?;
//! let pixel = inverse.pixel_pos(&GeoPos::new(53.55, 9.99));
//! if pixel.is_valid() {
//!     println!("x = {}, y = {}", pixel.x, pixel.y);
//! }
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod interpolation;
pub mod inverse;
pub mod raster_utils;

// Re-export commonly used types at crate root
pub use config::{GeocodingConfig, InverseKind};
pub use error::{GeocodingError, Result};
pub use factory::{build_inverse, create_inverse};
pub use interpolation::{InterpolationContext, InterpolatorType, XYInterpolator};
pub use inverse::geo_index::{PixelGeoIndexInverse, RasterRegion};
pub use inverse::quad_tree::PixelQuadTreeInverse;
pub use inverse::segment::{Segment, SegmentCoverage};
pub use inverse::{GeoPosCalculator, InverseCoding};
