//! Error types for projection setup.

use thiserror::Error;

/// Errors raised while configuring a projection.
///
/// Transforms themselves never fail; only initialization does.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A projection parameter is outside its valid domain.
    #[error("invalid projection parameter '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    /// Tile indices outside the global tiling scheme.
    #[error("tile ({tile_col}, {tile_line}) is outside the {ncols}x{nlines} tiling")]
    TileOutOfRange {
        tile_col: i32,
        tile_line: i32,
        ncols: i32,
        nlines: i32,
    },

    /// Unknown grid name.
    #[error("unsupported raster: {0}")]
    UnsupportedRaster(String),
}

impl ProjectionError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
