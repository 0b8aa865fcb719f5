//! Error types for inverse geocoding.

use geo_common::GeoError;
use thiserror::Error;

/// Errors that can occur while building or configuring an inverse coding.
///
/// Lookups that find no pixel are not errors; they return an invalid
/// `PixelPos`.
#[derive(Error, Debug)]
pub enum GeocodingError {
    /// An argument violates the contract of the called operation.
    #[error("invalid argument '{param}': {message}")]
    InvalidArgument { param: String, message: String },

    /// An internal operation was invoked in a state it does not support.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The geolocation raster cannot be used for inverse coding.
    #[error("invalid raster: {0}")]
    InvalidRaster(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GeocodingError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create an IllegalState error.
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    /// Create an InvalidRaster error.
    pub fn invalid_raster(msg: impl Into<String>) -> Self {
        Self::InvalidRaster(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<GeoError> for GeocodingError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::InvalidArgument { param, message } => Self::InvalidArgument { param, message },
            other => Self::InvalidRaster(other.to_string()),
        }
    }
}

/// Result type alias for geocoding operations.
pub type Result<T> = std::result::Result<T, GeocodingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GeocodingError::invalid_argument("column", "12 is outside (0, 10)");
        assert_eq!(err.to_string(), "invalid argument 'column': 12 is outside (0, 10)");

        let err = GeocodingError::illegal_state("segment is inside");
        assert_eq!(err.to_string(), "illegal state: segment is inside");

        let err = GeocodingError::invalid_raster("empty raster");
        assert_eq!(err.to_string(), "invalid raster: empty raster");

        let err = GeocodingError::config("fractional accuracy needs a metric");
        assert_eq!(
            err.to_string(),
            "configuration error: fractional accuracy needs a metric"
        );
    }

    #[test]
    fn test_from_geo_error() {
        let err: GeocodingError = GeoError::invalid_raster("0x0").into();
        assert!(matches!(err, GeocodingError::InvalidRaster(_)));

        let err: GeocodingError = GeoError::invalid_argument("resolution_km", "negative").into();
        assert!(matches!(err, GeocodingError::InvalidArgument { .. }));
    }
}
