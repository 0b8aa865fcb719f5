//! Configuration for inverse geocoding.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interpolation::{InterpolatorType, XYInterpolator};

/// Configuration for building an inverse coding.
///
/// Read once by the caller (usually through [`GeocodingConfig::from_env`])
/// and handed to [`crate::create_inverse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Inverse strategy.
    pub inverse: InverseKind,

    /// Distance metric for sub-pixel interpolation, `None` for nearest pixel.
    pub interpolator: Option<InterpolatorType>,

    /// Request sub-pixel results.
    pub fractional_accuracy: bool,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            inverse: InverseKind::QuadTree,
            interpolator: None,
            fractional_accuracy: false,
        }
    }
}

impl GeocodingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("GEOCODING_INVERSE") {
            config.inverse = InverseKind::from_str(&val);
            if !val.trim().eq_ignore_ascii_case(config.inverse.as_str()) {
                warn!(value = %val, fallback = %config.inverse, "Unknown inverse strategy");
            }
        }

        if let Some(val) = lookup("GEOCODING_INTERPOLATOR") {
            config.interpolator = InterpolatorType::from_str(&val);
            if config.interpolator.is_none() {
                warn!(value = %val, "Unknown interpolator type, using nearest pixel");
            }
        }

        if let Some(val) = lookup("GEOCODING_FRACTIONAL") {
            config.fractional_accuracy = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.fractional_accuracy && self.interpolator.is_none() {
            return Err("fractional_accuracy requires an interpolator type".to_string());
        }

        Ok(())
    }

    /// The interpolator to hand to an inverse strategy.
    ///
    /// Only present when fractional accuracy is requested and a metric is
    /// configured.
    pub fn xy_interpolator(&self) -> Option<XYInterpolator> {
        if !self.fractional_accuracy {
            return None;
        }
        self.interpolator.map(XYInterpolator::new)
    }
}

/// Inverse strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InverseKind {
    /// Segmented quad-tree search over the raster.
    QuadTree,
    /// Hash of quantized geo cells to raster regions.
    GeoIndex,
}

impl Default for InverseKind {
    fn default() -> Self {
        Self::QuadTree
    }
}

impl InverseKind {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "INV_PIXEL_QUAD_TREE" => Self::QuadTree,
            "INV_PIXEL_GEO_INDEX" => Self::GeoIndex,
            _ => Self::QuadTree,
        }
    }

    /// Get the strategy key as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuadTree => "INV_PIXEL_QUAD_TREE",
            Self::GeoIndex => "INV_PIXEL_GEO_INDEX",
        }
    }
}

impl std::fmt::Display for InverseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
