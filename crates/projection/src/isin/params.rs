//! Fixed parameters of the supported global grids.

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Sphere radius of the MODIS sinusoidal grids (meters).
pub(crate) const ISIN_SPHERE: f64 = 6371007.181;

/// Supported global grid resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Raster {
    Grid1Km,
    Grid500M,
    Grid250M,
}

impl Raster {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Result<Self, ProjectionError> {
        match s.to_lowercase().as_str() {
            "1km" | "grid_1_km" => Ok(Self::Grid1Km),
            "500m" | "grid_500_m" => Ok(Self::Grid500M),
            "250m" | "grid_250_m" => Ok(Self::Grid250M),
            _ => Err(ProjectionError::UnsupportedRaster(s.to_string())),
        }
    }

    /// Get the grid name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid1Km => "1km",
            Self::Grid500M => "500m",
            Self::Grid250M => "250m",
        }
    }

    /// The fixed projection configuration of this grid.
    pub fn projection_param(&self) -> &'static ProjectionParam {
        match self {
            Self::Grid1Km => &PROJECTION_PARAMS[0],
            Self::Grid500M => &PROJECTION_PARAMS[1],
            Self::Grid250M => &PROJECTION_PARAMS[2],
        }
    }
}

impl std::fmt::Display for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// ISIN variant, named after the MODIS grid letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionType {
    /// 1 km
    IsinK,
    /// 500 m ("half")
    IsinH,
    /// 250 m ("quarter")
    IsinQ,
}

/// Static configuration of one global grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionParam {
    pub projection: ProjectionType,
    /// Rows pole to pole.
    pub nrow: u32,
    /// Tile lines (north to south).
    pub ntile_line: u32,
    /// Tile columns (west to east).
    pub ntile_samp: u32,
    /// Pixels along one tile edge.
    pub tile_dim: u32,
    pub sphere: f64,
    pub lon_cen_mer: f64,
    pub false_east: f64,
    pub false_north: f64,
    pub djustify: f64,
}

static PROJECTION_PARAMS: [ProjectionParam; 3] = [
    ProjectionParam {
        projection: ProjectionType::IsinK,
        nrow: 21600,
        ntile_line: 18,
        ntile_samp: 36,
        tile_dim: 1200,
        sphere: ISIN_SPHERE,
        lon_cen_mer: 0.0,
        false_east: 0.0,
        false_north: 0.0,
        djustify: 1.0,
    },
    ProjectionParam {
        projection: ProjectionType::IsinH,
        nrow: 43200,
        ntile_line: 18,
        ntile_samp: 36,
        tile_dim: 2400,
        sphere: ISIN_SPHERE,
        lon_cen_mer: 0.0,
        false_east: 0.0,
        false_north: 0.0,
        djustify: 1.0,
    },
    ProjectionParam {
        projection: ProjectionType::IsinQ,
        nrow: 86400,
        ntile_line: 18,
        ntile_samp: 36,
        tile_dim: 4800,
        sphere: ISIN_SPHERE,
        lon_cen_mer: 0.0,
        false_east: 0.0,
        false_north: 0.0,
        djustify: 1.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_param() {
        let param = Raster::Grid1Km.projection_param();
        assert_eq!(param.ntile_line, 18);
        assert_eq!(param.projection, ProjectionType::IsinK);

        let param = Raster::Grid500M.projection_param();
        assert_eq!(param.ntile_line, 18);
        assert_eq!(param.projection, ProjectionType::IsinH);

        let param = Raster::Grid250M.projection_param();
        assert_eq!(param.ntile_line, 18);
        assert_eq!(param.projection, ProjectionType::IsinQ);
    }

    #[test]
    fn test_projection_param_is_static() {
        let a = Raster::Grid500M.projection_param();
        let b = Raster::Grid500M.projection_param();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_raster_from_str() {
        assert_eq!(Raster::from_str("1KM").unwrap(), Raster::Grid1Km);
        assert_eq!(Raster::from_str("grid_500_m").unwrap(), Raster::Grid500M);
        assert_eq!(Raster::from_str("250m").unwrap(), Raster::Grid250M);
        assert!(matches!(
            Raster::from_str("2km"),
            Err(ProjectionError::UnsupportedRaster(_))
        ));
        assert_eq!(Raster::Grid250M.to_string(), "250m");
    }
}
