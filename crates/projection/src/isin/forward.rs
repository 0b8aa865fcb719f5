//! Geographic to global map transform.

use super::grid::{IsinGrid, IsinRow};
use super::point::IsinPoint;
use super::{HALF_PI, TWO_PI};
use crate::error::Result;

/// Forward ISIN transform: `(lon, lat)` in radians to map meters.
#[derive(Debug, Clone)]
pub struct IsinForward {
    grid: IsinGrid,
}

impl IsinForward {
    /// Validate the projection parameters and precompute the row table.
    ///
    /// # Arguments
    /// * `sphere` - Sphere radius (meters)
    /// * `lon_cen_mer` - Central meridian (radians)
    /// * `false_east` - False easting (meters)
    /// * `false_north` - False northing (meters)
    /// * `dzone` - Number of latitudinal rows pole to pole (even)
    /// * `djustify` - Row justification flag (0, 1 or 2)
    pub fn init(
        sphere: f64,
        lon_cen_mer: f64,
        false_east: f64,
        false_north: f64,
        dzone: f64,
        djustify: f64,
    ) -> Result<Self> {
        Ok(Self {
            grid: IsinGrid::new(sphere, lon_cen_mer, false_east, false_north, dzone, djustify)?,
        })
    }

    /// Transform a geographic point (`x` = lon, `y` = lat, radians).
    ///
    /// Non-finite input or a latitude beyond the poles yields an invalid point.
    pub fn transform(&self, point: IsinPoint) -> IsinPoint {
        let (lon, lat) = (point.x, point.y);
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > HALF_PI {
            return IsinPoint::invalid();
        }

        let grid = &self.grid;
        let y = grid.false_north + lat * grid.sphere;

        let IsinRow { ncol, icol_cen, .. } = *grid.row_for_lat(lat);

        let mut flon = lon - grid.ref_lon;
        if flon < 0.0 {
            flon += TWO_PI;
        }
        if flon > TWO_PI {
            flon -= TWO_PI;
        }

        let x = grid.false_east + grid.col_dist * (flon / TWO_PI * ncol as f64 - icol_cen as f64);

        IsinPoint::new(x, y)
    }

    /// Distance between column centers at the equator (meters).
    pub fn col_dist(&self) -> f64 {
        self.grid.col_dist
    }

    /// Number of rows pole to pole.
    pub fn nrow(&self) -> i64 {
        self.grid.nrow
    }
}
