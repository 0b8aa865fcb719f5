//! Global map to geographic transform.

use std::f64::consts::PI;

use super::grid::{IsinGrid, IsinRow};
use super::point::IsinPoint;
use super::{HALF_PI, TWO_PI};
use crate::error::Result;

/// Tolerance in columns when checking that a map point lies on its row.
const EPS_COL: f64 = 1e-6;

/// Inverse ISIN transform: map meters to `(lon, lat)` in radians.
#[derive(Debug, Clone)]
pub struct IsinInverse {
    grid: IsinGrid,
}

impl IsinInverse {
    /// Validate the projection parameters and precompute the row table.
    ///
    /// Takes the same arguments as [`super::IsinForward::init`].
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

    /// Transform a map point (meters) to `x` = lon, `y` = lat in radians.
    ///
    /// Points north or south of the poles, or outside the sinusoidal
    /// outline of their row, yield an invalid point.
    pub fn transform(&self, point: IsinPoint) -> IsinPoint {
        let grid = &self.grid;

        let lat = (point.y - grid.false_north) * grid.sphere_inv;
        if !(-HALF_PI..=HALF_PI).contains(&lat) || !point.x.is_finite() {
            return IsinPoint::invalid();
        }

        let IsinRow {
            ncol,
            icol_cen,
            ncol_inv,
        } = *grid.row_for_lat(lat);

        let col = (point.x - grid.false_east) * grid.col_dist_inv + icol_cen as f64;
        if col < -EPS_COL || col > ncol as f64 + EPS_COL {
            return IsinPoint::invalid();
        }

        let mut lon = grid.ref_lon + col * ncol_inv * TWO_PI;
        if lon < -PI {
            lon += TWO_PI;
        }
        if lon > PI {
            lon -= TWO_PI;
        }

        IsinPoint::new(lon, lat)
    }
}
