//! Validated ISIN parameters and the per-row column table.

use std::f64::consts::PI;

use tracing::debug;

use super::{HALF_PI, TWO_PI};
use crate::error::{ProjectionError, Result};

/// Smallest accepted sphere radius (meters).
const EPS_SPHERE: f64 = 1e-10;
/// Tolerance for values that must be (near) integers.
const EPS_CNVT: f64 = 0.01;
/// Largest accepted number of rows: one row per arc second.
const NROW_MAX: i64 = 360 * 3600;

/// Column geometry of one latitude band in the northern hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsinRow {
    /// Number of columns in the band.
    pub ncol: i64,
    /// Column index of the central meridian.
    pub icol_cen: i64,
    /// `1 / ncol`
    pub ncol_inv: f64,
}

/// State shared by the forward and inverse transforms.
#[derive(Debug, Clone)]
pub(crate) struct IsinGrid {
    pub(crate) false_east: f64,
    pub(crate) false_north: f64,
    pub(crate) sphere: f64,
    pub(crate) sphere_inv: f64,
    pub(crate) ang_size_inv: f64,
    pub(crate) nrow: i64,
    pub(crate) nrow_half: i64,
    pub(crate) lon_cen_mer: f64,
    pub(crate) ref_lon: f64,
    pub(crate) col_dist: f64,
    pub(crate) col_dist_inv: f64,
    pub(crate) ijustify: i64,
    pub(crate) rows: Vec<IsinRow>,
}

impl IsinGrid {
    /// Validate the parameters and build the row table.
    ///
    /// # Arguments
    /// * `sphere` - Sphere radius (meters)
    /// * `lon_cen_mer` - Central meridian (radians, within +/- 2 PI)
    /// * `false_east` / `false_north` - Map offsets (meters)
    /// * `dzone` - Number of rows pole to pole, an even integer
    /// * `djustify` - Row justification: 0, 1 or 2
    pub(crate) fn new(
        sphere: f64,
        lon_cen_mer: f64,
        false_east: f64,
        false_north: f64,
        dzone: f64,
        djustify: f64,
    ) -> Result<Self> {
        if !(sphere > EPS_SPHERE) {
            return Err(ProjectionError::invalid_argument(
                "sphere",
                format!("radius {} is too small", sphere),
            ));
        }

        if !(-TWO_PI..=TWO_PI).contains(&lon_cen_mer) {
            return Err(ProjectionError::invalid_argument(
                "lon_cen_mer",
                format!("{} is outside [-2 PI, 2 PI]", lon_cen_mer),
            ));
        }
        let lon_cen_mer = if lon_cen_mer < -PI {
            lon_cen_mer + TWO_PI
        } else if lon_cen_mer > PI {
            lon_cen_mer - TWO_PI
        } else {
            lon_cen_mer
        };

        if !(dzone >= 2.0 - EPS_CNVT && dzone <= NROW_MAX as f64 + EPS_CNVT) {
            return Err(ProjectionError::invalid_argument(
                "dzone",
                format!("{} is outside [2, {}]", dzone, NROW_MAX),
            ));
        }
        let nrow = (dzone + EPS_CNVT) as i64;
        if (dzone - nrow as f64).abs() > EPS_CNVT {
            return Err(ProjectionError::invalid_argument(
                "dzone",
                format!("{} is not an integer", dzone),
            ));
        }
        if nrow % 2 != 0 {
            return Err(ProjectionError::invalid_argument(
                "dzone",
                format!("{} is not an even number of rows", nrow),
            ));
        }

        if !(djustify >= -EPS_CNVT && djustify <= 2.0 + EPS_CNVT) {
            return Err(ProjectionError::invalid_argument(
                "djustify",
                format!("{} is outside [0, 2]", djustify),
            ));
        }
        let ijustify = (djustify + EPS_CNVT) as i64;
        if (djustify - ijustify as f64).abs() > EPS_CNVT {
            return Err(ProjectionError::invalid_argument(
                "djustify",
                format!("{} is not one of 0, 1, 2", djustify),
            ));
        }

        let nrow_half = nrow / 2;
        let rows: Vec<IsinRow> = (0..nrow_half)
            .map(|i| {
                let clat = HALF_PI * (1.0 - (i as f64 + 0.5) / nrow_half as f64);
                let ncol = if ijustify < 2 {
                    (2.0 * clat.cos() * nrow as f64 + 0.5) as i64
                } else {
                    (clat.cos() * nrow as f64 + 0.5) as i64 * 2
                };
                let ncol = ncol.max(1);
                let icol_cen = if ijustify == 1 {
                    (ncol + 1) / 2
                } else {
                    ncol / 2
                };
                IsinRow {
                    ncol,
                    icol_cen,
                    ncol_inv: 1.0 / ncol as f64,
                }
            })
            .collect();

        let mut ref_lon = lon_cen_mer - PI;
        if ref_lon < -PI {
            ref_lon += TWO_PI;
        }

        // the equatorial row is the widest one
        let col_dist = TWO_PI * sphere / rows[(nrow_half - 1) as usize].ncol as f64;

        debug!(nrow, ijustify, col_dist, "Initialized ISIN grid");

        Ok(Self {
            false_east,
            false_north,
            sphere,
            sphere_inv: 1.0 / sphere,
            ang_size_inv: nrow as f64 / PI,
            nrow,
            nrow_half,
            lon_cen_mer,
            ref_lon,
            col_dist,
            col_dist_inv: 1.0 / col_dist,
            ijustify,
            rows,
        })
    }

    /// Row table entry for a latitude in radians.
    ///
    /// Southern rows mirror the northern ones.
    pub(crate) fn row_for_lat(&self, lat: f64) -> &IsinRow {
        let mut irow = ((HALF_PI - lat) * self.ang_size_inv) as i64;
        if irow >= self.nrow_half {
            irow = self.nrow - 1 - irow;
        }
        let irow = irow.clamp(0, self.nrow_half - 1);
        &self.rows[irow as usize]
    }
}
