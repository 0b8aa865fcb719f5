//! Ready-made geolocation rasters and reference positions.

use std::f64::consts::PI;

use geo_common::{GeoRaster, MEAN_EARTH_RADIUS};

use crate::generators::{anti_meridian_grid, linear_grid, polar_grid, rotated_swath};

/// Well-known positions as `(lon, lat)` in degrees.
pub mod places {
    pub const HAMBURG: (f64, f64) = (9.993682, 53.551086);
    pub const CAPE_OF_GOOD_HOPE: (f64, f64) = (-18.49755, -34.357203);
    pub const GREEN_PATCH: (f64, f64) = (-58.130897, -51.557058);
    pub const TATOOSH: (f64, f64) = (-124.736636, 48.391578);
    pub const NEAR_NORTH_POLE: (f64, f64) = (116.8765, 89.45673);
}

/// Ground distance in kilometers of `step` degrees along a meridian.
pub fn step_to_km(step: f64) -> f64 {
    step * PI / 180.0 * MEAN_EARTH_RADIUS / 1000.0
}

fn raster(
    lons: Vec<f64>,
    lats: Vec<f64>,
    width: usize,
    height: usize,
    resolution_km: f64,
) -> GeoRaster {
    match GeoRaster::full_resolution(lons, lats, width, height, resolution_km) {
        Ok(raster) => raster,
        Err(e) => panic!("invalid test raster: {}", e),
    }
}

/// 40x30 pixel grid over central Europe, 0.1 degree spacing, starting at
/// (10 E, 50 N).
pub fn linear_raster() -> GeoRaster {
    let (lons, lats) = linear_grid(40, 30, 10.0, 50.0, 0.1);
    raster(lons, lats, 40, 30, step_to_km(0.1))
}

/// 60x50 pixel swath centred on (5 E, 45 N), 0.05 degree spacing, rotated
/// by 20 degrees.
pub fn rotated_raster() -> GeoRaster {
    let (lons, lats) = rotated_swath(60, 50, 5.0, 45.0, 0.05, 20.0);
    raster(lons, lats, 60, 50, step_to_km(0.05))
}

/// 40x20 pixel grid starting at 178 E, crossing the antimeridian at
/// column 20.
pub fn anti_meridian_raster() -> GeoRaster {
    let (lons, lats) = anti_meridian_grid(40, 20, 178.0, 10.0, 0.1);
    raster(lons, lats, 40, 20, step_to_km(0.1))
}

/// 41x41 pixel azimuthal grid with the north pole on pixel (20, 20).
///
/// The nominal resolution is slightly below the pixel spacing so that only
/// the centre pixel is close enough to the pole to count as a pole
/// location.
pub fn polar_raster() -> GeoRaster {
    let (lons, lats) = polar_grid(41, 41, 0.1);
    raster(lons, lats, 41, 41, 11.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_to_km() {
        assert!((step_to_km(1.0) - 111.19487).abs() < 1e-4);
    }

    #[test]
    fn test_fixtures_are_valid() {
        for raster in [linear_raster(), rotated_raster(), anti_meridian_raster(), polar_raster()] {
            raster.validate().unwrap();
            assert!(raster.is_full_resolution());
        }
    }

    #[test]
    fn test_anti_meridian_raster_wraps() {
        let raster = anti_meridian_raster();
        assert!(raster.longitudes[19] > 179.0);
        assert!(raster.longitudes[21] < -179.0);
    }
}
