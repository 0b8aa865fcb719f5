//! Great-circle distance on the sphere.

/// Mean Earth radius in meters used for geocoding tolerances.
pub const MEAN_EARTH_RADIUS: f64 = 6_370_997.0;

/// Mean of the WGS84 semi-major and semi-minor axes in kilometers.
pub const WGS84_MEAN_RADIUS_KM: f64 = 6367.444657;

/// Angular distance from a fixed reference point.
///
/// The reference is converted to radians once, so repeated calls against
/// many candidates only pay for the haversine of the candidate.
#[derive(Debug, Clone, Copy)]
pub struct SphericalDistance {
    lon: f64,
    lat: f64,
    cos_lat: f64,
}

impl SphericalDistance {
    /// Create a distance calculator for the reference point (degrees).
    pub fn new(lon: f64, lat: f64) -> Self {
        let lat = lat.to_radians();
        Self {
            lon: lon.to_radians(),
            lat,
            cos_lat: lat.cos(),
        }
    }

    /// Angle in radians between the reference and `(lon, lat)` in degrees.
    ///
    /// Multiply by a radius to get a length. NaN input gives NaN.
    pub fn distance(&self, lon: f64, lat: f64) -> f64 {
        let lon = lon.to_radians();
        let lat = lat.to_radians();
        let sin_half_dlat = ((lat - self.lat) * 0.5).sin();
        let sin_half_dlon = ((lon - self.lon) * 0.5).sin();
        let a = sin_half_dlat * sin_half_dlat
            + self.cos_lat * lat.cos() * sin_half_dlon * sin_half_dlon;
        // clamp keeps NaN, min would turn it into 1.0
        2.0 * a.sqrt().clamp(0.0, 1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_zero_distance() {
        let d = SphericalDistance::new(10.0, 53.5);
        assert_eq!(d.distance(10.0, 53.5), 0.0);
    }

    #[test]
    fn test_quarter_circle() {
        let d = SphericalDistance::new(0.0, 0.0);
        assert!((d.distance(90.0, 0.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((d.distance(0.0, 90.0) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_across_anti_meridian() {
        let d = SphericalDistance::new(179.5, 0.0);
        let expected = 1.0_f64.to_radians();
        assert!((d.distance(-179.5, 0.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_nan_input_gives_nan() {
        let d = SphericalDistance::new(0.0, 0.0);
        assert!(d.distance(f64::NAN, 0.0).is_nan());
        assert!(d.distance(0.0, f64::NAN).is_nan());
        assert!(SphericalDistance::new(f64::NAN, 0.0).distance(0.0, 0.0).is_nan());
    }

    #[test]
    fn test_antipode() {
        let d = SphericalDistance::new(0.0, 0.0);
        assert!((d.distance(180.0, 0.0) - PI).abs() < 1e-12);
    }
}
