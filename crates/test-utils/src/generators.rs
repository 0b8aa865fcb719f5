//! Synthetic geolocation generators.
//!
//! Every generator returns `(longitudes, latitudes)` in row-major order
//! with predictable values, so tests can compute the expected pixel of a
//! position by hand.

/// Wrap a longitude into `[-180, 180]`.
pub fn wrap_lon(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Creates a regular lon/lat grid.
///
/// Pixel `(x, y)` is located at `lon = lon0 + x * step`,
/// `lat = lat0 - y * step`, so latitude decreases downwards like in most
/// satellite products.
///
/// # Example
///
/// ```
/// use test_utils::linear_grid;
///
/// let (lons, lats) = linear_grid(4, 3, 10.0, 50.0, 0.5);
/// assert_eq!(lons.len(), 12);
/// assert_eq!(lons[1], 10.5);
/// assert_eq!(lats[4], 49.5);
/// ```
pub fn linear_grid(
    width: usize,
    height: usize,
    lon0: f64,
    lat0: f64,
    step: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut lons = Vec::with_capacity(width * height);
    let mut lats = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            lons.push(lon0 + x as f64 * step);
            lats.push(lat0 - y as f64 * step);
        }
    }
    (lons, lats)
}

/// Creates a swath rotated against the meridians.
///
/// The grid is centred on `(center_lon, center_lat)` with `step` degrees
/// of spacing along both image axes, rotated clockwise by `angle_deg`.
/// Longitude offsets are stretched by `1 / cos(center_lat)` so that pixels
/// stay roughly square on the ground.
pub fn rotated_swath(
    width: usize,
    height: usize,
    center_lon: f64,
    center_lat: f64,
    step: f64,
    angle_deg: f64,
) -> (Vec<f64>, Vec<f64>) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let lon_scale = 1.0 / center_lat.to_radians().cos();
    let cx = (width as f64 - 1.0) / 2.0;
    let cy = (height as f64 - 1.0) / 2.0;

    let mut lons = Vec::with_capacity(width * height);
    let mut lats = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let dx = (x as f64 - cx) * step;
            let dy = (y as f64 - cy) * step;
            lons.push(wrap_lon(center_lon + (dx * cos - dy * sin) * lon_scale));
            lats.push(center_lat - (dx * sin + dy * cos));
        }
    }
    (lons, lats)
}

/// Creates a regular grid whose longitudes wrap at the antimeridian.
///
/// Same layout as [`linear_grid`], with longitudes beyond 180 degrees
/// moved into the western hemisphere.
///
/// # Example
///
/// ```
/// use test_utils::anti_meridian_grid;
///
/// let (lons, _) = anti_meridian_grid(4, 1, 179.0, 0.0, 0.5);
/// assert_eq!(lons, vec![179.0, 179.5, 180.0, -179.5]);
/// ```
pub fn anti_meridian_grid(
    width: usize,
    height: usize,
    lon0: f64,
    lat0: f64,
    step: f64,
) -> (Vec<f64>, Vec<f64>) {
    let (lons, lats) = linear_grid(width, height, lon0, lat0, step);
    (lons.into_iter().map(wrap_lon).collect(), lats)
}

/// Creates an azimuthal grid around the north pole.
///
/// The pole lies on the centre pixel `((width - 1) / 2, (height - 1) / 2)`.
/// Latitude drops by `step` degrees per pixel of distance from the centre
/// and the longitude is the direction of the pixel as seen from the
/// centre, so the meridians converge and the antimeridian runs along the
/// left half of the centre row.
pub fn polar_grid(width: usize, height: usize, step: f64) -> (Vec<f64>, Vec<f64>) {
    let cx = ((width - 1) / 2) as f64;
    let cy = ((height - 1) / 2) as f64;

    let mut lons = Vec::with_capacity(width * height);
    let mut lats = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            lons.push(dy.atan2(dx).to_degrees());
            lats.push(90.0 - (dx * dx + dy * dy).sqrt() * step);
        }
    }
    (lons, lats)
}

/// Sets the geolocation of the given pixels to NaN.
pub fn with_nan_pixels(
    lons: &mut [f64],
    lats: &mut [f64],
    width: usize,
    pixels: &[(usize, usize)],
) {
    for &(x, y) in pixels {
        lons[y * width + x] = f64::NAN;
        lats[y * width + x] = f64::NAN;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_grid() {
        let (lons, lats) = linear_grid(3, 2, -5.0, 10.0, 0.25);
        assert_eq!(lons, vec![-5.0, -4.75, -4.5, -5.0, -4.75, -4.5]);
        assert_eq!(lats, vec![10.0, 10.0, 10.0, 9.75, 9.75, 9.75]);
    }

    #[test]
    fn test_rotated_swath_centre() {
        let (lons, lats) = rotated_swath(5, 5, 20.0, 40.0, 0.1, 30.0);
        assert!((lons[12] - 20.0).abs() < 1e-12);
        assert!((lats[12] - 40.0).abs() < 1e-12);
        // rotation moves the first row's right end south
        assert!(lats[4] < lats[0]);
    }

    #[test]
    fn test_wrap_lon() {
        assert_eq!(wrap_lon(181.0), -179.0);
        assert_eq!(wrap_lon(-181.0), 179.0);
        assert_eq!(wrap_lon(180.0), 180.0);
    }

    #[test]
    fn test_polar_grid() {
        let (lons, lats) = polar_grid(5, 5, 0.1);
        assert_eq!(lats[12], 90.0);
        assert_eq!(lons[13], 0.0); // east of the pole
        assert_eq!(lons[11], 180.0); // west of the pole
        assert!((lats[0] - (90.0 - 8.0_f64.sqrt() * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_with_nan_pixels() {
        let (mut lons, mut lats) = linear_grid(3, 3, 0.0, 0.0, 1.0);
        with_nan_pixels(&mut lons, &mut lats, 3, &[(1, 1)]);
        assert!(lons[4].is_nan());
        assert!(lats[4].is_nan());
        assert!(!lons[3].is_nan());
    }
}
