//! Helpers that inspect a geolocation raster before an inverse coding is
//! built for it.

use std::f64::consts::PI;

use geo_common::{PixelPos, SphericalDistance, MEAN_EARTH_RADIUS, WGS84_MEAN_RADIUS_KM};

use crate::error::{GeocodingError, Result};

/// Longitude step (degrees) between neighbours that signals a wrap.
const STEP_THRESHOLD: f64 = 180.0;

/// Edge length of the window used to estimate the resolution.
const RESOLUTION_WINDOW: usize = 10;

fn check_dimensions(len: usize, width: usize, height: usize, param: &str) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(GeocodingError::invalid_argument(
            param,
            format!("dimensions must be > 0, got {}x{}", width, height),
        ));
    }
    if len != width * height {
        return Err(GeocodingError::invalid_argument(
            param,
            format!("expected {} values for {}x{}, got {}", width * height, width, height, len),
        ));
    }
    Ok(())
}

fn is_jump(a: f64, b: f64) -> bool {
    (a - b).abs() > STEP_THRESHOLD
}

/// Whether the raster crosses the antimeridian.
///
/// Walks the four borders and reports the first longitude step larger
/// than 180 degrees.
pub fn contains_anti_meridian(longitudes: &[f64], width: usize, height: usize) -> Result<bool> {
    check_dimensions(longitudes.len(), width, height, "longitudes")?;

    let at = |x: usize, y: usize| longitudes[y * width + x];
    let last_x = width - 1;
    let last_y = height - 1;

    let horizontal = (1..width).any(|x| {
        is_jump(at(x, 0), at(x - 1, 0)) || is_jump(at(x, last_y), at(x - 1, last_y))
    });
    let vertical = (1..height).any(|y| {
        is_jump(at(0, y), at(0, y - 1)) || is_jump(at(last_x, y), at(last_x, y - 1))
    });

    Ok(horizontal || vertical)
}

/// Latitude distance in degrees covered by `distance_km` along a meridian.
pub fn lat_delta_to_pole(distance_km: f64) -> f64 {
    distance_km * 180.0 / (PI * MEAN_EARTH_RADIUS * 0.001)
}

/// Pixels at which a pole lies inside the raster.
///
/// Candidates are interior pixels within one pixel of a pole. A candidate
/// is kept when walking its eight neighbours crosses a longitude jump an
/// odd number of times, i.e. the meridians converge inside the ring.
pub fn pole_locations(
    longitudes: &[f64],
    latitudes: &[f64],
    width: usize,
    height: usize,
    resolution_km: f64,
) -> Result<Vec<PixelPos>> {
    check_dimensions(longitudes.len(), width, height, "longitudes")?;
    check_dimensions(latitudes.len(), width, height, "latitudes")?;

    let delta = lat_delta_to_pole(resolution_km);
    let max_lat = 90.0 - delta;
    let min_lat = -90.0 + delta;

    let lon = |x: usize, y: usize| longitudes[y * width + x];

    let mut poles = Vec::new();
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let lat = latitudes[y * width + x];
            if !(lat >= max_lat || lat <= min_lat) {
                continue;
            }

            // clockwise around (x, y), starting at the left neighbour
            let ring = [
                (x - 1, y - 1),
                (x - 1, y),
                (x - 1, y + 1),
                (x, y + 1),
                (x + 1, y + 1),
                (x + 1, y),
                (x + 1, y - 1),
                (x, y - 1),
            ];
            let crossings = (0..ring.len())
                .filter(|&i| {
                    let (ax, ay) = ring[i];
                    let (bx, by) = ring[(i + 1) % ring.len()];
                    is_jump(lon(bx, by), lon(ax, ay))
                })
                .count();

            if crossings % 2 == 1 {
                poles.push(PixelPos::new(x as f64, y as f64));
            }
        }
    }
    Ok(poles)
}

/// Mean pixel size in kilometers, estimated from the centre of the raster.
///
/// Averages the great-circle distance between horizontally and vertically
/// adjacent pixels in a window of at most 10x10 pixels. Pairs involving
/// NaN geolocation are skipped.
pub fn compute_resolution_km(
    longitudes: &[f64],
    latitudes: &[f64],
    width: usize,
    height: usize,
) -> Result<f64> {
    check_dimensions(longitudes.len(), width, height, "longitudes")?;
    check_dimensions(latitudes.len(), width, height, "latitudes")?;

    let window_width = RESOLUTION_WINDOW.min(width);
    let window_height = RESOLUTION_WINDOW.min(height);
    let x0 = (width - window_width) / 2;
    let y0 = (height - window_height) / 2;
    let x_max = x0 + window_width - 1;
    let y_max = y0 + window_height - 1;

    let mut sum = 0.0;
    let mut count = 0usize;
    for y in y0..=y_max {
        for x in x0..=x_max {
            let idx = y * width + x;
            let distance = SphericalDistance::new(longitudes[idx], latitudes[idx]);

            let mut neighbours = Vec::with_capacity(2);
            if x < x_max {
                neighbours.push(idx + 1);
            }
            if y < y_max {
                neighbours.push(idx + width);
            }
            for n in neighbours {
                let d = distance.distance(longitudes[n], latitudes[n]);
                if d.is_finite() {
                    sum += d;
                    count += 1;
                }
            }
        }
    }

    if count == 0 {
        return Err(GeocodingError::invalid_argument(
            "longitudes",
            "no valid neighbouring pixels to estimate the resolution from",
        ));
    }

    Ok(sum / count as f64 * WGS84_MEAN_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: usize, height: usize, lon: impl Fn(usize, usize) -> f64) -> Vec<f64> {
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| lon(x, y))
            .collect()
    }

    #[test]
    fn test_contains_anti_meridian_false() {
        let lons = grid(4, 3, |x, _| 10.0 + x as f64);
        assert!(!contains_anti_meridian(&lons, 4, 3).unwrap());
    }

    #[test]
    fn test_contains_anti_meridian_top_row() {
        let lons = grid(4, 3, |x, _| [178.0, 179.0, -179.5, -178.5][x]);
        assert!(contains_anti_meridian(&lons, 4, 3).unwrap());
    }

    #[test]
    fn test_contains_anti_meridian_right_column_only() {
        // only the right border column wraps
        let lons = grid(3, 4, |x, y| if x == 2 && y >= 2 { -179.0 } else { 179.0 });
        assert!(contains_anti_meridian(&lons, 3, 4).unwrap());
    }

    #[test]
    fn test_contains_anti_meridian_size_mismatch() {
        let result = contains_anti_meridian(&[1.0, 2.0, 3.0], 2, 2);
        assert!(matches!(result, Err(GeocodingError::InvalidArgument { .. })));
    }

    #[test]
    fn test_lat_delta_to_pole() {
        assert!((lat_delta_to_pole(1.0) - 0.008993220293).abs() < 1e-9);
        assert!((lat_delta_to_pole(111.19487) - 1.0).abs() < 1e-4);
        assert_eq!(lat_delta_to_pole(0.0), 0.0);
    }

    #[test]
    fn test_pole_locations_polar_grid() {
        // azimuthal grid around the north pole, centred on pixel (2, 2)
        let (width, height) = (5, 5);
        let mut lons = Vec::new();
        let mut lats = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let dx = x as f64 - 2.0;
                let dy = y as f64 - 2.0;
                let r = (dx * dx + dy * dy).sqrt();
                lons.push(dy.atan2(dx).to_degrees());
                lats.push(90.0 - r * 0.01);
            }
        }

        let poles = pole_locations(&lons, &lats, width, height, 1.0).unwrap();
        assert_eq!(poles, vec![PixelPos::new(2.0, 2.0)]);
    }

    #[test]
    fn test_pole_locations_none_away_from_pole() {
        let lons = grid(5, 5, |x, _| x as f64);
        let lats = grid(5, 5, |_, y| 60.0 + y as f64);
        assert!(pole_locations(&lons, &lats, 5, 5, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_pole_locations_border_skipped() {
        // too small to have interior pixels
        let lons = grid(2, 2, |x, _| x as f64 * 180.0);
        let lats = grid(2, 2, |_, _| 89.999);
        assert!(pole_locations(&lons, &lats, 2, 2, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_compute_resolution_km() {
        // 0.01 degree spacing on the equator is about 1.11 km
        let lons = grid(20, 20, |x, _| x as f64 * 0.01);
        let lats = grid(20, 20, |_, y| y as f64 * 0.01 - 0.1);
        let res = compute_resolution_km(&lons, &lats, 20, 20).unwrap();
        assert!((res - 1.1113).abs() < 1e-3, "resolution {}", res);
    }

    #[test]
    fn test_compute_resolution_km_small_raster() {
        let lons = grid(2, 1, |x, _| x as f64 * 0.1);
        let lats = grid(2, 1, |_, _| 0.0);
        let res = compute_resolution_km(&lons, &lats, 2, 1).unwrap();
        assert!((res - 11.113).abs() < 1e-2, "resolution {}", res);
    }

    #[test]
    fn test_compute_resolution_km_skips_nan_pixel() {
        let mut lons = grid(20, 20, |x, _| x as f64 * 0.01);
        let lats = grid(20, 20, |_, y| y as f64 * 0.01 - 0.1);
        // inside the central 10x10 window
        lons[10 * 20 + 10] = f64::NAN;

        let res = compute_resolution_km(&lons, &lats, 20, 20).unwrap();
        assert!((res - 1.1113).abs() < 1e-3, "resolution {}", res);
    }

    #[test]
    fn test_compute_resolution_km_all_nan() {
        let lons = vec![f64::NAN; 4];
        let lats = vec![f64::NAN; 4];
        assert!(compute_resolution_km(&lons, &lats, 2, 2).is_err());
    }
}
