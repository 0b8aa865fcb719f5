//! Lookups of both inverse strategies against synthetic rasters.

use geo_common::{GeoPos, GeoRaster, PixelPos};
use geocoding::raster_utils::{contains_anti_meridian, pole_locations};
use geocoding::{
    build_inverse, GeocodingConfig, GeocodingError, InterpolatorType, InverseCoding, InverseKind,
    PixelGeoIndexInverse, PixelQuadTreeInverse,
};
use test_utils::{
    anti_meridian_raster, assert_nan, linear_grid, linear_raster, polar_raster, rotated_raster,
    step_to_km, with_nan_pixels,
};

const KINDS: [InverseKind; 2] = [InverseKind::QuadTree, InverseKind::GeoIndex];

fn config(inverse: InverseKind) -> GeocodingConfig {
    GeocodingConfig {
        inverse,
        ..GeocodingConfig::default()
    }
}

fn interpolating(inverse: InverseKind, interpolator: InterpolatorType) -> GeocodingConfig {
    GeocodingConfig {
        inverse,
        interpolator: Some(interpolator),
        fractional_accuracy: true,
    }
}

/// Query every `step`-th pixel centre and expect the same pixel back.
fn assert_pixel_round_trip(inverse: &dyn InverseCoding, raster: &GeoRaster, pixels: &[(usize, usize)]) {
    for &(x, y) in pixels {
        let pos = raster.geo_pos(x, y);
        let pixel = inverse.pixel_pos(&pos);
        assert_eq!(
            (pixel.x, pixel.y),
            (x as f64 + 0.5, y as f64 + 0.5),
            "{} at pixel ({}, {})",
            inverse.key(),
            x,
            y
        );
    }
}

fn grid_pixels(width: usize, height: usize, step: usize) -> Vec<(usize, usize)> {
    (0..height)
        .step_by(step)
        .flat_map(|y| (0..width).step_by(step).map(move |x| (x, y)))
        .collect()
}

// ============================================================================
// Regular and rotated rasters
// ============================================================================

#[test]
fn test_linear_raster_round_trip() {
    let raster = linear_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();
        assert_pixel_round_trip(inverse.as_ref(), &raster, &grid_pixels(40, 30, 3));
    }
}

#[test]
fn test_linear_raster_offset_query() {
    let raster = linear_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();

        // a little north-east of pixel (12, 7)
        let pixel = inverse.pixel_pos(&GeoPos::new(50.0 - 0.7 + 0.02, 10.0 + 1.2 + 0.03));
        assert_eq!((pixel.x, pixel.y), (12.5, 7.5), "{}", inverse.key());
    }
}

#[test]
fn test_rotated_raster_round_trip() {
    let raster = rotated_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();
        assert_pixel_round_trip(inverse.as_ref(), &raster, &grid_pixels(60, 50, 7));
    }
}

#[test]
fn test_far_outside_is_invalid() {
    let raster = linear_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();

        let pixel = inverse.pixel_pos(&GeoPos::new(0.0, 0.0));
        assert_nan!(pixel.x, pixel.y);

        let pixel = inverse.pixel_pos(&GeoPos::new(49.0, 20.0));
        assert!(!pixel.is_valid(), "{}", inverse.key());
    }
}

#[test]
fn test_invalid_query_is_invalid() {
    let raster = linear_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();
        let pixel = inverse.pixel_pos(&GeoPos::invalid());
        assert_nan!(pixel.x, pixel.y);
    }
}

#[test]
fn test_geo_pos_reads_raster() {
    let raster = linear_raster();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();

        let pos = inverse.geo_pos(3, 4);
        assert_eq!((pos.lon, pos.lat), (raster.geo_pos(3, 4).lon, raster.geo_pos(3, 4).lat));
        assert!(!inverse.geo_pos(40, 0).is_valid());
        assert!(!inverse.geo_pos(-1, 0).is_valid());
    }
}

// ============================================================================
// Antimeridian and pole
// ============================================================================

#[test]
fn test_anti_meridian_raster_round_trip() {
    let raster = anti_meridian_raster();
    assert!(contains_anti_meridian(&raster.longitudes, 40, 20).unwrap());

    let pixels: Vec<(usize, usize)> = [2, 5, 15, 25, 35]
        .iter()
        .flat_map(|&x| [1, 10, 18].map(|y| (x, y)))
        .collect();
    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();
        assert_pixel_round_trip(inverse.as_ref(), &raster, &pixels);
    }
}

#[test]
fn test_polar_raster_pole_location() {
    let raster = polar_raster();
    let poles = pole_locations(&raster.longitudes, &raster.latitudes, 41, 41, raster.resolution_km)
        .unwrap();
    assert_eq!(poles, vec![PixelPos::new(20.0, 20.0)]);
}

#[test]
fn test_polar_raster_geo_index_round_trip() {
    let raster = polar_raster();
    let inverse = build_inverse(&config(InverseKind::GeoIndex), &raster).unwrap();

    assert_pixel_round_trip(inverse.as_ref(), &raster, &grid_pixels(41, 41, 4));
    assert_pixel_round_trip(inverse.as_ref(), &raster, &[(20, 20), (21, 20), (19, 20)]);
}

#[test]
fn test_polar_raster_quad_tree_finds_exact_pixels() {
    let raster = polar_raster();
    let inverse = build_inverse(&config(InverseKind::QuadTree), &raster).unwrap();

    // east half of the grid, away from the excluded pole area
    let pixels: Vec<(usize, usize)> = grid_pixels(41, 41, 3)
        .into_iter()
        .filter(|&(x, _)| x >= 26)
        .collect();

    let mut found = 0;
    for &(x, y) in &pixels {
        let pixel = inverse.pixel_pos(&raster.geo_pos(x, y));
        if pixel.is_valid() {
            assert_eq!((pixel.x, pixel.y), (x as f64 + 0.5, y as f64 + 0.5));
            found += 1;
        }
    }
    assert!(found > 0, "no pixel found in {} queries", pixels.len());
}

// ============================================================================
// Missing geolocation
// ============================================================================

fn raster_with_hole() -> GeoRaster {
    let (mut lons, mut lats) = linear_grid(40, 30, 10.0, 50.0, 0.1);
    let hole: Vec<(usize, usize)> = (10..=12).flat_map(|y| (10..=12).map(move |x| (x, y))).collect();
    with_nan_pixels(&mut lons, &mut lats, 40, &hole);
    GeoRaster::full_resolution(lons, lats, 40, 30, step_to_km(0.1)).unwrap()
}

#[test]
fn test_nan_pixels_are_never_returned() {
    let raster = raster_with_hole();
    let inside_hole = GeoPos::new(50.0 - 1.1, 10.0 + 1.1);

    for kind in KINDS {
        let inverse = build_inverse(&config(kind), &raster).unwrap();

        assert_pixel_round_trip(inverse.as_ref(), &raster, &[(5, 5), (20, 20), (13, 11)]);
        assert!(!inverse.geo_pos(11, 11).is_valid());

        let pixel = inverse.pixel_pos(&inside_hole);
        assert!(
            !(pixel.x == 11.5 && pixel.y == 11.5),
            "{} returned a NaN pixel",
            inverse.key()
        );
    }
}

#[test]
fn test_geo_index_hole_is_out_of_reach() {
    let raster = raster_with_hole();
    let inverse = build_inverse(&config(InverseKind::GeoIndex), &raster).unwrap();

    // nearest valid pixels are two pixels away
    let pixel = inverse.pixel_pos(&GeoPos::new(50.0 - 1.1, 10.0 + 1.1));
    assert_nan!(pixel.x, pixel.y);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_uninitialized_strategies_return_invalid() {
    let strategies: [Box<dyn InverseCoding>; 2] = [
        Box::new(PixelQuadTreeInverse::default()),
        Box::new(PixelGeoIndexInverse::default()),
    ];
    for inverse in strategies {
        assert!(!inverse.pixel_pos(&GeoPos::new(49.0, 11.0)).is_valid());
        assert!(!inverse.geo_pos(0, 0).is_valid());
    }
}

#[test]
fn test_clone_survives_dispose() {
    let raster = linear_raster();
    let query = raster.geo_pos(7, 9);

    for kind in KINDS {
        let mut inverse = build_inverse(&config(kind), &raster).unwrap();
        let copy = inverse.clone();

        inverse.dispose();
        assert!(!inverse.pixel_pos(&query).is_valid());
        assert!(!inverse.geo_pos(7, 9).is_valid());

        let pixel = copy.pixel_pos(&query);
        assert_eq!((pixel.x, pixel.y), (7.5, 9.5), "{}", copy.key());

        // disposing twice is harmless
        inverse.dispose();
    }
}

#[test]
fn test_shared_between_threads() {
    let raster = linear_raster();
    let inverse = build_inverse(&config(InverseKind::GeoIndex), &raster).unwrap();

    std::thread::scope(|scope| {
        for y in [2usize, 14, 27] {
            let inverse = &inverse;
            let raster = &raster;
            scope.spawn(move || {
                assert_pixel_round_trip(inverse.as_ref(), raster, &[(0, y), (20, y), (39, y)]);
            });
        }
    });
}

#[test]
fn test_tie_point_raster_rejected() {
    let (lons, lats) = linear_grid(4, 4, 0.0, 0.0, 1.0);
    let raster = GeoRaster::new(lons, lats, 4, 4, 16, 16, 27.0, 0.5, 0.5, 4.0, 4.0).unwrap();

    for kind in KINDS {
        let result = build_inverse(&config(kind), &raster);
        assert!(matches!(result, Err(GeocodingError::InvalidRaster(_))));
    }
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn test_interpolated_position_lies_towards_query() {
    let raster = linear_raster();
    // 0.3 pixels east and 0.2 pixels south of pixel (10, 10)
    let query = GeoPos::new(50.0 - 10.2 * 0.1, 10.0 + 10.3 * 0.1);

    let configs = [
        interpolating(InverseKind::QuadTree, InterpolatorType::Euclidian),
        interpolating(InverseKind::GeoIndex, InterpolatorType::Geodetic),
    ];
    for config in configs {
        let inverse = build_inverse(&config, &raster).unwrap();
        assert!(inverse.key().ends_with("_INTERPOLATING"));

        let pixel = inverse.pixel_pos(&query);
        assert!(pixel.x > 10.5 && pixel.x < 11.0, "{}: x = {}", inverse.key(), pixel.x);
        assert!(pixel.y > 10.5 && pixel.y < 11.0, "{}: y = {}", inverse.key(), pixel.y);
    }
}

#[test]
fn test_interpolated_pixel_centre_is_exact() {
    let raster = linear_raster();
    let inverse = build_inverse(
        &interpolating(InverseKind::GeoIndex, InterpolatorType::Euclidian),
        &raster,
    )
    .unwrap();

    let pixel = inverse.pixel_pos(&raster.geo_pos(15, 16));
    assert_eq!((pixel.x, pixel.y), (15.5, 16.5));
}

#[test]
fn test_config_json_round_trip() {
    let config = interpolating(InverseKind::GeoIndex, InterpolatorType::Geodetic);
    let json = serde_json::to_string(&config).unwrap();
    let back: GeocodingConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
