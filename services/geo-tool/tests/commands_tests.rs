//! File based tests of the geo-tool commands.

use std::fs;
use std::io::Write;

use geo_common::{GeoPos, PixelPos};
use geo_tool::commands::{load_queries, load_raster, locate, write_tile_geolocations};
use geocoding::{GeocodingConfig, InverseKind};
use projection::Raster;
use tempfile::{tempdir, NamedTempFile};
use test_utils::{assert_nan, linear_raster};

fn json_file<T: serde::Serialize>(value: &T) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    serde_json::to_writer(&mut file, value).unwrap();
    file.flush().unwrap();
    file
}

// ============================================================================
// Locate tests
// ============================================================================

#[test]
fn test_locate_from_files() {
    let raster = linear_raster();
    let raster_file = json_file(&raster);
    let queries = vec![raster.geo_pos(3, 4), raster.geo_pos(39, 29), GeoPos::new(0.0, 0.0)];
    let queries_file = json_file(&queries);

    let loaded = load_raster(raster_file.path()).unwrap();
    let queries = load_queries(queries_file.path()).unwrap();
    assert_eq!(queries.len(), 3);

    for inverse in [InverseKind::QuadTree, InverseKind::GeoIndex] {
        let config = GeocodingConfig {
            inverse,
            ..GeocodingConfig::default()
        };
        let pixels = locate(&config, &loaded, &queries).unwrap();

        assert_eq!(pixels[0], PixelPos::new(3.5, 4.5));
        assert_eq!(pixels[1], PixelPos::new(39.5, 29.5));
        assert_nan!(pixels[2].x, pixels[2].y);
    }
}

#[test]
fn test_load_raster_rejects_inconsistent_dimensions() {
    let mut json = serde_json::to_value(linear_raster()).unwrap();
    json["raster_width"] = serde_json::json!(41);
    let file = json_file(&json);

    let err = load_raster(file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid raster"), "{}", err);
}

#[test]
fn test_load_queries_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = load_queries(&path).unwrap_err();
    assert!(err.to_string().contains("missing.json"), "{}", err);
}

// ============================================================================
// Tile geolocation tests
// ============================================================================

#[test]
fn test_write_tile_geolocations() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tile.json");

    write_tile_geolocations(Raster::Grid1Km, 18, 3, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\"width\":1200,\"height\":1200,"));
}

#[test]
fn test_write_tile_geolocations_rejects_unknown_tile() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tile.json");

    assert!(write_tile_geolocations(Raster::Grid1Km, 40, 3, &path).is_err());
    assert!(!path.exists());
}
