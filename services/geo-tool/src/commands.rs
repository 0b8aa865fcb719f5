//! Command implementations.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use geo_common::{GeoPos, GeoRaster, PixelPos};
use geocoding::{build_inverse, GeocodingConfig};
use projection::{IsinApi, IsinPoint, Raster};
use rayon::prelude::*;
use tracing::info;

/// clap value parser for grid names.
pub fn parse_raster(s: &str) -> std::result::Result<Raster, String> {
    Raster::from_str(s).map_err(|e| e.to_string())
}

fn api(raster: Raster) -> Result<IsinApi> {
    IsinApi::new(raster).with_context(|| format!("Failed to set up the {} grid", raster))
}

/// Degrees to global map meters.
pub fn to_map(raster: Raster, lon: f64, lat: f64) -> Result<IsinPoint> {
    Ok(api(raster)?.to_global_map(lon, lat))
}

/// Global map meters to degrees.
pub fn from_map(raster: Raster, x: f64, y: f64) -> Result<IsinPoint> {
    Ok(api(raster)?.global_map_to_geo(x, y))
}

/// Degrees to tile image coordinates.
pub fn to_tile(raster: Raster, lon: f64, lat: f64) -> Result<IsinPoint> {
    Ok(api(raster)?.to_tile_image_coordinates(lon, lat))
}

/// Tile image coordinates to degrees.
pub fn from_tile(raster: Raster, x: f64, y: f64, tile_col: i32, tile_line: i32) -> Result<IsinPoint> {
    Ok(api(raster)?.tile_image_coordinates_to_geo(x, y, tile_col, tile_line))
}

/// Write the pixel-centre geolocation of a tile as JSON.
pub fn write_tile_geolocations(
    raster: Raster,
    tile_col: i32,
    tile_line: i32,
    output: &Path,
) -> Result<()> {
    let tile = api(raster)?
        .tile_geo_locations(tile_col, tile_line)
        .with_context(|| format!("Failed to compute geolocation of tile ({}, {})", tile_col, tile_line))?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &tile)?;
    writer.flush()?;

    info!(
        grid = %raster,
        tile_col,
        tile_line,
        pixels = tile.width * tile.height,
        path = %output.display(),
        "Wrote tile geolocation"
    );
    Ok(())
}

/// Read a JSON-encoded raster and check it for consistency.
pub fn load_raster(path: &Path) -> Result<GeoRaster> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    GeoRaster::from_json_reader(BufReader::new(file))
        .with_context(|| format!("Invalid raster in {}", path.display()))
}

/// Read a JSON list of geographic positions.
pub fn load_queries(path: &Path) -> Result<Vec<GeoPos>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse positions from {}", path.display()))
}

/// Resolve positions to pixel positions with the configured strategy.
///
/// Queries are spread over the rayon pool; every worker uses the same
/// initialized inverse coding.
pub fn locate(config: &GeocodingConfig, raster: &GeoRaster, queries: &[GeoPos]) -> Result<Vec<PixelPos>> {
    let inverse = build_inverse(config, raster).context("Failed to build inverse coding")?;

    let pixels: Vec<PixelPos> = queries.par_iter().map(|q| inverse.pixel_pos(q)).collect();

    let resolved = pixels.iter().filter(|p| p.is_valid()).count();
    info!(
        strategy = inverse.key(),
        queries = queries.len(),
        resolved,
        "Located positions"
    );
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raster() {
        assert_eq!(parse_raster("1KM"), Ok(Raster::Grid1Km));
        assert_eq!(parse_raster("250m"), Ok(Raster::Grid250M));
        assert!(parse_raster("2km").is_err());
    }

    #[test]
    fn test_map_round_trip() {
        let p = to_map(Raster::Grid1Km, 9.993682, 53.551086).unwrap();
        let geo = from_map(Raster::Grid1Km, p.x, p.y).unwrap();
        assert!((geo.x - 9.993682).abs() < 1e-8);
        assert!((geo.y - 53.551086).abs() < 1e-8);
    }

    #[test]
    fn test_tile_round_trip() {
        let p = to_tile(Raster::Grid500M, -18.49755, -34.357203).unwrap();
        let (col, line) = (p.tile_col.unwrap(), p.tile_line.unwrap());
        let geo = from_tile(Raster::Grid500M, p.x, p.y, col, line).unwrap();
        assert!((geo.x + 18.49755).abs() < 1e-6);
        assert!((geo.y + 34.357203).abs() < 1e-6);
    }
}
