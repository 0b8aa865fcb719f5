//! Geocoding command line tool.
//!
//! ISIN grid conversions, tile geolocation export and batch pixel location
//! on JSON-encoded geolocation rasters.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use geo_tool::commands::{self, parse_raster};
use geo_tool::logging;
use geocoding::GeocodingConfig;
use projection::Raster;

#[derive(Parser, Debug)]
#[command(name = "geo-tool")]
#[command(about = "ISIN projection and inverse geocoding tool")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info", env = "GEO_TOOL_LOG_LEVEL", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "GEO_TOOL_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Geographic degrees to global map meters
    ToMap {
        /// Grid: 1km, 500m or 250m
        #[arg(short, long, value_parser = parse_raster, default_value = "1km")]
        raster: Raster,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },

    /// Global map meters to geographic degrees
    FromMap {
        #[arg(short, long, value_parser = parse_raster, default_value = "1km")]
        raster: Raster,

        #[arg(short, allow_hyphen_values = true)]
        x: f64,

        #[arg(short, allow_hyphen_values = true)]
        y: f64,
    },

    /// Geographic degrees to tile image coordinates
    ToTile {
        #[arg(short, long, value_parser = parse_raster, default_value = "1km")]
        raster: Raster,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },

    /// Tile image coordinates to geographic degrees
    FromTile {
        #[arg(short, long, value_parser = parse_raster, default_value = "1km")]
        raster: Raster,

        #[arg(short, allow_hyphen_values = true)]
        x: f64,

        #[arg(short, allow_hyphen_values = true)]
        y: f64,

        /// Tile column (0..36)
        #[arg(long)]
        tile_col: i32,

        /// Tile line (0..18)
        #[arg(long)]
        tile_line: i32,
    },

    /// Write the pixel-centre geolocation of a tile as JSON
    TileGeolocations {
        #[arg(short, long, value_parser = parse_raster, default_value = "1km")]
        raster: Raster,

        #[arg(long)]
        tile_col: i32,

        #[arg(long)]
        tile_line: i32,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Resolve geographic positions to pixel positions of a raster
    Locate {
        /// JSON-encoded geolocation raster
        #[arg(long)]
        raster: PathBuf,

        /// JSON list of {"lat", "lon"} positions
        #[arg(long)]
        queries: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::ToMap { raster, lon, lat } => print_json(&commands::to_map(raster, lon, lat)?),
        Commands::FromMap { raster, x, y } => print_json(&commands::from_map(raster, x, y)?),
        Commands::ToTile { raster, lon, lat } => print_json(&commands::to_tile(raster, lon, lat)?),
        Commands::FromTile {
            raster,
            x,
            y,
            tile_col,
            tile_line,
        } => print_json(&commands::from_tile(raster, x, y, tile_col, tile_line)?),
        Commands::TileGeolocations {
            raster,
            tile_col,
            tile_line,
            output,
        } => commands::write_tile_geolocations(raster, tile_col, tile_line, &output),
        Commands::Locate { raster, queries } => {
            let config = GeocodingConfig::from_env();
            config.validate().map_err(anyhow::Error::msg)?;
            info!(inverse = %config.inverse, "Loaded configuration");

            let raster = commands::load_raster(&raster)?;
            let queries = commands::load_queries(&queries)?;
            print_json(&commands::locate(&config, &raster, &queries)?)
        }
    }
}
