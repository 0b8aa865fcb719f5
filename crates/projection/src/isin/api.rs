//! Degree-based facade over the ISIN transforms and the global tiling.
//!
//! The global map is cut into 36 tile columns by 18 tile lines. Tile image
//! coordinates are pixel-center referenced: `(0, 0)` is the center of the
//! first pixel and `(-0.5, -0.5)` its upper-left edge.

use rayon::prelude::*;
use serde::Serialize;

use super::forward::IsinForward;
use super::inverse::IsinInverse;
use super::params::{ProjectionParam, Raster};
use super::point::IsinPoint;
use crate::error::{ProjectionError, Result};

/// Half the width of the global sinusoidal map (meters), as published for
/// the MODIS tile grids.
const GLOBAL_HALF_WIDTH: f64 = 20015109.354;

/// Pixel-center geolocation of one tile, row-major.
#[derive(Debug, Clone, Serialize)]
pub struct TileGeoLocations {
    pub width: usize,
    pub height: usize,
    pub longitudes: Vec<f32>,
    pub latitudes: Vec<f32>,
}

/// Conversions for one of the supported global grids.
#[derive(Debug, Clone)]
pub struct IsinApi {
    raster: Raster,
    forward: IsinForward,
    inverse: IsinInverse,
    tile_size: f64,
    pixel_size: f64,
}

impl IsinApi {
    /// Set up the transforms for a grid.
    pub fn new(raster: Raster) -> Result<Self> {
        let param = raster.projection_param();
        let dzone = param.nrow as f64;

        let forward = IsinForward::init(
            param.sphere,
            param.lon_cen_mer,
            param.false_east,
            param.false_north,
            dzone,
            param.djustify,
        )?;
        let inverse = IsinInverse::init(
            param.sphere,
            param.lon_cen_mer,
            param.false_east,
            param.false_north,
            dzone,
            param.djustify,
        )?;

        let tile_size = 2.0 * GLOBAL_HALF_WIDTH / param.ntile_samp as f64;

        Ok(Self {
            raster,
            forward,
            inverse,
            tile_size,
            pixel_size: tile_size / param.tile_dim as f64,
        })
    }

    pub fn raster(&self) -> Raster {
        self.raster
    }

    /// Static configuration of a grid.
    pub fn projection_param(raster: Raster) -> &'static ProjectionParam {
        raster.projection_param()
    }

    /// Geographic degrees to global map meters.
    pub fn to_global_map(&self, lon: f64, lat: f64) -> IsinPoint {
        self.forward
            .transform(IsinPoint::new(lon.to_radians(), lat.to_radians()))
    }

    /// Global map meters to geographic degrees (`x` = lon, `y` = lat).
    pub fn global_map_to_geo(&self, x: f64, y: f64) -> IsinPoint {
        let geo = self.inverse.transform(IsinPoint::new(x, y));
        IsinPoint::new(geo.x.to_degrees(), geo.y.to_degrees())
    }

    /// Geographic degrees to tile image coordinates plus tile indices.
    pub fn to_tile_image_coordinates(&self, lon: f64, lat: f64) -> IsinPoint {
        let map = self.to_global_map(lon, lat);
        if !map.is_valid() {
            return IsinPoint::invalid();
        }

        let top = GLOBAL_HALF_WIDTH * 0.5;
        let tile_col = ((map.x + GLOBAL_HALF_WIDTH) / self.tile_size).floor();
        let tile_line = ((top - map.y) / self.tile_size).floor();

        let tile_x_min = -GLOBAL_HALF_WIDTH + tile_col * self.tile_size;
        let tile_y_max = top - tile_line * self.tile_size;

        IsinPoint::with_tile(
            (map.x - tile_x_min) / self.pixel_size - 0.5,
            (tile_y_max - map.y) / self.pixel_size - 0.5,
            tile_col as i32,
            tile_line as i32,
        )
    }

    /// Tile image coordinates to geographic degrees (`x` = lon, `y` = lat).
    pub fn tile_image_coordinates_to_geo(
        &self,
        x: f64,
        y: f64,
        tile_col: i32,
        tile_line: i32,
    ) -> IsinPoint {
        let top = GLOBAL_HALF_WIDTH * 0.5;
        let map_x = -GLOBAL_HALF_WIDTH + tile_col as f64 * self.tile_size + (x + 0.5) * self.pixel_size;
        let map_y = top - tile_line as f64 * self.tile_size - (y + 0.5) * self.pixel_size;
        self.global_map_to_geo(map_x, map_y)
    }

    /// Tile size in pixels as `(width, height)`.
    pub fn tile_dimensions(&self) -> IsinPoint {
        let dim = self.raster.projection_param().tile_dim as f64;
        IsinPoint::new(dim, dim)
    }

    /// Pixel-center longitudes and latitudes of a whole tile.
    ///
    /// Pixels outside the sinusoidal outline come back as NaN.
    pub fn tile_geo_locations(&self, tile_col: i32, tile_line: i32) -> Result<TileGeoLocations> {
        let param = self.raster.projection_param();
        let (ncols, nlines) = (param.ntile_samp as i32, param.ntile_line as i32);
        if !(0..ncols).contains(&tile_col) || !(0..nlines).contains(&tile_line) {
            return Err(ProjectionError::TileOutOfRange {
                tile_col,
                tile_line,
                ncols,
                nlines,
            });
        }

        let dim = param.tile_dim as usize;
        let mut longitudes = vec![f32::NAN; dim * dim];
        let mut latitudes = vec![f32::NAN; dim * dim];

        longitudes
            .par_chunks_mut(dim)
            .zip(latitudes.par_chunks_mut(dim))
            .enumerate()
            .for_each(|(y, (lon_row, lat_row))| {
                for x in 0..dim {
                    let geo = self.tile_image_coordinates_to_geo(
                        x as f64,
                        y as f64,
                        tile_col,
                        tile_line,
                    );
                    lon_row[x] = geo.x as f32;
                    lat_row[x] = geo.y as f32;
                }
            });

        Ok(TileGeoLocations {
            width: dim,
            height: dim,
            longitudes,
            latitudes,
        })
    }
}
