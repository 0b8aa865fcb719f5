//! Quad-tree inverse coding.
//!
//! The raster is first cut into segments whose geographic bounding boxes
//! describe them well (no folding, no antimeridian jump inside). A lookup
//! visits every segment whose box contains the query and descends a
//! quad tree over its pixels, pruning quads whose widened bounding box
//! misses the query.

use geo_common::{GeoPos, GeoRaster, PixelPos, MEAN_EARTH_RADIUS};
use tracing::debug;

use super::segment::{Segment, SegmentCoverage, MIN_DIMENSION};
use super::{check_raster, GeoPosCalculator, InverseCoding, SearchResult};
use crate::error::{GeocodingError, Result};
use crate::interpolation::{InterpolationContext, XYInterpolator};

pub const KEY: &str = "INV_PIXEL_QUAD_TREE";
pub const KEY_INTERPOLATING: &str = "INV_PIXEL_QUAD_TREE_INTERPOLATING";

/// Longitude step (degrees) between neighbouring samples that counts as an
/// antimeridian jump.
pub const ANGLE_THRESHOLD: f64 = 270.0;

/// Longitude tolerance table size, one entry per 0.1 degree of latitude.
const EPSILON_LON_ENTRIES: usize = 901;

/// Queries farther from Greenwich than this sample quad edges too.
const DENSE_SAMPLING_LON: f64 = 70.0;

/// Segmented quad-tree search over per-pixel geolocation.
#[derive(Debug, Clone)]
pub struct PixelQuadTreeInverse {
    interpolator: Option<XYInterpolator>,
    state: Option<QuadTreeState>,
}

#[derive(Debug, Clone)]
struct QuadTreeState {
    raster: GeoRaster,
    epsilon: f64,
    epsilon_lon: Vec<f64>,
    crossing_anti_meridian: bool,
    segments: Vec<Segment>,
}

impl PixelQuadTreeInverse {
    /// Create an uninitialized instance, interpolating when an interpolator
    /// is given.
    pub fn new(interpolator: Option<XYInterpolator>) -> Self {
        Self {
            interpolator,
            state: None,
        }
    }

    /// Segments kept after initialization, empty before.
    pub fn segments(&self) -> &[Segment] {
        self.state.as_ref().map_or(&[], |s| s.segments.as_slice())
    }

    fn segmentation(
        raster: &GeoRaster,
        width: i32,
        height: i32,
        pole_locations: &[PixelPos],
    ) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        let full_raster = Segment::new(0, width - 1, 0, height - 1);

        match pole_segment(pole_locations, width, height) {
            None => refine(full_raster, raster, &mut segments)?,
            Some(pole) => {
                for segment in remove_segment(&pole, &full_raster, width, height)? {
                    refine(segment, raster, &mut segments)?;
                }
            }
        }

        Ok(segments)
    }
}

impl Default for PixelQuadTreeInverse {
    fn default() -> Self {
        Self::new(None)
    }
}

impl InverseCoding for PixelQuadTreeInverse {
    fn key(&self) -> &'static str {
        if self.interpolator.is_some() {
            KEY_INTERPOLATING
        } else {
            KEY
        }
    }

    fn initialize(
        &mut self,
        raster: &GeoRaster,
        contains_anti_meridian: bool,
        pole_locations: &[PixelPos],
    ) -> Result<()> {
        check_raster(raster)?;

        let width = raster.raster_width as i32;
        let height = raster.raster_height as i32;
        let epsilon = epsilon(raster.resolution_km);
        let segments = Self::segmentation(raster, width, height, pole_locations)?;

        debug!(
            width,
            height,
            epsilon,
            segments = segments.len(),
            poles = pole_locations.len(),
            "Initialized quad-tree inverse"
        );

        self.state = Some(QuadTreeState {
            raster: raster.clone(),
            epsilon,
            epsilon_lon: create_epsilon_longitude(epsilon),
            crossing_anti_meridian: contains_anti_meridian,
            segments,
        });
        Ok(())
    }

    fn pixel_pos(&self, geo_pos: &GeoPos) -> PixelPos {
        let Some(state) = &self.state else {
            return PixelPos::invalid();
        };
        if !geo_pos.is_valid() {
            return PixelPos::invalid();
        }

        let (lon, lat) = (geo_pos.lon, geo_pos.lat);
        let mut best: Option<(i32, i32)> = None;
        let mut min_delta = f64::MAX;
        for segment in state.segments.iter().filter(|s| s.is_inside(lon, lat)) {
            let mut result = SearchResult::new();
            let found = state.quad_tree_search(
                lat,
                lon,
                segment.x_min,
                segment.y_min,
                segment.width(),
                segment.height(),
                &mut result,
            );
            if !found {
                continue;
            }

            let candidate = state.raster.geo_pos_at(result.x, result.y);
            let delta = sq(candidate.lon - lon, candidate.lat - lat);
            if delta < min_delta {
                min_delta = delta;
                best = Some((result.x, result.y));
            }
        }

        let (x, y) = match best {
            Some(pixel) if min_delta < state.epsilon => pixel,
            _ => return PixelPos::invalid(),
        };

        let raster = &state.raster;
        let pixel = match &self.interpolator {
            Some(interpolator) => {
                let context = InterpolationContext::extract(
                    x,
                    y,
                    &raster.longitudes,
                    &raster.latitudes,
                    raster.raster_width,
                    raster.raster_height,
                );
                interpolator.interpolate(geo_pos, PixelPos::new(x as f64, y as f64), &context)
            }
            None => PixelPos::new(x as f64, y as f64),
        };

        PixelPos::new(pixel.x + raster.offset_x, pixel.y + raster.offset_y)
    }

    fn geo_pos(&self, pixel_x: i32, pixel_y: i32) -> GeoPos {
        match &self.state {
            Some(state) => state.raster.geo_pos_at(pixel_x, pixel_y),
            None => GeoPos::invalid(),
        }
    }

    fn clone_boxed(&self) -> Box<dyn InverseCoding> {
        Box::new(self.clone())
    }

    fn dispose(&mut self) {
        self.state = None;
    }
}

impl QuadTreeState {
    fn quad_tree_search(
        &self,
        lat: f64,
        lon: f64,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        result: &mut SearchResult,
    ) -> bool {
        if w < 2 || h < 2 {
            return false;
        }

        let x_1 = x;
        let x_2 = x_1 + w - 1;
        let y_1 = y;
        let y_2 = y_1 + h - 1;

        let mut pixels = Vec::with_capacity(8);
        pixels.extend_from_slice(&[(x_1, y_1), (x_1, y_2), (x_2, y_1), (x_2, y_2)]);
        if lon.abs() > DENSE_SAMPLING_LON {
            // curvature gets extreme towards the poles
            let x_offset = w / 2;
            let y_offset = h / 2;
            pixels.extend_from_slice(&[
                (x_1 + x_offset, y_1),
                (x_2, y_1 + y_offset),
                (x_1 + x_offset, y_2),
                (x_1, y_1 + y_offset),
            ]);
        }

        let mut lons = Vec::with_capacity(pixels.len());
        let mut lats = Vec::with_capacity(pixels.len());
        for &(px, py) in &pixels {
            let pos = self.raster.geo_pos_at(px, py);
            lons.push(pos.lon);
            lats.push(pos.lat);
        }

        let lat_min = min_with_epsilon(&lats, self.epsilon);
        let lat_max = max_with_epsilon(&lats, self.epsilon);
        if lat < lat_min || lat > lat_max {
            return false;
        }

        let index = ((lat_min.abs() + lat_max.abs()) / 2.0 * 10.0).floor() as usize;
        let eps_lon = self.epsilon_lon[index.min(EPSILON_LON_ENTRIES - 1)];
        if self.crossing_anti_meridian && is_crossing_anti_meridian_inside_quad(&lons) {
            // keep only the hemisphere side of the quad the query lies on
            let outside = if lon > 0.0 {
                lon + eps_lon < positive_lon_min(&lons)
            } else {
                lon - eps_lon > negative_lon_max(&lons)
            };
            if outside {
                return false;
            }
        } else {
            let lon_min = min_with_epsilon(&lons, eps_lon);
            let lon_max = max_with_epsilon(&lons, eps_lon);
            if lon < lon_min || lon > lon_max {
                return false;
            }
        }

        if w == 2 && h == 2 {
            let f = lat.to_radians().cos();
            let mut found = false;
            for (i, &(px, py)) in pixels.iter().take(4).enumerate() {
                if result.update(px, py, sq(lat - lats[i], f * (lon - lons[i]))) {
                    found = true;
                }
            }
            found
        } else {
            self.quad_tree_recursion(lat, lon, x_1, y_1, w, h, result)
        }
    }

    fn quad_tree_recursion(
        &self,
        lat: f64,
        lon: f64,
        i: i32,
        j: i32,
        w: i32,
        h: i32,
        result: &mut SearchResult,
    ) -> bool {
        let w2 = w >> 1;
        let h2 = h >> 1;
        let i2 = i + w2;
        let j2 = j + h2;
        let w2r = w - w2;
        let h2r = h - h2;
        let w2 = w2.max(2);
        let h2 = h2.max(2);

        let b1 = self.quad_tree_search(lat, lon, i, j, w2, h2, result);
        let b2 = self.quad_tree_search(lat, lon, i, j2, w2, h2r, result);
        let b3 = self.quad_tree_search(lat, lon, i2, j, w2r, h2, result);
        let b4 = self.quad_tree_search(lat, lon, i2, j2, w2r, h2r, result);
        b1 || b2 || b3 || b4
    }
}

/// Compute geo points of a segment and either keep it or split it further.
fn refine<C: GeoPosCalculator + ?Sized>(
    mut segment: Segment,
    calculator: &C,
    segments: &mut Vec<Segment>,
) -> Result<()> {
    segment.calculate_geo_points(calculator);
    let coverage = geo_coverage(&segment, calculator);
    if coverage == SegmentCoverage::Inside {
        segments.push(segment);
        return Ok(());
    }

    let mut splits = Vec::new();
    if segment.contains_anti_meridian {
        splits = split_at_anti_meridian(&segment, coverage, calculator)?;
    }
    if splits.is_empty() {
        splits = split_at_outside_point(&segment, coverage, calculator)?;
    }

    match splits.len() {
        // cannot divide further
        0 => segments.push(segment),
        1 => segments.extend(splits),
        _ => {
            for split in splits {
                refine(split, calculator, segments)?;
            }
        }
    }
    Ok(())
}

/// Test the four edge midpoints against the segment's own bounding box.
pub fn geo_coverage<C: GeoPosCalculator + ?Sized>(
    segment: &Segment,
    calculator: &C,
) -> SegmentCoverage {
    let x_offset = segment.width() / 2;
    let y_offset = segment.height() / 2;
    let inside = |x: i32, y: i32| {
        let pos = calculator.geo_pos_at(x, y);
        segment.is_inside(pos.lon, pos.lat)
    };

    let top = inside(segment.x_min + x_offset, segment.y_min);
    let right = inside(segment.x_max, segment.y_min + y_offset);
    let bottom = inside(segment.x_min + x_offset, segment.y_max);
    let left = inside(segment.x_min, segment.y_min + y_offset);

    if !(right && left) {
        SegmentCoverage::Across
    } else if !(top && bottom) {
        SegmentCoverage::Along
    } else {
        SegmentCoverage::Inside
    }
}

/// Smallest non-negative longitude, `f64::MAX` if there is none.
pub fn positive_lon_min(longitudes: &[f64]) -> f64 {
    longitudes
        .iter()
        .copied()
        .filter(|&lon| lon >= 0.0)
        .fold(f64::MAX, |min, lon| if lon < min { lon } else { min })
}

/// Largest negative longitude, `-f64::MAX` if there is none.
pub fn negative_lon_max(longitudes: &[f64]) -> f64 {
    longitudes
        .iter()
        .copied()
        .filter(|&lon| lon < 0.0)
        .fold(-f64::MAX, |max, lon| if lon > max { lon } else { max })
}

/// Whether consecutive samples (including last to first) jump by more than
/// [`ANGLE_THRESHOLD`].
pub fn is_crossing_anti_meridian_inside_quad(longitudes: &[f64]) -> bool {
    let (Some(first), Some(last)) = (longitudes.first(), longitudes.last()) else {
        return false;
    };

    let max_delta = longitudes
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .chain(std::iter::once((last - first).abs()))
        .fold(-1.0, |max, delta| if delta > max { delta } else { max });

    max_delta > ANGLE_THRESHOLD
}

pub fn sq(dx: f64, dy: f64) -> f64 {
    dx * dx + dy * dy
}

/// Minimum of the values (NaN ignored) minus `epsilon`.
pub fn min_with_epsilon(values: &[f64], epsilon: f64) -> f64 {
    let min = values
        .iter()
        .fold(f64::MAX, |min, &v| if v < min { v } else { min });
    min - epsilon
}

/// Maximum of the values (NaN ignored) plus `epsilon`.
pub fn max_with_epsilon(values: &[f64], epsilon: f64) -> f64 {
    let max = values
        .iter()
        .fold(-f64::MAX, |max, &v| if v > max { v } else { max });
    max + epsilon
}

/// Matching tolerance in degrees for a pixel size in kilometers.
pub fn epsilon(resolution_km: f64) -> f64 {
    let angle = 2.0 * ((resolution_km * 1000.0) / (2.0 * MEAN_EARTH_RADIUS)).asin();
    angle.to_degrees() * 2.0
}

/// Longitude tolerance per 0.1 degree of latitude.
pub fn create_epsilon_longitude(epsilon: f64) -> Vec<f64> {
    (0..EPSILON_LON_ENTRIES)
        .map(|i| epsilon / (i as f64 * 0.1).to_radians().cos())
        .collect()
}

/// Bounding segment of the pole locations, grown by `MIN_DIMENSION / 2`
/// and snapped to the raster border when it comes close to it.
///
/// Returns `None` without locations.
pub fn pole_segment(pole_locations: &[PixelPos], width: i32, height: i32) -> Option<Segment> {
    if pole_locations.is_empty() {
        return None;
    }

    let mut x_min = i32::MAX;
    let mut x_max = i32::MIN;
    let mut y_min = i32::MAX;
    let mut y_max = i32::MIN;
    for location in pole_locations {
        let x = location.x as i32;
        let y = location.y as i32;
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let half = MIN_DIMENSION / 2;
    x_min -= half;
    if x_min <= MIN_DIMENSION {
        x_min = 0;
    }

    x_max += half;
    if x_max > width - 1 - MIN_DIMENSION {
        x_max = width - 1;
    }

    y_min -= half;
    if y_min < MIN_DIMENSION {
        y_min = 0;
    }

    y_max += half;
    if y_max > height - 1 - MIN_DIMENSION {
        y_max = height - 1;
    }

    Some(Segment::new(x_min, x_max, y_min, y_max))
}

/// Cut `to_remove` out of `origin`.
///
/// The remaining parts come in the order upper, lower, left, right; parts
/// that would be empty because `to_remove` touches a border are left out.
pub fn remove_segment(
    to_remove: &Segment,
    origin: &Segment,
    width: i32,
    height: i32,
) -> Result<Vec<Segment>> {
    let mut parts = Vec::with_capacity(4);

    let mut remaining = origin.clone();
    if to_remove.y_min > 0 {
        let (upper, rest) = split_pair(remaining.split_y(to_remove.y_min)?)?;
        parts.push(upper);
        remaining = rest;
    }

    if to_remove.y_max < height - 1 {
        let (rest, lower) = split_pair(remaining.split_y(to_remove.y_max + 1)?)?;
        parts.push(lower);
        remaining = rest;
    }

    if to_remove.x_min > 0 {
        let (left, rest) = split_pair(remaining.split_x(to_remove.x_min)?)?;
        parts.push(left);
        remaining = rest;
    }

    if to_remove.x_max < width - 1 {
        // the first part is the removed segment itself
        let (_, right) = split_pair(remaining.split_x(to_remove.x_max + 1)?)?;
        parts.push(right);
    }

    Ok(parts)
}

fn split_pair(parts: Vec<Segment>) -> Result<(Segment, Segment)> {
    let mut parts = parts.into_iter();
    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(GeocodingError::illegal_state(
            "segment to remove leaves a part that is too small to split off",
        )),
    }
}

/// Split at the first edge pixel (scanning from the start) that falls
/// outside the segment's bounding box.
///
/// Falls back to halving when no split point at least `MIN_DIMENSION`
/// pixels into the segment exists.
pub fn split_at_outside_point<C: GeoPosCalculator + ?Sized>(
    segment: &Segment,
    coverage: SegmentCoverage,
    calculator: &C,
) -> Result<Vec<Segment>> {
    let outside = |x: i32, y: i32| {
        let pos = calculator.geo_pos_at(x, y);
        !segment.is_inside(pos.lon, pos.lat)
    };

    match coverage {
        SegmentCoverage::Across => {
            let rows = (segment.y_min + 1)..segment.y_max;
            let y_l = rows.clone().find(|&y| outside(segment.x_min, y));
            let y_r = rows.clone().find(|&y| outside(segment.x_max, y));

            let center = segment.y_min + segment.height() / 2;
            match closest_split(y_l, y_r, segment.y_min, center) {
                Some(row) => Ok(segment.split_y(row).unwrap_or_else(|_| segment.split(true))),
                None => Ok(segment.split(true)),
            }
        }
        SegmentCoverage::Along => {
            let columns = (segment.x_min + 1)..segment.x_max;
            let x_t = columns.clone().find(|&x| outside(x, segment.y_min));
            let x_b = columns.clone().find(|&x| outside(x, segment.y_max));

            let center = segment.x_min + segment.width() / 2;
            match closest_split(x_t, x_b, segment.x_min, center) {
                Some(column) => Ok(segment
                    .split_x(column)
                    .unwrap_or_else(|_| segment.split(false))),
                None => Ok(segment.split(false)),
            }
        }
        SegmentCoverage::Inside => Err(GeocodingError::illegal_state(
            "cannot split a segment that is inside its bounding box",
        )),
    }
}

/// Pick the split candidate closer to `center`, the second one on ties.
///
/// `None` when neither candidate lies at least `MIN_DIMENSION` past `start`.
fn closest_split(first: Option<i32>, second: Option<i32>, start: i32, center: i32) -> Option<i32> {
    let usable = |c: Option<i32>| c.map_or(false, |c| c - start >= MIN_DIMENSION);
    if !usable(first) && !usable(second) {
        return None;
    }

    let distance = |c: Option<i32>| c.map_or(i64::MAX, |c| (center as i64 - c as i64).abs());
    if distance(first) < distance(second) {
        first
    } else {
        second.or(first)
    }
}

/// Split where the longitude jumps by more than [`ANGLE_THRESHOLD`] along
/// the segment edges.
///
/// Returns an empty list when the jump sits closer than `MIN_DIMENSION`
/// to the raster origin or there is none.
pub fn split_at_anti_meridian<C: GeoPosCalculator + ?Sized>(
    segment: &Segment,
    coverage: SegmentCoverage,
    calculator: &C,
) -> Result<Vec<Segment>> {
    let (first, second, center, across) = match coverage {
        SegmentCoverage::Across => {
            let rows = (segment.y_min + 1)..=segment.y_max;
            let left = last_jump(
                calculator,
                (segment.x_min, segment.y_min),
                rows.clone().map(|y| (y, (segment.x_min, y))),
            );
            let right = last_jump(
                calculator,
                (segment.x_max, segment.y_min),
                rows.map(|y| (y, (segment.x_max, y))),
            );
            (left, right, segment.y_min + segment.height() / 2, true)
        }
        SegmentCoverage::Along => {
            let columns = (segment.x_min + 1)..=segment.x_max;
            let top = last_jump(
                calculator,
                (segment.x_min, segment.y_min),
                columns.clone().map(|x| (x, (x, segment.y_min))),
            );
            let bottom = last_jump(
                calculator,
                (segment.x_min, segment.y_max),
                columns.map(|x| (x, (x, segment.y_max))),
            );
            (top, bottom, segment.x_min + segment.width() / 2, false)
        }
        SegmentCoverage::Inside => {
            return Err(GeocodingError::illegal_state(
                "cannot split a segment that is inside its bounding box",
            ))
        }
    };

    // the jump index is compared as an absolute pixel index
    let Some(split) = closest_split(first, second, 0, center) else {
        return Ok(Vec::new());
    };

    if across {
        Ok(segment.split_y(split).unwrap_or_else(|_| segment.split(true)))
    } else {
        Ok(segment.split_x(split).unwrap_or_else(|_| segment.split(false)))
    }
}

/// Index of the last longitude jump above [`ANGLE_THRESHOLD`] along a
/// walk of `(index, pixel)` steps starting at `start`.
fn last_jump<C: GeoPosCalculator + ?Sized>(
    calculator: &C,
    start: (i32, i32),
    steps: impl Iterator<Item = (i32, (i32, i32))>,
) -> Option<i32> {
    let mut previous = calculator.geo_pos_at(start.0, start.1).lon;
    let mut jump = None;
    for (index, (x, y)) in steps {
        let current = calculator.geo_pos_at(x, y).lon;
        if (previous - current).abs() > ANGLE_THRESHOLD {
            jump = Some(index);
        }
        previous = current;
    }
    jump
}
