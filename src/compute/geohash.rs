//! Geohash codec: encode/decode between coordinates and base32 cell ids,
//! the zoom to precision table, and covering sets for bounding boxes.
//!
//! Encoding bisects longitude `[-180, 180]` and latitude `[-90, 90]`
//! alternately, longitude first. Each bisection emits a `1` bit when the
//! coordinate lies in the upper half (`>=` the midpoint), and every 5 bits
//! become one symbol of the alphabet `0123456789bcdefghjkmnpqrstuvwxyz`.
//!
//! | Precision | Cell size (approx) | Typical zoom |
//! |-----------|--------------------|--------------|
//! | 1         | ~5000km            | 0-3 world    |
//! | 3         | ~156km             | 6-7 country  |
//! | 5         | ~4.9km             | 10-11 city   |
//! | 6         | ~1.2km             | 12-13 neighbourhood |
//! | 8         | ~38m               | 16+ building |
//!
//! ```rust
//! use geocluster::compute::geohash::{decode, encode};
//!
//! let hash = encode(19.076, 72.877, 5)?;
//! assert_eq!(hash, "te7ud");
//!
//! let cell = decode(&hash)?;
//! assert!(cell.contains(19.076, 72.877));
//! # Ok::<(), geocluster::GeoClusterError>(())
//! ```

use crate::compute::validation::{validate_bounds, validate_coordinate, validate_precision};
use crate::error::{GeoClusterError, Result};
use geo::Point;
use geocluster_types::bbox::BoundingBox;
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

pub use ::geohash::Neighbors;

/// The 32-symbol geohash alphabet.
pub const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Fraction of a cell's width/height used as the covering sample step.
pub const COVERING_STEP_FACTOR: f64 = 0.9;

/// Default upper bound on grid samples for [`covering_geohashes`].
pub const DEFAULT_MAX_COVERING_SAMPLES: usize = 1 << 18;

const BITS_PER_SYMBOL: usize = 5;

/// Upper zoom bound (inclusive) -> precision. Zooms past the last entry map to
/// [`MAX_ZOOM_PRECISION`].
const ZOOM_PRECISION: [(u32, usize); 7] = [
    (3, 1),  // world
    (5, 2),  // continent
    (7, 3),  // country
    (9, 4),  // region
    (11, 5), // city
    (13, 6), // neighbourhood
    (15, 7), // street
];

const MAX_ZOOM_PRECISION: usize = 8;

/// ASCII -> symbol value.
static DECODE_TABLE: Lazy<[Option<u8>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (value, symbol) in BASE32.iter().enumerate() {
        table[*symbol as usize] = Some(value as u8);
    }
    table
});

/// Encode a coordinate into a geohash of `precision` symbols.
///
/// # Errors
///
/// `InvalidPrecision` if `precision` is not in `1..=12`, `InvalidCoordinate`
/// for NaN or out-of-range coordinates.
pub fn encode(lat: f64, lng: f64, precision: usize) -> Result<String> {
    validate_precision(precision)?;
    validate_coordinate(lat, lng)?;
    Ok(encode_unchecked(lat, lng, precision))
}

/// Encode without validating; callers guarantee valid inputs.
pub(crate) fn encode_unchecked(lat: f64, lng: f64, precision: usize) -> String {
    let mut lat_range = (-90.0, 90.0);
    let mut lng_range = (-180.0, 180.0);
    let mut hash = String::with_capacity(precision);
    let mut lng_turn = true;

    while hash.len() < precision {
        let mut symbol = 0usize;
        for _ in 0..BITS_PER_SYMBOL {
            let upper = if lng_turn {
                bisect(&mut lng_range, lng)
            } else {
                bisect(&mut lat_range, lat)
            };
            symbol = (symbol << 1) | usize::from(upper);
            lng_turn = !lng_turn;
        }
        hash.push(BASE32[symbol] as char);
    }

    hash
}

/// Halve `range` towards `value`; returns whether the upper half was kept.
#[inline]
fn bisect(range: &mut (f64, f64), value: f64) -> bool {
    let mid = (range.0 + range.1) / 2.0;
    let upper = value >= mid;
    narrow(range, upper);
    upper
}

#[inline]
fn narrow(range: &mut (f64, f64), upper: bool) {
    let mid = (range.0 + range.1) / 2.0;
    if upper {
        range.0 = mid;
    } else {
        range.1 = mid;
    }
}

/// Decode a geohash into the bounds of its cell.
///
/// # Errors
///
/// `InvalidGeohashCharacter` for symbols outside the alphabet (the alphabet is
/// lowercase only), `InvalidPrecision` for empty hashes or hashes longer than
/// 12 symbols.
pub fn decode(hash: &str) -> Result<BoundingBox> {
    let symbols = hash
        .chars()
        .enumerate()
        .map(|(position, character)| {
            symbol_value(character).ok_or(GeoClusterError::InvalidGeohashCharacter {
                character,
                position,
            })
        })
        .collect::<Result<Vec<u8>>>()?;
    validate_precision(symbols.len())?;

    Ok(decode_symbols(&symbols))
}

fn symbol_value(character: char) -> Option<u8> {
    if character.is_ascii() {
        DECODE_TABLE[character as usize]
    } else {
        None
    }
}

/// Bounds of the cell holding a coordinate already known to be valid.
fn cell_unchecked(lat: f64, lng: f64, precision: usize) -> BoundingBox {
    let symbols: Vec<u8> = encode_unchecked(lat, lng, precision)
        .chars()
        .filter_map(symbol_value)
        .collect();
    decode_symbols(&symbols)
}

fn decode_symbols(symbols: &[u8]) -> BoundingBox {
    let mut lat_range = (-90.0, 90.0);
    let mut lng_range = (-180.0, 180.0);
    let mut lng_turn = true;

    for symbol in symbols {
        for shift in (0..BITS_PER_SYMBOL).rev() {
            let upper = (symbol >> shift) & 1 == 1;
            if lng_turn {
                narrow(&mut lng_range, upper);
            } else {
                narrow(&mut lat_range, upper);
            }
            lng_turn = !lng_turn;
        }
    }

    BoundingBox::new(lat_range.0, lat_range.1, lng_range.0, lng_range.1)
}

/// Center of a geohash cell as a `geo::Point` (x = longitude, y = latitude).
pub fn decode_center(hash: &str) -> Result<Point<f64>> {
    Ok(decode(hash)?.center())
}

/// Geohash precision for a map zoom level.
///
/// Total and monotonic non-decreasing: zoom <= 3 -> 1, <= 5 -> 2, <= 7 -> 3,
/// <= 9 -> 4, <= 11 -> 5, <= 13 -> 6, <= 15 -> 7, anything higher -> 8.
pub fn precision_for_zoom(zoom: u32) -> usize {
    ZOOM_PRECISION
        .iter()
        .find(|(max_zoom, _)| zoom <= *max_zoom)
        .map(|(_, precision)| *precision)
        .unwrap_or(MAX_ZOOM_PRECISION)
}

/// Geohashes whose cells cover `bbox` at `precision`.
///
/// Uses [`DEFAULT_MAX_COVERING_SAMPLES`] as the sample limit.
pub fn covering_geohashes(bbox: &BoundingBox, precision: usize) -> Result<FxHashSet<String>> {
    covering_geohashes_with_limit(bbox, precision, DEFAULT_MAX_COVERING_SAMPLES)
}

/// Geohashes whose cells cover `bbox` at `precision`, sampling at most
/// `max_samples` grid points.
///
/// The box is sampled on a grid whose step is [`COVERING_STEP_FACTOR`] times
/// the size of the cell holding the `(min_lat, min_lng)` corner. The last row
/// and column of samples can stop short of the max edges by up to one step, so
/// the `max_lat` row and `max_lng` column are sampled as well, together with
/// the four corners. Cells at one precision all share a size, so every cell
/// touching the box is hit.
///
/// # Errors
///
/// `InvalidPrecision`, `InvalidBounds`, or `CoverageTooLarge` when the grid
/// would exceed `max_samples`.
pub fn covering_geohashes_with_limit(
    bbox: &BoundingBox,
    precision: usize,
    max_samples: usize,
) -> Result<FxHashSet<String>> {
    validate_precision(precision)?;
    validate_bounds(bbox)?;

    let sample_cell = cell_unchecked(bbox.min_lat, bbox.min_lng, precision);
    let lat_step = sample_cell.height() * COVERING_STEP_FACTOR;
    let lng_step = sample_cell.width() * COVERING_STEP_FACTOR;

    let lat_samples = (bbox.height() / lat_step).floor() as usize + 2;
    let lng_samples = (bbox.width() / lng_step).floor() as usize + 2;
    let samples = lat_samples.saturating_mul(lng_samples);
    if samples > max_samples {
        return Err(GeoClusterError::CoverageTooLarge {
            samples,
            limit: max_samples,
        });
    }

    let mut hashes = FxHashSet::default();

    let mut lat = bbox.min_lat;
    while lat <= bbox.max_lat {
        let mut lng = bbox.min_lng;
        while lng <= bbox.max_lng {
            hashes.insert(encode_unchecked(lat, lng, precision));
            lng += lng_step;
        }
        hashes.insert(encode_unchecked(lat, bbox.max_lng, precision));
        lat += lat_step;
    }

    let mut lng = bbox.min_lng;
    while lng <= bbox.max_lng {
        hashes.insert(encode_unchecked(bbox.max_lat, lng, precision));
        lng += lng_step;
    }

    for corner_lat in [bbox.min_lat, bbox.max_lat] {
        for corner_lng in [bbox.min_lng, bbox.max_lng] {
            hashes.insert(encode_unchecked(corner_lat, corner_lng, precision));
        }
    }

    Ok(hashes)
}

/// The eight cells adjacent to `hash`.
///
/// # Errors
///
/// Decoding errors for malformed hashes; `InvalidInput` when a neighbour
/// would fall past a pole.
pub fn neighbors(hash: &str) -> Result<Neighbors> {
    decode(hash)?;
    ::geohash::neighbors(hash)
        .map_err(|e| GeoClusterError::InvalidInput(format!("No neighbours for '{}': {}", hash, e)))
}
