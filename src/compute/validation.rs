//! Validation for geographic coordinates, precisions and point sets.

use crate::config::InvalidPointPolicy;
use crate::error::{GeoClusterError, Result};
use geocluster_types::bbox::BoundingBox;
use geocluster_types::point::GeoPoint;

/// Largest geohash length accepted by the codec.
pub const MAX_PRECISION: usize = 12;

/// Validates a latitude/longitude pair.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_coordinate;
///
/// assert!(validate_coordinate(19.076, 72.877).is_ok());
/// assert!(validate_coordinate(95.0, 72.877).is_err());
/// assert!(validate_coordinate(19.076, f64::NAN).is_err());
/// ```
pub fn validate_coordinate(lat: f64, lng: f64) -> Result<()> {
    match coordinate_problem(lat, lng) {
        Some(problem) => Err(GeoClusterError::InvalidCoordinate(problem)),
        None => Ok(()),
    }
}

fn coordinate_problem(lat: f64, lng: f64) -> Option<String> {
    if !lng.is_finite() {
        return Some(format!("Longitude must be finite, got: {}", lng));
    }

    if !lat.is_finite() {
        return Some(format!("Latitude must be finite, got: {}", lat));
    }

    if !(-180.0..=180.0).contains(&lng) {
        return Some(format!("Longitude out of range [-180.0, 180.0]: {}", lng));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Some(format!("Latitude out of range [-90.0, 90.0]: {}", lat));
    }

    None
}

/// Validates a geohash precision (1..=12).
pub fn validate_precision(precision: usize) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(GeoClusterError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Validates a bounding box: finite edges inside the WGS84 ranges and
/// `min <= max` on both axes.
///
/// Boxes crossing the antimeridian (`min_lng > max_lng`) are rejected.
pub fn validate_bounds(bbox: &BoundingBox) -> Result<()> {
    for (lat, lng) in [(bbox.min_lat, bbox.min_lng), (bbox.max_lat, bbox.max_lng)] {
        if let Some(problem) = coordinate_problem(lat, lng) {
            return Err(GeoClusterError::InvalidBounds(problem));
        }
    }

    if bbox.min_lat > bbox.max_lat {
        return Err(GeoClusterError::InvalidBounds(format!(
            "min_lat ({}) must be <= max_lat ({})",
            bbox.min_lat, bbox.max_lat
        )));
    }

    if bbox.min_lng > bbox.max_lng {
        return Err(GeoClusterError::InvalidBounds(format!(
            "min_lng ({}) must be <= max_lng ({})",
            bbox.min_lng, bbox.max_lng
        )));
    }

    Ok(())
}

/// Validates every point, failing on the first invalid one.
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_points;
/// use geocluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("a", 19.0, 72.0, "Cricket"),
///     GeoPoint::new("b", 999.0, 72.0, "Cricket"), // Invalid
/// ];
/// assert!(validate_points(&points).is_err());
/// ```
pub fn validate_points<'a, I>(points: I) -> Result<()>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    for (idx, point) in points.into_iter().enumerate() {
        if let Some(problem) = coordinate_problem(point.latitude, point.longitude) {
            return Err(index_error(idx, point, &problem));
        }
    }
    Ok(())
}

/// Applies an [`InvalidPointPolicy`] to a point set.
///
/// With `Skip`, returns the valid points and logs each dropped one. With
/// `Reject`, returns all points or the first validation error.
pub fn apply_policy<'a, I>(points: I, policy: InvalidPointPolicy) -> Result<Vec<&'a GeoPoint>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut accepted = Vec::new();
    for (idx, point) in points.into_iter().enumerate() {
        let Some(problem) = coordinate_problem(point.latitude, point.longitude) else {
            accepted.push(point);
            continue;
        };

        match policy {
            InvalidPointPolicy::Skip => {
                log::warn!("Skipping point '{}' at index {}: {}", point.id, idx, problem);
            }
            InvalidPointPolicy::Reject => return Err(index_error(idx, point, &problem)),
        }
    }
    Ok(accepted)
}

fn index_error(idx: usize, point: &GeoPoint, problem: &str) -> GeoClusterError {
    GeoClusterError::InvalidCoordinate(format!(
        "Point '{}' at index {}: {}",
        point.id, idx, problem
    ))
}
