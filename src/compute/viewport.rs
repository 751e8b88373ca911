//! Viewport filtering.
//!
//! A covering set of geohash cells prunes points cheaply; an exact inclusive
//! bounds check then decides membership. The exact check is authoritative,
//! so a covering set that over-approximates the box never leaks points.

use crate::compute::geohash::{
    DEFAULT_MAX_COVERING_SAMPLES, covering_geohashes_with_limit, encode_unchecked,
};
use crate::compute::validation::validate_bounds;
use crate::error::{GeoClusterError, Result};
use geocluster_types::bbox::BoundingBox;
use geocluster_types::point::GeoPoint;

/// Build a validated bounding box.
///
/// # Errors
///
/// `InvalidBounds` for non-finite or out-of-range edges and for
/// `min > max` on either axis.
pub fn bounding_box(
    min_lat: f64,
    max_lat: f64,
    min_lng: f64,
    max_lng: f64,
) -> Result<BoundingBox> {
    let bbox = BoundingBox::new(min_lat, max_lat, min_lng, max_lng);
    validate_bounds(&bbox)?;
    Ok(bbox)
}

/// Points inside `bbox` (edges inclusive), in input order.
///
/// # Examples
///
/// ```rust
/// use geocluster::compute::viewport::{bounding_box, filter_by_viewport};
/// use geocluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("mumbai", 19.076, 72.877, "Cricket"),
///     GeoPoint::new("pune", 18.520, 73.856, "Tennis"),
/// ];
/// let bbox = bounding_box(18.9, 19.3, 72.7, 73.1)?;
///
/// let inside = filter_by_viewport(&points, &bbox, 5)?;
/// assert_eq!(inside.len(), 1);
/// assert_eq!(inside[0].id, "mumbai");
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn filter_by_viewport<'a, I>(
    points: I,
    bbox: &BoundingBox,
    precision: usize,
) -> Result<Vec<&'a GeoPoint>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    filter_by_viewport_with_limit(points, bbox, precision, DEFAULT_MAX_COVERING_SAMPLES)
}

/// Same as [`filter_by_viewport`] with an explicit covering sample limit.
///
/// When the covering set would need more than `max_samples` samples, pruning
/// is skipped and the exact bounds check alone decides.
pub fn filter_by_viewport_with_limit<'a, I>(
    points: I,
    bbox: &BoundingBox,
    precision: usize,
    max_samples: usize,
) -> Result<Vec<&'a GeoPoint>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let cover = match covering_geohashes_with_limit(bbox, precision, max_samples) {
        Ok(cover) => Some(cover),
        Err(GeoClusterError::CoverageTooLarge { samples, limit }) => {
            log::debug!(
                "Covering set needs {} samples (limit {}), filtering by bounds only",
                samples,
                limit
            );
            None
        }
        Err(e) => return Err(e),
    };

    let inside: Vec<&GeoPoint> = points
        .into_iter()
        .filter(|point| point.has_valid_coordinates())
        .filter(|point| match &cover {
            Some(cover) => {
                cover.contains(&encode_unchecked(point.latitude, point.longitude, precision))
            }
            None => true,
        })
        .filter(|point| bbox.contains(point.latitude, point.longitude))
        .collect();

    log::debug!("{} points inside viewport at precision {}", inside.len(), precision);

    Ok(inside)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new("mumbai", 19.076, 72.877, "Cricket"),
            GeoPoint::new("pune", 18.520, 73.856, "Tennis"),
            GeoPoint::new("thane", 19.2183, 72.9781, "Football"),
            GeoPoint::new("nyc", 40.7128, -74.0060, "Tennis"),
        ]
    }

    #[test]
    fn test_bounding_box_validation() {
        assert!(bounding_box(18.9, 19.3, 72.7, 73.1).is_ok());
        assert!(matches!(
            bounding_box(19.3, 18.9, 72.7, 73.1),
            Err(GeoClusterError::InvalidBounds(_))
        ));
        assert!(bounding_box(18.9, 19.3, 179.0, -179.0).is_err());
        assert!(bounding_box(f64::NAN, 19.3, 72.7, 73.1).is_err());
    }

    #[test]
    fn test_filter_matches_exact_bounds() {
        let points = players();
        let bbox = bounding_box(18.9, 19.3, 72.7, 73.1).unwrap();

        for precision in 1..=7 {
            let inside = filter_by_viewport(&points, &bbox, precision).unwrap();
            let ids: Vec<&str> = inside.iter().map(|p| p.id.as_str()).collect();
            assert_eq!(ids, vec!["mumbai", "thane"], "precision {}", precision);
        }
    }

    #[test]
    fn test_edges_are_inclusive() {
        let points = vec![
            GeoPoint::new("sw", 18.9, 72.7, "Cricket"),
            GeoPoint::new("ne", 19.3, 73.1, "Cricket"),
            GeoPoint::new("se", 18.9, 73.1, "Cricket"),
            GeoPoint::new("nw", 19.3, 72.7, "Cricket"),
            GeoPoint::new("out", 19.3000001, 73.1, "Cricket"),
        ];
        let bbox = bounding_box(18.9, 19.3, 72.7, 73.1).unwrap();

        let inside = filter_by_viewport(&points, &bbox, 6).unwrap();
        assert_eq!(inside.len(), 4);
        assert!(inside.iter().all(|p| p.id != "out"));
    }

    #[test]
    fn test_grid_of_points_matches_bounds_check() {
        let mut points = Vec::new();
        for i in 0..60 {
            for j in 0..60 {
                let lat = 10.0 + i as f64 * 0.37;
                let lng = 60.0 + j as f64 * 0.41;
                points.push(GeoPoint::new(format!("{}-{}", i, j), lat, lng, "Cricket"));
            }
        }
        let bbox = bounding_box(14.05, 21.7, 66.3, 79.9).unwrap();

        for precision in [2, 3, 4] {
            let inside = filter_by_viewport(&points, &bbox, precision).unwrap();
            let expected = points
                .iter()
                .filter(|p| bbox.contains(p.latitude, p.longitude))
                .count();
            assert_eq!(inside.len(), expected);
        }
    }

    #[test]
    fn test_invalid_points_excluded() {
        let mut points = players();
        points.push(GeoPoint::new("nan", f64::NAN, 72.9, "Cricket"));
        let bbox = bounding_box(18.9, 19.3, 72.7, 73.1).unwrap();

        let inside = filter_by_viewport(&points, &bbox, 5).unwrap();
        assert_eq!(inside.len(), 2);
    }

    #[test]
    fn test_fallback_when_coverage_too_large() {
        let points = players();
        let world = bounding_box(-90.0, 90.0, -180.0, 180.0).unwrap();

        let inside = filter_by_viewport_with_limit(&points, &world, 8, 16).unwrap();
        assert_eq!(inside.len(), points.len());
    }

    #[test]
    fn test_invalid_precision_rejected() {
        let points = players();
        let bbox = bounding_box(18.9, 19.3, 72.7, 73.1).unwrap();
        assert!(matches!(
            filter_by_viewport(&points, &bbox, 0),
            Err(GeoClusterError::InvalidPrecision(0))
        ));
    }
}
