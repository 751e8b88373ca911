//! Grid clustering: partition points by geohash cell and collapse dense cells.
//!
//! Every point lands in the cell named by its geohash at the precision for
//! the requested zoom. Cells holding at most `max_per_cell` points emit one
//! record per point; denser cells emit a single aggregate record centered on
//! the cell with a per-category histogram.

use crate::compute::geohash::{decode_center, encode_unchecked, precision_for_zoom};
use crate::compute::validation::{validate_points, validate_precision};
use crate::error::Result;
use geocluster_types::cluster::{CategoryCounts, ClusterRecord};
use geocluster_types::point::GeoPoint;
use rustc_hash::FxHashMap;

/// Cluster `points` for display at `zoom`.
///
/// Output is ordered by cell geohash and, within a cell, by input order.
/// The sum of `count` over the output equals the number of input points.
///
/// # Errors
///
/// `InvalidCoordinate` naming the index of the first invalid point. Nothing
/// is emitted for a call that fails.
///
/// # Examples
///
/// ```rust
/// use geocluster::compute::cluster::cluster_points;
/// use geocluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("1", 19.0, 72.0, "Cricket"),
///     GeoPoint::new("2", 19.0001, 72.0001, "Cricket"),
///     GeoPoint::new("3", 40.0, -3.0, "Tennis"),
/// ];
///
/// let records = cluster_points(&points, 4, 1)?;
/// assert_eq!(records.len(), 2);
/// assert!(records[1].is_aggregate);
/// assert_eq!(records[1].count, 2);
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn cluster_points<'a, I>(
    points: I,
    zoom: u32,
    max_per_cell: usize,
) -> Result<Vec<ClusterRecord>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    cluster_points_at_precision(points, precision_for_zoom(zoom), max_per_cell)
}

/// Same as [`cluster_points`] with an explicit geohash precision.
pub fn cluster_points_at_precision<'a, I>(
    points: I,
    precision: usize,
    max_per_cell: usize,
) -> Result<Vec<ClusterRecord>>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    validate_precision(precision)?;

    let points: Vec<&GeoPoint> = points.into_iter().collect();
    validate_points(points.iter().copied())?;

    cluster_validated(&points, precision, max_per_cell)
}

/// Grouping step for points and a precision that were already validated.
pub(crate) fn cluster_validated(
    points: &[&GeoPoint],
    precision: usize,
    max_per_cell: usize,
) -> Result<Vec<ClusterRecord>> {
    let mut cells: FxHashMap<String, Vec<&GeoPoint>> = FxHashMap::default();
    for &point in points {
        let hash = encode_unchecked(point.latitude, point.longitude, precision);
        cells.entry(hash).or_default().push(point);
    }

    let mut cells: Vec<(String, Vec<&GeoPoint>)> = cells.into_iter().collect();
    cells.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut records = Vec::with_capacity(cells.len());
    for (hash, members) in cells {
        if members.len() <= max_per_cell {
            records.extend(
                members
                    .into_iter()
                    .map(|point| ClusterRecord::single(point, hash.clone())),
            );
        } else {
            let center = decode_center(&hash)?;
            let counts = category_counts(&members);
            records.push(ClusterRecord::aggregate(hash, center, counts));
        }
    }

    log::debug!(
        "Clustered {} points into {} records at precision {}",
        points.len(),
        records.len(),
        precision
    );

    Ok(records)
}

fn category_counts(points: &[&GeoPoint]) -> CategoryCounts {
    let mut counts = CategoryCounts::new();
    for point in points {
        *counts.entry(point.category.clone()).or_insert(0) += 1;
    }
    counts
}
