//! Precomputed cluster index: one clustering per zoom level.
//!
//! Map clients hit the index for whole-world views instead of clustering the
//! full point set per request. Each zoom is an independent task writing its
//! own entry, so with the `parallel` feature zooms run on the rayon pool.

use crate::compute::cluster::cluster_validated;
use crate::compute::geohash::precision_for_zoom;
use crate::compute::parallel::*;
use crate::compute::validation::validate_points;
use crate::config::Config;
use crate::error::Result;
use geocluster_types::cluster::ClusterRecord;
use geocluster_types::point::GeoPoint;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Cell size above which the index aggregates a cell.
pub const DEFAULT_INDEX_THRESHOLD: usize = 10;

/// Zoom level -> cluster records at that zoom.
pub type ClusterIndex = BTreeMap<u32, Vec<ClusterRecord>>;

/// Cluster `points` at every zoom in `zooms` with [`DEFAULT_INDEX_THRESHOLD`].
///
/// # Examples
///
/// ```rust
/// use geocluster::compute::index::build_index;
/// use geocluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("1", 19.0, 72.0, "Cricket"),
///     GeoPoint::new("2", 40.0, -3.0, "Tennis"),
/// ];
///
/// let index = build_index(&points, 3..=18)?;
/// assert_eq!(index.len(), 16);
/// assert_eq!(index[&3].len(), 2);
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn build_index<'a, I>(points: I, zooms: RangeInclusive<u32>) -> Result<ClusterIndex>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    build_index_with_threshold(points, zooms, DEFAULT_INDEX_THRESHOLD)
}

/// Cluster `points` at every zoom in `zooms` with an explicit threshold.
///
/// Points are validated once up front; an invalid point fails the build
/// before any zoom is computed.
pub fn build_index_with_threshold<'a, I>(
    points: I,
    zooms: RangeInclusive<u32>,
    max_per_cell: usize,
) -> Result<ClusterIndex>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let points: Vec<&GeoPoint> = points.into_iter().collect();
    validate_points(points.iter().copied())?;

    let levels = zooms
        .into_par_iter()
        .map(|zoom| -> Result<(u32, Vec<ClusterRecord>)> {
            let records = cluster_validated(&points, precision_for_zoom(zoom), max_per_cell)?;
            Ok((zoom, records))
        })
        .collect::<Result<Vec<_>>>()?;

    let index: ClusterIndex = levels.into_iter().collect();
    log::debug!(
        "Built cluster index over {} points for {} zoom levels",
        points.len(),
        index.len()
    );

    Ok(index)
}

/// Build the index using the zoom range and threshold from `config`.
pub fn build_index_from_config<'a, I>(points: I, config: &Config) -> Result<ClusterIndex>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    config.check()?;
    build_index_with_threshold(points, config.index_zoom_range(), config.index_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::cluster::cluster_points;
    use crate::error::GeoClusterError;

    fn crowd(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| {
                let category = if i % 2 == 0 { "Cricket" } else { "Badminton" };
                GeoPoint::new(
                    i.to_string(),
                    19.0 + (i as f64) * 0.001,
                    72.8 + (i as f64) * 0.001,
                    category,
                )
            })
            .collect()
    }

    #[test]
    fn test_index_covers_zoom_range() {
        let points = crowd(25);
        let index = build_index(&points, 3..=18).unwrap();

        assert_eq!(index.len(), 16);
        let zooms: Vec<u32> = index.keys().copied().collect();
        assert_eq!(zooms, (3..=18).collect::<Vec<u32>>());

        for records in index.values() {
            let total: usize = records.iter().map(|r| r.count).sum();
            assert_eq!(total, points.len());
        }
    }

    #[test]
    fn test_each_zoom_matches_cluster_points() {
        let points = crowd(40);
        let index = build_index(&points, 3..=18).unwrap();

        for (zoom, records) in &index {
            let expected = cluster_points(&points, *zoom, DEFAULT_INDEX_THRESHOLD).unwrap();
            assert_eq!(records, &expected, "zoom {}", zoom);
        }
    }

    #[test]
    fn test_low_zoom_aggregates_crowd() {
        let points = crowd(25);
        let index = build_index(&points, 3..=3).unwrap();

        let records = &index[&3];
        assert_eq!(records.len(), 1);
        assert!(records[0].is_aggregate);
        assert_eq!(records[0].count, 25);
        assert_eq!(records[0].category_counts.get("Cricket"), Some(&13));
        assert_eq!(records[0].category_counts.get("Badminton"), Some(&12));
    }

    #[test]
    fn test_small_set_stays_individual() {
        let points = crowd(DEFAULT_INDEX_THRESHOLD);
        let index = build_index(&points, 3..=18).unwrap();
        assert!(index.values().flatten().all(|r| !r.is_aggregate));
    }

    #[test]
    fn test_custom_threshold_and_config() {
        let points = crowd(5);
        let index = build_index_with_threshold(&points, 5..=6, 2).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index[&5][0].is_aggregate);

        let config = Config::default()
            .with_index_zoom_range(10, 12)
            .with_index_threshold(100);
        let index = build_index_from_config(&points, &config).unwrap();
        assert_eq!(index.len(), 3);
        assert!(index.values().flatten().all(|r| !r.is_aggregate));
    }

    #[test]
    fn test_invalid_point_fails_build() {
        let mut points = crowd(3);
        points.push(GeoPoint::new("bad", 95.0, 72.0, "Cricket"));
        assert!(matches!(
            build_index(&points, 3..=18),
            Err(GeoClusterError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_empty_points() {
        let points: Vec<GeoPoint> = Vec::new();
        let index = build_index(&points, 3..=18).unwrap();
        assert_eq!(index.len(), 16);
        assert!(index.values().all(|records| records.is_empty()));
    }
}
