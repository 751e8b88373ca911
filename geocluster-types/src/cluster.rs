use crate::point::GeoPoint;
use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-category tally for a cluster, ordered by category name.
pub type CategoryCounts = BTreeMap<String, usize>;

/// A display record produced by grid clustering.
///
/// Either a single point (`is_aggregate == false`, `count == 1`, carrying the
/// point itself) or an aggregate standing in for every point of one geohash
/// cell (`is_aggregate == true`, no representative).
///
/// Invariant: the values of `category_counts` sum to `count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// Point id for individual records, cell geohash for aggregates
    pub id: String,
    /// Geohash of the cell the record was grouped under
    pub geohash: String,
    pub is_aggregate: bool,
    pub center_lat: f64,
    pub center_lng: f64,
    pub count: usize,
    pub category_counts: CategoryCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub representative_point: Option<GeoPoint>,
}

impl ClusterRecord {
    /// Record for one point shown at its own coordinates.
    pub fn single(point: &GeoPoint, geohash: impl Into<String>) -> Self {
        let mut category_counts = CategoryCounts::new();
        category_counts.insert(point.category.clone(), 1);

        Self {
            id: point.id.clone(),
            geohash: geohash.into(),
            is_aggregate: false,
            center_lat: point.latitude,
            center_lng: point.longitude,
            count: 1,
            category_counts,
            representative_point: Some(point.clone()),
        }
    }

    /// Aggregate record for a whole cell.
    ///
    /// `count` is derived from the histogram so the sum invariant holds by
    /// construction.
    pub fn aggregate(
        geohash: impl Into<String>,
        center: Point<f64>,
        counts: CategoryCounts,
    ) -> Self {
        let geohash = geohash.into();
        let count = counts.values().sum();

        Self {
            id: geohash.clone(),
            geohash,
            is_aggregate: true,
            center_lat: center.y(),
            center_lng: center.x(),
            count,
            category_counts: counts,
            representative_point: None,
        }
    }

    /// Center as a `geo::Point` (x = longitude, y = latitude).
    pub fn center(&self) -> Point<f64> {
        Point::new(self.center_lng, self.center_lat)
    }

    /// Check the record's structural invariants.
    pub fn is_consistent(&self) -> bool {
        let tally: usize = self.category_counts.values().sum();
        let representative_ok = match &self.representative_point {
            Some(_) => self.count == 1 && !self.is_aggregate,
            None => true,
        };
        tally == self.count && representative_ok
    }
}
