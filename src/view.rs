//! Viewport request pipeline.
//!
//! Turns a map request (visible bounds, zoom, optional category) into the
//! bounded set of records a client draws: invalid points are handled by the
//! configured policy, the category filter and the viewport filter narrow the
//! set, and grid clustering collapses dense cells.

use crate::compute::cluster::cluster_points;
use crate::compute::geohash::precision_for_zoom;
use crate::compute::validation::{apply_policy, validate_bounds};
use crate::compute::viewport::filter_by_viewport_with_limit;
use crate::config::Config;
use crate::error::Result;
use geocluster_types::bbox::BoundingBox;
use geocluster_types::cluster::ClusterRecord;
use geocluster_types::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// A map viewport request.
///
/// Missing `zoom` and `aggregation_threshold` fall back to the [`Config`]
/// defaults (11 and 100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportRequest {
    pub bounds: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u32>,
    /// Case-insensitive category; `None`, empty and `"All"` disable filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_threshold: Option<usize>,
}

impl ViewportRequest {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            zoom: None,
            category: None,
            aggregation_threshold: None,
        }
    }

    pub fn with_zoom(mut self, zoom: u32) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_aggregation_threshold(mut self, threshold: usize) -> Self {
        self.aggregation_threshold = Some(threshold);
        self
    }
}

/// Records to draw for one viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterView {
    pub viewport: BoundingBox,
    pub zoom: u32,
    /// Points represented by `clusters` (sum of their counts)
    pub total_in_viewport: usize,
    pub clusters: Vec<ClusterRecord>,
}

impl ClusterView {
    /// Number of aggregate records in the view.
    pub fn aggregate_count(&self) -> usize {
        self.clusters.iter().filter(|r| r.is_aggregate).count()
    }
}

/// Run the viewport pipeline over `points`.
///
/// # Errors
///
/// `InvalidConfig` for an invalid `config`, `InvalidBounds` for a malformed
/// viewport, `InvalidCoordinate` when `config.invalid_points` is `Reject` and
/// a point is invalid.
///
/// # Examples
///
/// ```rust
/// use geocluster::view::{viewport_clusters, ViewportRequest};
/// use geocluster::{BoundingBox, Config, GeoPoint};
///
/// let points = vec![
///     GeoPoint::new("1", 19.076, 72.877, "Cricket"),
///     GeoPoint::new("2", 19.077, 72.878, "Tennis"),
///     GeoPoint::new("3", 28.6139, 77.2090, "Cricket"),
/// ];
/// let request = ViewportRequest::new(BoundingBox::new(18.9, 19.3, 72.7, 73.1))
///     .with_zoom(11)
///     .with_category("cricket");
///
/// let view = viewport_clusters(&points, &request, &Config::default())?;
/// assert_eq!(view.total_in_viewport, 1);
/// assert_eq!(view.clusters[0].id, "1");
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn viewport_clusters<'a, I>(
    points: I,
    request: &ViewportRequest,
    config: &Config,
) -> Result<ClusterView>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    config.check()?;
    validate_bounds(&request.bounds)?;

    let zoom = request.zoom.unwrap_or(config.default_zoom);
    let threshold = request
        .aggregation_threshold
        .unwrap_or(config.aggregation_threshold);
    let precision = precision_for_zoom(zoom);

    let valid = apply_policy(points, config.invalid_points)?;
    let received = valid.len();

    let matching = valid
        .into_iter()
        .filter(|point| point.matches_category(request.category.as_deref()));
    let visible = filter_by_viewport_with_limit(
        matching,
        &request.bounds,
        precision,
        config.max_covering_cells,
    )?;
    let clusters = cluster_points(visible.iter().copied(), zoom, threshold)?;
    let total_in_viewport = clusters.iter().map(|r| r.count).sum();

    log::debug!(
        "Viewport z{}: {} points in, {} visible, {} records out",
        zoom,
        received,
        visible.len(),
        clusters.len()
    );

    Ok(ClusterView {
        viewport: request.bounds,
        zoom,
        total_in_viewport,
        clusters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvalidPointPolicy;
    use crate::error::GeoClusterError;

    fn mumbai() -> BoundingBox {
        BoundingBox::new(18.9, 19.3, 72.7, 73.1)
    }

    fn players() -> Vec<GeoPoint> {
        let mut points = Vec::new();
        for i in 0..30 {
            let category = if i % 3 == 0 { "Tennis" } else { "Cricket" };
            points.push(GeoPoint::new(
                format!("m{}", i),
                19.07 + (i as f64) * 0.0001,
                72.87 + (i as f64) * 0.0001,
                category,
            ));
        }
        points.push(GeoPoint::new("pune", 18.520, 73.856, "Cricket"));
        points.push(GeoPoint::new("delhi", 28.6139, 77.2090, "Tennis"));
        points
    }

    #[test]
    fn test_defaults_keep_points_individual() {
        let points = players();
        let request = ViewportRequest::new(mumbai());
        let view = viewport_clusters(&points, &request, &Config::default()).unwrap();

        assert_eq!(view.zoom, 11);
        assert_eq!(view.viewport, mumbai());
        assert_eq!(view.total_in_viewport, 30);
        assert_eq!(view.clusters.len(), 30);
        assert_eq!(view.aggregate_count(), 0);
    }

    #[test]
    fn test_request_threshold_aggregates() {
        let points = players();
        let request = ViewportRequest::new(mumbai())
            .with_zoom(5)
            .with_aggregation_threshold(10);
        let view = viewport_clusters(&points, &request, &Config::default()).unwrap();

        assert_eq!(view.total_in_viewport, 30);
        assert_eq!(view.clusters.len(), 1);
        let cluster = &view.clusters[0];
        assert!(cluster.is_aggregate);
        assert_eq!(cluster.category_counts.get("Tennis"), Some(&10));
        assert_eq!(cluster.category_counts.get("Cricket"), Some(&20));
    }

    #[test]
    fn test_category_filter() {
        let points = players();

        let request = ViewportRequest::new(mumbai()).with_category("TENNIS");
        let view = viewport_clusters(&points, &request, &Config::default()).unwrap();
        assert_eq!(view.total_in_viewport, 10);

        let request = ViewportRequest::new(mumbai()).with_category("All");
        let view = viewport_clusters(&points, &request, &Config::default()).unwrap();
        assert_eq!(view.total_in_viewport, 30);
    }

    #[test]
    fn test_invalid_point_policy() {
        let mut points = players();
        points.push(GeoPoint::new("broken", f64::NAN, 72.9, "Cricket"));
        let request = ViewportRequest::new(mumbai());

        let view = viewport_clusters(&points, &request, &Config::default()).unwrap();
        assert_eq!(view.total_in_viewport, 30);

        let strict = Config::default().with_invalid_points(InvalidPointPolicy::Reject);
        assert!(matches!(
            viewport_clusters(&points, &request, &strict),
            Err(GeoClusterError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_bad_viewport_rejected() {
        let points = players();
        let request = ViewportRequest::new(BoundingBox::new(19.3, 18.9, 72.7, 73.1));
        assert!(matches!(
            viewport_clusters(&points, &request, &Config::default()),
            Err(GeoClusterError::InvalidBounds(_))
        ));
    }

    #[test]
    fn test_config_defaults_apply() {
        let points = players();
        let config = Config::default()
            .with_default_zoom(3)
            .with_aggregation_threshold(5);
        let view = viewport_clusters(&points, &ViewportRequest::new(mumbai()), &config).unwrap();

        assert_eq!(view.zoom, 3);
        assert_eq!(view.clusters.len(), 1);
        assert!(view.clusters[0].is_aggregate);
    }

    #[test]
    fn test_request_json_shape() {
        let json = r#"{
            "bounds": { "minLat": 18.9, "maxLat": 19.3, "minLng": 72.7, "maxLng": 73.1 },
            "category": "Cricket"
        }"#;
        let request: ViewportRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.bounds, mumbai());
        assert_eq!(request.zoom, None);

        let view = viewport_clusters(&players(), &request, &Config::default()).unwrap();
        let out = serde_json::to_value(&view).unwrap();
        assert_eq!(out["totalInViewport"], 20);
        assert_eq!(out["viewport"]["minLat"], 18.9);
        assert!(out["clusters"].is_array());
    }
}
