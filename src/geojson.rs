//! GeoJSON export for cluster records.

use crate::error::Result;
use ::geojson::feature::Id;
use ::geojson::{Feature, FeatureCollection, Geometry, Value};
use geocluster_types::cluster::ClusterRecord;
use serde_json::{Map, json};

/// Converts one record into a Point feature at its center.
pub fn cluster_to_feature(record: &ClusterRecord) -> Feature {
    let center = record.center();
    let geom = Geometry::new(Value::Point(vec![center.x(), center.y()]));

    let mut props = Map::new();
    props.insert("id".to_string(), json!(record.id));
    props.insert("geohash".to_string(), json!(record.geohash));
    props.insert("isAggregate".to_string(), json!(record.is_aggregate));
    props.insert("count".to_string(), json!(record.count));
    props.insert("categoryCounts".to_string(), json!(record.category_counts));

    Feature {
        bbox: None,
        geometry: Some(geom),
        id: Some(Id::String(record.id.clone())),
        properties: Some(props),
        foreign_members: None,
    }
}

/// Converts records into a FeatureCollection, one feature per record.
pub fn clusters_to_feature_collection(records: &[ClusterRecord]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: records.iter().map(cluster_to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes records as a GeoJSON FeatureCollection string.
///
/// # Examples
///
/// ```rust
/// use geocluster::compute::cluster::cluster_points;
/// use geocluster::geojson::clusters_to_geojson;
/// use geocluster::GeoPoint;
///
/// let points = vec![GeoPoint::new("1", 19.076, 72.877, "Cricket")];
/// let records = cluster_points(&points, 11, 10)?;
///
/// let geojson = clusters_to_geojson(&records)?;
/// assert!(geojson.contains("FeatureCollection"));
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn clusters_to_geojson(records: &[ClusterRecord]) -> Result<String> {
    Ok(serde_json::to_string(&clusters_to_feature_collection(records))?)
}
