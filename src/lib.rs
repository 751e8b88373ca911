//! Geohash codec and grid clustering engine for map viewports.
//!
//! Turns a raw point set plus a viewport and zoom level into a bounded set of
//! display records: sparse cells keep their points, dense cells collapse into
//! one aggregate with a per-category histogram.
//!
//! ```rust
//! use geocluster::prelude::*;
//!
//! let points = vec![
//!     GeoPoint::new("1", 19.0, 72.0, "Cricket"),
//!     GeoPoint::new("2", 19.0001, 72.0001, "Cricket"),
//!     GeoPoint::new("3", 40.0, -3.0, "Tennis"),
//! ];
//!
//! assert_eq!(encode(19.076, 72.877, 5)?, "te7ud");
//!
//! let records = cluster_points(&points, 4, 1)?;
//! assert_eq!(records.iter().map(|r| r.count).sum::<usize>(), 3);
//!
//! let request = ViewportRequest::new(BoundingBox::new(18.0, 20.0, 71.0, 73.0)).with_zoom(4);
//! let view = viewport_clusters(&points, &request, &Config::default())?;
//! assert_eq!(view.total_in_viewport, 2);
//! # Ok::<(), geocluster::GeoClusterError>(())
//! ```

pub mod compute;
pub mod config;
pub mod dataset;
pub mod error;
pub mod spatial;
pub mod view;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use config::{Config, InvalidPointPolicy};
pub use error::{GeoClusterError, Result};

pub use geo::Point;
pub use geocluster_types::bbox::BoundingBox;
pub use geocluster_types::cluster::{CategoryCounts, ClusterRecord};
pub use geocluster_types::point::GeoPoint;

pub use compute::cluster::{cluster_points, cluster_points_at_precision};
pub use compute::geohash::{
    covering_geohashes, decode, decode_center, encode, neighbors, precision_for_zoom,
};
pub use compute::index::{ClusterIndex, DEFAULT_INDEX_THRESHOLD, build_index};
pub use compute::viewport::{bounding_box, filter_by_viewport};
pub use spatial::{NearbyQuery, NearbyResult, SearchCenter, haversine_km, nearby};
pub use view::{ClusterView, ViewportRequest, viewport_clusters};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{GeoClusterError, Result};

    pub use crate::{BoundingBox, ClusterRecord, GeoPoint, Point};

    pub use crate::{Config, InvalidPointPolicy};

    pub use crate::compute::geohash::{decode, decode_center, encode, precision_for_zoom};

    pub use crate::{build_index, cluster_points, filter_by_viewport};

    pub use crate::{ClusterView, ViewportRequest, viewport_clusters};

    pub use crate::{NearbyQuery, haversine_km, nearby};
}
