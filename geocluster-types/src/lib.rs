//! # geocluster-types
//!
//! Core data types for the geocluster engine.
//!
//! - **Points**: `GeoPoint`, a categorised WGS84 location
//! - **Bounds**: `BoundingBox`, an axis-aligned viewport in degrees
//! - **Clusters**: `ClusterRecord`, a display record for one point or one cell
//!
//! All types are serializable with Serde (camelCase on the wire) and convert to
//! the `geo` crate's primitives where that makes sense.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::point::GeoPoint;
//! use geocluster_types::cluster::ClusterRecord;
//!
//! let player = GeoPoint::new("42", 19.076, 72.877, "Cricket");
//! let record = ClusterRecord::single(&player, "te7ud");
//! assert_eq!(record.count, 1);
//! assert!(!record.is_aggregate);
//! ```

pub mod bbox;
pub mod cluster;
pub mod point;
