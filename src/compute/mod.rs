//! Compute layer: the geohash codec and the algorithms built on it.
//!
//! - `geohash`: encode/decode, zoom to precision, covering sets
//! - `cluster`: grid clustering of points per geohash cell
//! - `viewport`: covering-set pruning plus exact bounds filtering
//! - `index`: per-zoom precomputed clusterings
//!
//! Everything here is a pure function over borrowed points; no state is kept
//! between calls.

pub mod cluster;
pub mod geohash;
pub mod index;
pub(crate) mod parallel;
pub mod validation;
pub mod viewport;
