//! Player dataset ingestion.
//!
//! Upstream datasets are JSON arrays of player records. Records are decoded
//! into typed structs (unknown fields are ignored, missing required fields
//! fail the load) and converted to [`GeoPoint`]s with `sport` as the
//! category. Invalid coordinates are handled by an [`InvalidPointPolicy`].
//!
//! ```json
//! [
//!   { "id": 1, "name": "Asha", "sport": "Cricket", "level": "Intermediate",
//!     "city": "Mumbai", "latitude": 19.076, "longitude": 72.877 }
//! ]
//! ```

use crate::compute::validation::apply_policy;
use crate::config::InvalidPointPolicy;
use crate::error::Result;
use geocluster_types::point::GeoPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Record identifier; upstream feeds use both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// One player as it appears in an upstream dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    pub sport: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlayerRecord {
    pub fn into_point(self) -> GeoPoint {
        GeoPoint::new(self.id.to_string(), self.latitude, self.longitude, self.sport)
    }
}

/// Decode a JSON array of player records.
pub fn parse_records(json: &str) -> Result<Vec<PlayerRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Decode a JSON dataset into points, applying `policy` to invalid
/// coordinates.
///
/// # Examples
///
/// ```rust
/// use geocluster::dataset::load_points_from_str;
/// use geocluster::InvalidPointPolicy;
///
/// let json = r#"[
///     { "id": 1, "sport": "Cricket", "latitude": 19.076, "longitude": 72.877 },
///     { "id": "p-2", "sport": "Tennis", "latitude": 95.0, "longitude": 72.0 }
/// ]"#;
///
/// let points = load_points_from_str(json, InvalidPointPolicy::Skip)?;
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].id, "1");
///
/// assert!(load_points_from_str(json, InvalidPointPolicy::Reject).is_err());
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn load_points_from_str(json: &str, policy: InvalidPointPolicy) -> Result<Vec<GeoPoint>> {
    let points: Vec<GeoPoint> = parse_records(json)?
        .into_iter()
        .map(PlayerRecord::into_point)
        .collect();
    let total = points.len();

    let accepted: Vec<GeoPoint> = apply_policy(&points, policy)?
        .into_iter()
        .cloned()
        .collect();

    log::debug!("Loaded {} of {} player records", accepted.len(), total);
    Ok(accepted)
}

/// Read a JSON dataset file into points.
pub fn load_points_from_path<P: AsRef<Path>>(
    path: P,
    policy: InvalidPointPolicy,
) -> Result<Vec<GeoPoint>> {
    let json = std::fs::read_to_string(path.as_ref())?;
    load_points_from_str(&json, policy)
}

/// Distinct categories present in `points`, sorted.
pub fn categories<'a, I>(points: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    points
        .into_iter()
        .map(|p| p.category.as_str())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
