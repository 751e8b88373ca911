use geo::Point;
use serde::{Deserialize, Serialize};

/// A categorised geographic point, typically a player on the map.
///
/// Coordinates are WGS84 degrees. The type itself does not enforce the
/// latitude/longitude ranges; callers validate before indexing.
///
/// # Examples
///
/// ```
/// use geocluster_types::point::GeoPoint;
///
/// let p = GeoPoint::new("7", 40.7128, -74.0060, "Football");
/// assert_eq!(p.point().x(), -74.0060);
/// assert_eq!(p.point().y(), 40.7128);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Stable identifier of the point
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Activity tag tallied in cluster histograms
    pub category: String,
}

impl GeoPoint {
    pub fn new(
        id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            category: category.into(),
        }
    }

    /// The location as a `geo::Point` (x = longitude, y = latitude).
    pub fn point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Whether both coordinates are finite and inside the WGS84 ranges.
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Case-insensitive category match. `None`, an empty filter and `"All"`
    /// match every point.
    pub fn matches_category(&self, filter: Option<&str>) -> bool {
        match filter.map(str::trim) {
            None | Some("") => true,
            Some(f) if f.eq_ignore_ascii_case("all") => true,
            Some(f) => self.category.eq_ignore_ascii_case(f),
        }
    }
}
