use geo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in degrees, typically the visible map viewport.
///
/// Fields are public for serialization; the `geocluster` crate provides a
/// validated constructor that enforces `min <= max` on both axes and the WGS84
/// ranges.
///
/// # Examples
///
/// ```
/// use geocluster_types::bbox::BoundingBox;
///
/// let mumbai = BoundingBox::new(18.9, 19.3, 72.7, 73.1);
/// assert!(mumbai.contains(19.076, 72.877));
/// assert!(!mumbai.contains(28.6, 77.2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Inclusive containment test on both axes.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }

    /// Center of the box as a `geo::Point` (x = longitude, y = latitude).
    pub fn center(&self) -> Point<f64> {
        Point::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Extent along the latitude axis in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Extent along the longitude axis in degrees.
    pub fn width(&self) -> f64 {
        self.max_lng - self.min_lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert!(bbox.contains(10.0, 30.0));
        assert!(bbox.contains(20.0, 40.0));
        assert!(bbox.contains(15.0, 35.0));
        assert!(!bbox.contains(9.999, 35.0));
        assert!(!bbox.contains(15.0, 40.001));
    }

    #[test]
    fn test_center_and_extent() {
        let bbox = BoundingBox::new(-10.0, 10.0, 100.0, 120.0);
        let center = bbox.center();
        assert_eq!(center.x(), 110.0);
        assert_eq!(center.y(), 0.0);
        assert_eq!(bbox.height(), 20.0);
        assert_eq!(bbox.width(), 20.0);
    }
}
