//! Great-circle distance and radius search over player points.
//!
//! Distances use the haversine formula on a sphere of radius 6371 km. The
//! `geo` crate's `Haversine` metric uses the IUGG mean radius
//! (6371.0088 km), so results differ from it by a few parts per million.

use crate::compute::validation::validate_coordinate;
use crate::compute::viewport::filter_by_viewport;
use crate::config::Config;
use crate::error::{GeoClusterError, Result};
use geocluster_types::bbox::BoundingBox;
use geocluster_types::point::GeoPoint;
use serde::{Deserialize, Serialize};

/// Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radius (km) lower bounds -> geohash precision used to prune a radius search.
const PRUNE_PRECISION: [(f64, usize); 4] = [(600.0, 2), (80.0, 3), (20.0, 4), (2.5, 5)];

const FINE_PRUNE_PRECISION: usize = 6;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
///
/// ```rust
/// use geocluster::spatial::haversine_km;
///
/// // Mumbai to Pune, roughly 120 km
/// let d = haversine_km(19.076, 72.877, 18.520, 73.856);
/// assert!(d > 115.0 && d < 125.0);
///
/// assert_eq!(haversine_km(19.076, 72.877, 19.076, 72.877), 0.0);
/// ```
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Degree box enclosing every coordinate within `radius_km` of the center.
///
/// Latitude is clamped to `[-90, 90]`. When the circle reaches a pole or
/// crosses the antimeridian the longitude range widens to `[-180, 180]`.
///
/// # Errors
///
/// `InvalidCoordinate` for an invalid center, `InvalidInput` for a negative
/// or non-finite radius.
pub fn radius_bounds(center_lat: f64, center_lng: f64, radius_km: f64) -> Result<BoundingBox> {
    validate_coordinate(center_lat, center_lng)?;
    validate_radius(radius_km)?;

    let angular = radius_km / EARTH_RADIUS_KM;
    let d_lat = angular.to_degrees();
    let min_lat = center_lat - d_lat;
    let max_lat = center_lat + d_lat;

    if min_lat <= -90.0 || max_lat >= 90.0 || angular >= std::f64::consts::FRAC_PI_2 {
        return Ok(BoundingBox::new(
            min_lat.max(-90.0),
            max_lat.min(90.0),
            -180.0,
            180.0,
        ));
    }

    // Widest longitude offset of a spherical cap centred at this latitude.
    let d_lng = (angular.sin() / center_lat.to_radians().cos())
        .min(1.0)
        .asin()
        .to_degrees();
    let min_lng = center_lng - d_lng;
    let max_lng = center_lng + d_lng;

    if min_lng < -180.0 || max_lng > 180.0 {
        return Ok(BoundingBox::new(min_lat, max_lat, -180.0, 180.0));
    }

    Ok(BoundingBox::new(min_lat, max_lat, min_lng, max_lng))
}

fn validate_radius(radius_km: f64) -> Result<()> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(GeoClusterError::InvalidInput(format!(
            "Radius must be a finite, non-negative distance in km, got {}",
            radius_km
        )));
    }
    Ok(())
}

/// A radius search around a center coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    /// Case-insensitive category; `None`, empty and `"All"` disable filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub limit: usize,
}

impl NearbyQuery {
    /// Query around a center with the default radius (50 km) and limit (100).
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::from_config(latitude, longitude, &Config::default())
    }

    /// Query around a center using the radius and limit from `config`.
    pub fn from_config(latitude: f64, longitude: f64, config: &Config) -> Self {
        Self {
            latitude,
            longitude,
            radius_km: config.nearby_radius_km,
            category: None,
            limit: config.nearby_limit,
        }
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A point found by [`nearby`] with its distance from the query center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlayer {
    #[serde(flatten)]
    pub point: GeoPoint,
    /// Distance rounded to 0.1 km
    pub distance_km: f64,
}

/// Query center echoed back in a [`NearbyResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchCenter {
    pub lat: f64,
    pub lng: f64,
}

/// Result of a radius search, nearest first.
///
/// Carries the center, radius and category of the query it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResult {
    pub center: SearchCenter,
    pub radius_km: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub players: Vec<NearbyPlayer>,
    /// Number of players returned
    pub count: usize,
    /// Matches inside the radius before `limit` was applied
    pub total_in_radius: usize,
}

/// Points within `query.radius_km` of the query center, nearest first.
///
/// Candidates are pruned with a covering set over [`radius_bounds`], then the
/// exact haversine distance decides. Ties keep input order.
///
/// # Examples
///
/// ```rust
/// use geocluster::spatial::{nearby, NearbyQuery};
/// use geocluster::GeoPoint;
///
/// let points = vec![
///     GeoPoint::new("pune", 18.520, 73.856, "Tennis"),
///     GeoPoint::new("thane", 19.2183, 72.9781, "Cricket"),
///     GeoPoint::new("delhi", 28.6139, 77.2090, "Cricket"),
/// ];
///
/// let query = NearbyQuery::new(19.076, 72.877).with_radius_km(150.0);
/// let result = nearby(&points, &query)?;
///
/// let ids: Vec<&str> = result.players.iter().map(|p| p.point.id.as_str()).collect();
/// assert_eq!(ids, vec!["thane", "pune"]);
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
pub fn nearby<'a, I>(points: I, query: &NearbyQuery) -> Result<NearbyResult>
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let bounds = radius_bounds(query.latitude, query.longitude, query.radius_km)?;
    let precision = prune_precision(query.radius_km);
    let candidates = filter_by_viewport(points, &bounds, precision)?;

    let mut hits: Vec<(f64, &GeoPoint)> = candidates
        .into_iter()
        .filter(|point| point.matches_category(query.category.as_deref()))
        .map(|point| {
            let distance = haversine_km(
                query.latitude,
                query.longitude,
                point.latitude,
                point.longitude,
            );
            (distance, point)
        })
        .filter(|(distance, _)| *distance <= query.radius_km)
        .collect();

    hits.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let total_in_radius = hits.len();
    let players: Vec<NearbyPlayer> = hits
        .into_iter()
        .take(query.limit)
        .map(|(distance, point)| NearbyPlayer {
            point: point.clone(),
            distance_km: round_tenths(distance),
        })
        .collect();

    log::debug!(
        "Nearby search at ({}, {}) r={}km: {} in radius, returning {}",
        query.latitude,
        query.longitude,
        query.radius_km,
        total_in_radius,
        players.len()
    );

    Ok(NearbyResult {
        center: SearchCenter {
            lat: query.latitude,
            lng: query.longitude,
        },
        radius_km: query.radius_km,
        category: query.category.clone(),
        count: players.len(),
        players,
        total_in_radius,
    })
}

fn prune_precision(radius_km: f64) -> usize {
    PRUNE_PRECISION
        .iter()
        .find(|(min_radius, _)| radius_km >= *min_radius)
        .map(|(_, precision)| *precision)
        .unwrap_or(FINE_PRUNE_PRECISION)
}

fn round_tenths(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
