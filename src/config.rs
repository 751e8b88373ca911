//! Engine configuration
//!
//! Serializable settings for the viewport pipeline, the cluster index builder
//! and nearby search. Every field has a default so partial JSON/TOML documents
//! load cleanly.
use crate::error::GeoClusterError;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// What to do with points whose coordinates are NaN or out of range.
///
/// The policy is applied uniformly within one call: either every invalid
/// point is dropped, or the first one fails the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPointPolicy {
    /// Drop the point, log a warning and continue
    #[default]
    Skip,
    /// Abort the whole call with `InvalidCoordinate`
    Reject,
}

/// Engine configuration
///
/// # Example
///
/// ```rust
/// use geocluster::{Config, InvalidPointPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.aggregation_threshold, 100);
///
/// let json = r#"{
///     "aggregation_threshold": 25,
///     "invalid_points": "reject"
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.aggregation_threshold, 25);
/// assert_eq!(config.invalid_points, InvalidPointPolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Cell size above which the viewport pipeline aggregates a cell
    #[serde(default = "Config::default_aggregation_threshold")]
    pub aggregation_threshold: usize,

    /// Cell size above which the precomputed index aggregates a cell
    #[serde(default = "Config::default_index_threshold")]
    pub index_threshold: usize,

    #[serde(default = "Config::default_index_min_zoom")]
    pub index_min_zoom: u32,

    #[serde(default = "Config::default_index_max_zoom")]
    pub index_max_zoom: u32,

    /// Zoom used when a viewport request does not carry one
    #[serde(default = "Config::default_zoom")]
    pub default_zoom: u32,

    #[serde(default)]
    pub invalid_points: InvalidPointPolicy,

    /// Upper bound on grid samples when computing a covering set
    #[serde(default = "Config::default_max_covering_cells")]
    pub max_covering_cells: usize,

    #[serde(default = "Config::default_nearby_radius_km")]
    pub nearby_radius_km: f64,

    #[serde(default = "Config::default_nearby_limit")]
    pub nearby_limit: usize,
}

impl Config {
    const fn default_aggregation_threshold() -> usize {
        100
    }

    const fn default_index_threshold() -> usize {
        crate::compute::index::DEFAULT_INDEX_THRESHOLD
    }

    const fn default_index_min_zoom() -> u32 {
        3
    }

    const fn default_index_max_zoom() -> u32 {
        18
    }

    const fn default_zoom() -> u32 {
        11
    }

    const fn default_max_covering_cells() -> usize {
        crate::compute::geohash::DEFAULT_MAX_COVERING_SAMPLES
    }

    const fn default_nearby_radius_km() -> f64 {
        50.0
    }

    const fn default_nearby_limit() -> usize {
        100
    }

    pub fn with_aggregation_threshold(mut self, threshold: usize) -> Self {
        self.aggregation_threshold = threshold;
        self
    }

    pub fn with_index_threshold(mut self, threshold: usize) -> Self {
        self.index_threshold = threshold;
        self
    }

    /// Set the inclusive zoom range precomputed by the index builder.
    pub fn with_index_zoom_range(mut self, min_zoom: u32, max_zoom: u32) -> Self {
        assert!(min_zoom <= max_zoom, "Index zoom range must not be empty");
        self.index_min_zoom = min_zoom;
        self.index_max_zoom = max_zoom;
        self
    }

    pub fn with_default_zoom(mut self, zoom: u32) -> Self {
        self.default_zoom = zoom;
        self
    }

    pub fn with_invalid_points(mut self, policy: InvalidPointPolicy) -> Self {
        self.invalid_points = policy;
        self
    }

    pub fn with_max_covering_cells(mut self, limit: usize) -> Self {
        assert!(limit > 0, "Covering limit must be greater than zero");
        self.max_covering_cells = limit;
        self
    }

    pub fn with_nearby_defaults(mut self, radius_km: f64, limit: usize) -> Self {
        self.nearby_radius_km = radius_km;
        self.nearby_limit = limit;
        self
    }

    /// Zoom levels covered by the precomputed index.
    pub fn index_zoom_range(&self) -> std::ops::RangeInclusive<u32> {
        self.index_min_zoom..=self.index_max_zoom
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.index_min_zoom > self.index_max_zoom {
            return Err(format!(
                "Index zoom range is empty: {}..={}",
                self.index_min_zoom, self.index_max_zoom
            ));
        }

        if self.max_covering_cells == 0 {
            return Err("Covering limit must be greater than zero".to_string());
        }

        if !self.nearby_radius_km.is_finite() || self.nearby_radius_km < 0.0 {
            return Err(format!(
                "Nearby radius must be a finite, non-negative distance, got {}",
                self.nearby_radius_km
            ));
        }

        Ok(())
    }

    /// [`Config::validate`] as a crate error.
    pub fn check(&self) -> crate::error::Result<()> {
        self.validate().map_err(GeoClusterError::InvalidConfig)
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            aggregation_threshold: Self::default_aggregation_threshold(),
            index_threshold: Self::default_index_threshold(),
            index_min_zoom: Self::default_index_min_zoom(),
            index_max_zoom: Self::default_index_max_zoom(),
            default_zoom: Self::default_zoom(),
            invalid_points: InvalidPointPolicy::default(),
            max_covering_cells: Self::default_max_covering_cells(),
            nearby_radius_km: Self::default_nearby_radius_km(),
            nearby_limit: Self::default_nearby_limit(),
        }
    }
}
