//! Error types for geocluster.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeoClusterError>;

/// Errors returned by the codec, the clustering engine and its boundary layers.
///
/// None of these are retryable: the engine performs no I/O apart from the
/// explicit dataset loader.
#[derive(Error, Debug)]
pub enum GeoClusterError {
    /// NaN, infinite or out-of-range latitude/longitude.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// A geohash contains a symbol outside the base32 alphabet.
    #[error("Invalid geohash character '{character}' at position {position}")]
    InvalidGeohashCharacter { character: char, position: usize },

    /// Precision (geohash length) outside 1..=12.
    #[error("Invalid geohash precision {0}, expected 1..=12")]
    InvalidPrecision(usize),

    #[error("Invalid bounding box: {0}")]
    InvalidBounds(String),

    /// Covering a box would need more grid samples than allowed.
    #[error("Covering set needs {samples} samples, limit is {limit}")]
    CoverageTooLarge { samples: usize, limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
