//! Error types for CRS and geometry handling.

use thiserror::Error;

/// Errors raised while parsing CRS definitions or transforming geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The WKT definition could not be tokenized or nested correctly.
    #[error("invalid WKT: {0}")]
    InvalidWkt(String),

    /// The WKT parsed but does not describe a usable coordinate system.
    #[error("invalid coordinate system: {0}")]
    InvalidCrs(String),

    /// The projection method is not one this crate implements.
    #[error("unsupported projection: {0}")]
    UnsupportedProjection(String),

    /// The destination EPSG code is not one this crate implements.
    #[error("unsupported EPSG code: {0}")]
    UnsupportedEpsg(i32),

    /// A geometry was structurally unusable (e.g. an empty line).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Result type alias using GeoError.
pub type GeoResult<T> = Result<T, GeoError>;
