//! Error types for the RAS extraction services.

use thiserror::Error;

/// Result type alias using RasError.
pub type RasResult<T> = Result<T, RasError>;

/// Primary error type for model extraction operations.
#[derive(Debug, Error)]
pub enum RasError {
    // === Validation Errors ===
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    #[error("{0} is not a RAS project file")]
    NotAProject(String),

    #[error("{0} is not geospatial")]
    NotGeospatial(String),

    // === Storage Errors ===
    #[error("storage error: {0}")]
    Storage(String),

    // === Syntax Errors ===
    #[error("parse error: {0}")]
    Parse(String),

    #[error("cannot determine if boundary condition is for a reach, connection, area, or pump station at line '{0}'")]
    CannotDetermineParent(String),

    #[error("cannot determine if area is a storage area or a 2D area at line '{0}'")]
    AmbiguousAreaKind(String),

    // === Invariant Errors ===
    #[error("the unit system of the model ({model}) and the coordinate reference system ({crs}) are inconsistent")]
    UnitMismatch { model: String, crs: String },

    // === Geometry Errors ===
    #[error("Invalid Line Geometry")]
    InvalidLineGeometry,

    #[error("projection error: {0}")]
    Projection(String),

    // === Infrastructure Errors ===
    #[error("internal error: {0}")]
    Internal(String),
}

impl RasError {
    /// Create a Storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a Parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a Projection error.
    pub fn projection(msg: impl Into<String>) -> Self {
        Self::Projection(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            RasError::MissingParameter(_)
            | RasError::NotAProject(_)
            | RasError::NotGeospatial(_) => 400,

            _ => 500,
        }
    }
}

impl From<std::io::Error> for RasError {
    fn from(err: std::io::Error) -> Self {
        RasError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RasError::MissingParameter("definition_file".into()).http_status_code(), 400);
        assert_eq!(RasError::NotAProject("x.g01".into()).http_status_code(), 400);
        assert_eq!(RasError::NotGeospatial("x.prj".into()).http_status_code(), 400);
        assert_eq!(RasError::storage("boom").http_status_code(), 500);
        assert_eq!(RasError::InvalidLineGeometry.http_status_code(), 500);
    }

    #[test]
    fn test_invalid_line_geometry_message() {
        // Downstream consumers match on this exact string.
        assert_eq!(RasError::InvalidLineGeometry.to_string(), "Invalid Line Geometry");
    }
}
