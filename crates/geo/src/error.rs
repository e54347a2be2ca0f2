//! Error types for the geo crate.

use thiserror::Error;

/// Result type alias for geo operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can occur during geo operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A `<coordinates>` span was opened but never closed
    #[error("Unterminated <coordinates> span starting at byte {offset}")]
    UnterminatedSpan {
        /// Byte offset of the dangling start marker
        offset: usize,
    },

    /// Invalid coordinate values
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// GeoJSON document could not be read
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for integration with routeplay-core error handling.
/// Range: 10xxx for geo errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoErrorCode {
    /// Unterminated coordinate span
    UnterminatedSpan = 10001,
    /// Invalid coordinate values
    InvalidCoordinate = 10002,
    /// GeoJSON structure error
    GeoJson = 10003,
    /// JSON parsing error
    JsonParsing = 10004,
}

impl GeoError {
    /// Returns the error code for this error.
    pub fn code(&self) -> GeoErrorCode {
        match self {
            GeoError::UnterminatedSpan { .. } => GeoErrorCode::UnterminatedSpan,
            GeoError::InvalidCoordinate(_) => GeoErrorCode::InvalidCoordinate,
            GeoError::GeoJson(_) => GeoErrorCode::GeoJson,
            GeoError::JsonError(_) => GeoErrorCode::JsonParsing,
        }
    }
}
