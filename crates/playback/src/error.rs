//! Error types for the playback crate.

use routeplay_core::{Error, ErrorCode};
use routeplay_geo::GeoError;
use thiserror::Error;

/// Result type alias for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Errors that can occur while preparing playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The route has too few waypoints to animate
    #[error("Invalid route: {waypoints} waypoint(s), at least 2 required")]
    InvalidRoute {
        /// Waypoints found in the feature
        waypoints: usize,
    },

    /// The stop document is not a collection of labelled points
    #[error("Invalid stops: {0}")]
    InvalidStops(String),

    /// Geometry could not be read
    #[error(transparent)]
    Geo(#[from] GeoError),
}

impl From<PlaybackError> for Error {
    fn from(err: PlaybackError) -> Self {
        match &err {
            PlaybackError::InvalidRoute { .. } => Error::invalid_route(err.to_string()),
            PlaybackError::InvalidStops(_) => Error::invalid_stops(err.to_string()),
            PlaybackError::Geo(GeoError::UnterminatedSpan { offset }) => {
                Error::unterminated_span(*offset)
            }
            PlaybackError::Geo(_) => Error::new(ErrorCode::InvalidInput, err.to_string()),
        }
    }
}
