//! Validation errors for the geo-post model.

use thiserror::Error;

/// Errors raised while constructing model values from untrusted input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Latitude or longitude is missing, not a number, or out of range.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Search radius is missing a valid numeric value.
    #[error("Invalid distance: {0}")]
    InvalidDistance(String),
}

impl ModelError {
    /// Create an invalid coordinate error.
    pub fn invalid_coordinate(msg: impl Into<String>) -> Self {
        Self::InvalidCoordinate(msg.into())
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(msg: impl Into<String>) -> Self {
        Self::InvalidDistance(msg.into())
    }
}
