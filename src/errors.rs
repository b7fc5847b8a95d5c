// src/errors.rs
// DOCUMENTATION: Custom error types for the gallery core
// PURPOSE: Centralized error handling for collaborators and view models

use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all collaborator failures
/// View models never return these to callers; they are folded into state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalleryError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Image download failed: {0}")]
    ImageDownload(String),

    #[error("Image load failed: {0}")]
    LocalImageLoad(String),

    #[error("No description was produced")]
    EmptyResponse,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl GalleryError {
    /// The failure's own description, without the variant prefix
    /// DOCUMENTATION: Used for user-facing state messages. Returns None when
    /// the failure carries no usable text, so callers can apply their fallback
    pub fn detail(&self) -> Option<String> {
        let inner = match self {
            GalleryError::DatabaseError(msg)
            | GalleryError::ExternalApiError(msg)
            | GalleryError::ValidationError(msg)
            | GalleryError::ImageDownload(msg)
            | GalleryError::LocalImageLoad(msg)
            | GalleryError::ConfigError(msg) => msg.trim().to_string(),
            GalleryError::RateLimitExceeded | GalleryError::EmptyResponse => self.to_string(),
        };

        if inner.is_empty() {
            None
        } else {
            Some(inner)
        }
    }

    /// Description with a caller-supplied fallback
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or_else(|| fallback.to_string())
    }
}

impl From<validator::ValidationErrors> for GalleryError {
    fn from(e: validator::ValidationErrors) -> Self {
        GalleryError::ValidationError(e.to_string())
    }
}
