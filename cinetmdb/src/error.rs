//! Error handling for the TMDB client

use thiserror::Error;

/// Result type for cinetmdb operations
pub type Result<T> = std::result::Result<T, TmdbError>;

/// Errors that can occur while talking to the TMDB API
#[derive(Error, Debug)]
pub enum TmdbError {
    /// Authentication failed (invalid or missing API key)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Resource not found (movie, person, etc.)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// TMDB API error
    #[error("TMDB API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota exceeded (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Generic error
    #[error("TMDB error: {0}")]
    Other(String),
}

impl TmdbError {
    /// Creates an API error from an HTTP status code and message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Checks whether the error means the entity does not exist remotely
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::NotFound(_))
    }

    /// Checks whether the error is a rate limiting error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, TmdbError::RateLimitExceeded)
    }
}
