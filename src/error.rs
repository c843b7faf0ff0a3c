//! Error types for the URL cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP surface.
///
/// A missing key is never an error inside the cache itself: reads return
/// `Option`. `NotFound` only exists for the HTTP layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The URL parsed but cannot serve as a cache key
    #[error("Invalid URL key: {0}")]
    InvalidKey(String),

    /// The URL could not be parsed at all
    #[error(transparent)]
    Parse(#[from] url::ParseError),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A pending value was dropped by delete/clear before it arrived
    #[error("Pending value discarded: {0}")]
    Discarded(String),

    /// Gave up waiting for a pending value
    #[error("Timed out waiting for: {0}")]
    WaitTimeout(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidKey(_) | CacheError::Parse(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Discarded(_) => StatusCode::CONFLICT,
            CacheError::WaitTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the URL cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_transparent() {
        let err: CacheError = url::Url::parse("url").unwrap_err().into();
        assert_eq!(err.to_string(), url::ParseError::RelativeUrlWithoutBase.to_string());
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (CacheError::InvalidKey("mailto:x".into()), StatusCode::BAD_REQUEST),
            (CacheError::NotFound("k".into()), StatusCode::NOT_FOUND),
            (CacheError::Discarded("k".into()), StatusCode::CONFLICT),
            (CacheError::WaitTimeout("k".into()), StatusCode::GATEWAY_TIMEOUT),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
