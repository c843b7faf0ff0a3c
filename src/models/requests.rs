//! Request DTOs for the URL cache API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::normalize::ProfileName;
use crate::options::{CallOptions, MaxAge};

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `url`: The URL to store the value under
/// - `value`: The value to store
/// - `max_age_ms`: Optional max age in milliseconds (uses default if not specified)
/// - `profile`: Optional normalization profile for this call
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The URL key
    pub url: String,
    /// The value to store
    pub value: String,
    /// Optional max age in milliseconds
    #[serde(default)]
    pub max_age_ms: Option<i64>,
    /// Optional profile override
    #[serde(default)]
    pub profile: Option<ProfileName>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        None
    }

    /// Per-call overrides carried by this request.
    pub fn call_options(&self) -> CallOptions {
        CallOptions {
            max_age: self.max_age_ms.map(MaxAge::from_millis),
            profile: self.profile,
            ..CallOptions::default()
        }
    }
}

/// Query string naming a URL key (`?url=...`)
#[derive(Debug, Clone, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}
