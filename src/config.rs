//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::normalize::ProfileName;
use crate::options::{CacheOptions, MaxAge};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default max age in milliseconds, None = entries never expire
    pub default_max_age_ms: Option<i64>,
    /// Normalization profile used for keys
    pub profile: ProfileName,
    /// HTTP server port
    pub server_port: u16,
    /// How long `/wait` blocks before giving up, in seconds
    pub wait_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_MAX_AGE_MS` - Default max age in milliseconds (default: never expire)
    /// - `URL_PROFILE` - `common` or `careful` (default: common)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `WAIT_TIMEOUT_SECS` - Wait timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            default_max_age_ms: env::var("DEFAULT_MAX_AGE_MS")
                .ok()
                .and_then(|v| v.parse().ok()),
            profile: env::var("URL_PROFILE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            wait_timeout: env::var("WAIT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// Builds the cache options this configuration describes.
    pub fn cache_options(&self) -> CacheOptions {
        let max_age = self
            .default_max_age_ms
            .map_or(MaxAge::Forever, MaxAge::from_millis);

        CacheOptions::default()
            .with_max_age(max_age)
            .with_profile(self.profile)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_age_ms: None,
            profile: ProfileName::Common,
            server_port: 3000,
            wait_timeout: 30,
        }
    }
}
