//! Response DTOs for the URL cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for GET /get and GET /wait
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Canonical key the value is stored under
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for GET /has
#[derive(Debug, Clone, Serialize)]
pub struct HasResponse {
    pub key: String,
    pub present: bool,
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// Canonical key the value was stored under
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /del and DELETE /clear
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// Canonical key that was deleted, absent for a full clear
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key: Some(key),
        }
    }

    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
            key: None,
        }
    }
}

/// Response body for POST /clean
#[derive(Debug, Clone, Serialize)]
pub struct CleanResponse {
    /// Number of expired entries removed
    pub removed: usize,
}

/// Response body for POST /announce
#[derive(Debug, Clone, Serialize)]
pub struct AnnounceResponse {
    pub key: String,
    /// True if this call claimed the fetch for the key
    pub announced: bool,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Keys waiting for a value
    pub pending: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, pending: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            pending,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_response_serialize() {
        let resp = SetResponse::new("http://domain.com/");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("http://domain.com/"));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_cleared_response_omits_key() {
        let json = serde_json::to_value(DeleteResponse::cleared()).unwrap();
        assert!(json.get("key").is_none());
        assert_eq!(json["message"], "Cache cleared");
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            expirations: 5,
            total_entries: 100,
        };
        let resp = StatsResponse::new(&stats, 2);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.pending, 2);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}
