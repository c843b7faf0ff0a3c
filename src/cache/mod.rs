//! Cache Module
//!
//! URL-keyed in-memory cache with lazy expiration and pending-value tracking.

mod entry;
mod pending;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use pending::{PendingSet, Waiter};
pub use stats::CacheStats;
pub use store::UrlCache;
