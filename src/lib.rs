//! URL Cache - An in-memory cache keyed by normalized URL
//!
//! Values expire lazily after a configurable max age, and concurrent
//! fetches of the same URL can be deduplicated through pending markers.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod options;

pub use api::AppState;
pub use cache::{UrlCache, Waiter};
pub use config::Config;
pub use error::{CacheError, Result};
pub use normalize::{CanonicalUrl, NormalizeProfile, ProfileName, UrlKey};
pub use options::{CacheOptions, CallOptions, MaxAge};
