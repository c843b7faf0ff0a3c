//! API Module
//!
//! HTTP handlers and routing for the URL cache REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a value under a URL
//! - `GET /get?url=` - Retrieve the value for a URL
//! - `GET /has?url=` - Check whether a URL has a live value
//! - `DELETE /del?url=` - Delete a URL
//! - `DELETE /clear` - Remove everything
//! - `POST /clean` - Sweep expired entries
//! - `POST /announce?url=` - Mark a URL as being fetched
//! - `GET /wait?url=` - Block until a URL has a value
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
