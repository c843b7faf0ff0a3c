//! Request and Response models for the URL cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{SetRequest, UrlQuery};
pub use responses::{
    AnnounceResponse, CleanResponse, DeleteResponse, GetResponse, HasResponse, HealthResponse,
    SetResponse, StatsResponse,
};
