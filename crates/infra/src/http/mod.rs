//! HTTP transport
//!
//! A thin blocking wrapper over `reqwest` plus the optional transport-level
//! response cache used for GET requests.

pub mod client;
pub mod response_cache;

pub use client::{HttpClient, HttpClientBuilder};
pub use response_cache::{CachedResponse, ResponseCache, ResponseCacheConfig};
