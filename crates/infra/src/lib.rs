//! # OpenWowi Infrastructure
//!
//! Everything that performs I/O on behalf of the domain crate.
//!
//! This crate contains:
//! - The blocking HTTP transport and its transport-level response cache
//! - Token management, request execution and page merging against the
//!   OPENWOWI REST API
//! - The [`WowiClient`] facade with per-entity collection accessors
//! - The in-memory cache store with disk persistence and local search
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Depends on `openwowi-domain` for types, errors and the schema mapper
//! - Blocking and single-threaded: one client instance is owned by one
//!   logical thread of control; callers sharing it across threads must
//!   synchronize externally
//! - Never installs a tracing subscriber; that is left to binaries

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{ApiClient, ApiRequest, QueryParams, RequestExecutor, TokenManager};
pub use cache::{CacheStore, Cacheable, PersonQuery, SearchMode};
pub use client::{ListOptions, Resource, WowiClient};
pub use config::ClientConfig;
pub use errors::InfraError;
pub use http::{HttpClient, ResponseCache, ResponseCacheConfig};
