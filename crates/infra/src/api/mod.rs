//! OPENWOWI protocol plumbing
//!
//! Token exchanges, the request executor with its refresh-and-retry policy,
//! and the page merger driving full-collection fetches.
//!
//! # Architecture
//!
//! - [`TokenManager`] owns the token pair; only it mutates it
//! - [`ApiClient`] implements [`RequestExecutor`]; at most two attempts per
//!   request, the second only after a 401 and a successful refresh
//! - [`fetch_all`] depends on the executor trait alone

pub mod auth;
pub mod client;
pub mod pagination;
pub mod params;

pub use auth::{Credentials, TokenManager, TokenPair};
pub use client::{ApiClient, ApiRequest, RequestExecutor};
pub use pagination::fetch_all;
pub use params::QueryParams;
