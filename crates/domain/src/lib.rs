//! # OpenWowi Domain
//!
//! Business domain types and models for the OPENWOWI client.
//!
//! This crate contains:
//! - Typed domain objects for every entity family (persons, inventory,
//!   rent accounting, tickets, commissioning)
//! - The schema mapper turning raw JSON records into those objects
//! - Domain error types and Result definitions
//! - Protocol constants and cache slot identifiers
//!
//! ## Architecture
//! - No dependencies on other OpenWowi crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures, no I/O

pub mod constants;
pub mod errors;
pub mod macros;
pub mod mapping;
pub mod response;
pub mod slots;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use mapping::{map_record, map_records, normalize_keys, to_snake_case, FromRecord};
pub use response::ApiResponse;
pub use slots::CacheSlot;
pub use types::*;
