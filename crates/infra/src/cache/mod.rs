//! In-memory cache store and local search
//!
//! The store keeps full collections fetched by the client so that later
//! lookups and searches run without network access. Slots can be persisted
//! to and restored from JSON files, one file per slot.

pub mod search;
pub mod store;

pub use search::{search_string, PersonQuery, SearchMode};
pub use store::{CacheStore, Cacheable};
