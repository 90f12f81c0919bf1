//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for OpenWowi operations
///
/// Every failure surfaced to callers is one of these variants; nothing is
/// reported through sentinel values mixed into successful results.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WowiError {
    /// A caller-supplied parameter violates a contract. Raised before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login or refresh exchange was rejected by the token endpoint.
    #[error("Authentication failed ({status}): {body}")]
    Auth { status: u16, body: String },

    /// The HTTP call could not complete (connect failure, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response carried a body that is not valid JSON, or a record
    /// did not fit its domain type.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Non-2xx status from a resource endpoint.
    #[error("{status}: {reason} -> {body}")]
    Api { status: u16, reason: String, body: String },

    /// Invalid cache slot name, missing setting or unresolvable reference.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading or writing a persisted cache file failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WowiError {
    /// Stable label used as a structured logging field.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Auth { .. } => "auth",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Api { .. } => "api",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
        }
    }

    /// `true` when the session is unusable and the caller has to log in again.
    pub const fn is_fatal_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// HTTP status carried by the error, if any.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WowiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for OpenWowi operations
pub type Result<T> = std::result::Result<T, WowiError>;
