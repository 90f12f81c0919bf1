//! Uniform result of one resource call

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single successful HTTP exchange.
///
/// Built fresh for every call and never shared. `data` always holds the raw
/// records in server order: a JSON array body contributes its elements, any
/// other JSON value contributes itself, and an empty body contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status_code: u16,
    pub message: String,
    pub data: Vec<Value>,
}

impl ApiResponse {
    /// Wrap a decoded body.
    pub fn from_body(status_code: u16, message: impl Into<String>, body: Value) -> Self {
        let data = match body {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        Self { status_code, message: message.into(), data }
    }

    /// Response without a body (204/205).
    pub fn empty(status_code: u16, message: impl Into<String>) -> Self {
        Self { status_code, message: message.into(), data: Vec::new() }
    }

    /// Number of records carried.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` when no record was returned.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the response, keeping only the records.
    pub fn into_data(self) -> Vec<Value> {
        self.data
    }
}
