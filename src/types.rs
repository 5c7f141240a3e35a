//! Wire types for the table query API
//!
//! Request and response bodies exchanged with `POST <table-endpoint>` and
//! `GET os/version`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single table record: column name to JSON value
pub type Row = serde_json::Map<String, Value>;

/// Page window attached to a table query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Zero-based index of the first row in the page
    pub start: usize,
    /// Maximum number of rows in the page
    pub limit: usize,
}

/// Body of a table query
///
/// `filters` uses the server-defined filter grammar and is passed through
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRequest {
    pub columns: Vec<String>,
    pub snapshot: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl TableRequest {
    /// Create a request without filters or pagination
    pub fn new(columns: Vec<String>, snapshot: impl Into<String>) -> Self {
        Self {
            columns,
            snapshot: snapshot.into(),
            filters: None,
            pagination: None,
        }
    }

    /// Attach a filter expression
    ///
    /// Empty objects and `null` are dropped so the server applies no filter.
    pub fn with_filters(mut self, filters: Option<Value>) -> Self {
        self.filters = filters.filter(|f| match f {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });
        self
    }
}

/// Response metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Total rows matching the query across all pages
    pub count: usize,
}

/// One page of a table query response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    pub data: Vec<Row>,
    #[serde(rename = "_meta")]
    pub meta: PageMeta,
}

/// Body of `GET os/version`
#[derive(Debug, Deserialize)]
pub(crate) struct VersionResponse {
    pub version: Option<String>,
}

/// Error envelope returned with HTTP 422
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}
