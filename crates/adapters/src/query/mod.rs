// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query tool adapters
//!
//! The query tool is a separate command that answers one request per
//! invocation with a single JSON document on stdout.

mod php;

pub use php::PhpQueryAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeQueryAdapter, QueryCall};

use async_trait::async_trait;
use sd_core::{ErrorCode, ErrorDetail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors reaching or reading the query tool. A well-formed
/// `success: false` answer is not an error at this layer.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{0}")]
    Failed(String),
    #[error("invalid query response: {0}")]
    InvalidResponse(String),
}

/// One request to the query tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Save identifier; empty for commands that list saves
    pub save: String,
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    #[serde(alias = "has_more")]
    pub has_more: bool,
}

/// Response document from the query tool.
///
/// When `success` is false the error fields describe why; `message` is what
/// gets shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
}

impl QueryResponse {
    /// Successful response carrying `data`
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            version: None,
            command: None,
            timestamp: None,
            data,
            pagination: None,
            message: None,
            code: None,
            error_type: None,
            errors: None,
            actions: None,
        }
    }

    /// Rejected response with a user-facing message
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::ok(Value::Null)
        }
    }
}

/// Runs requests against the external query tool
#[async_trait]
pub trait QueryAdapter: Clone + Send + Sync + 'static {
    async fn query(
        &self,
        executable: &str,
        script: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
