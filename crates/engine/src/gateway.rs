// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request/response wrapper around the query tool.
//!
//! Normalizes the three ways a query can go wrong (not configured, rejected
//! by the tool, transport failure) into [`QueryFailure`] and keeps the last
//! error message and a loading flag for display.

use crate::audit::AuditLog;
use crate::config::AppConfig;
use crate::error::QueryFailure;
use parking_lot::Mutex;
use sd_adapters::{QueryAdapter, QueryRequest, QueryResponse};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

const FALLBACK_MESSAGE: &str = "API request failed";

/// Optional query parameters, passed through to the tool untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub filter: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub cache_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct QueryPaths {
    executable: String,
    script: String,
}

impl From<&AppConfig> for QueryPaths {
    fn from(config: &AppConfig) -> Self {
        Self {
            executable: config.php_path.clone(),
            script: config.query_tool_path.clone(),
        }
    }
}

pub struct QueryGateway<Q> {
    adapter: Q,
    audit: AuditLog,
    paths: Mutex<QueryPaths>,
    in_flight: AtomicUsize,
    error: Mutex<Option<String>>,
}

/// Keeps the loading counter raised for the life of one call
struct Loading<'a>(&'a AtomicUsize);

impl<'a> Loading<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<Q: QueryAdapter> QueryGateway<Q> {
    pub fn new(adapter: Q, audit: AuditLog, config: &AppConfig) -> Self {
        Self {
            adapter,
            audit,
            paths: Mutex::new(QueryPaths::from(config)),
            in_flight: AtomicUsize::new(0),
            error: Mutex::new(None),
        }
    }

    /// Run `command` against `save_id` (empty for save-list commands).
    ///
    /// Calls are independent: no caching, no coalescing. Overlapping calls
    /// keep the loading flag raised until the last one finishes.
    pub async fn query(
        &self,
        save_id: &str,
        command: &str,
        options: QueryOptions,
    ) -> Result<QueryResponse, QueryFailure> {
        let _loading = Loading::enter(&self.in_flight);
        *self.error.lock() = None;

        let result = self.run(save_id, command, options).await;
        if let Err(e) = &result {
            let message = e.to_string();
            self.audit.error(
                &format!("Query failed: {command}"),
                Some(json!({ "save": save_id, "error": &message })),
            );
            *self.error.lock() = Some(message);
        }
        result
    }

    async fn run(
        &self,
        save_id: &str,
        command: &str,
        options: QueryOptions,
    ) -> Result<QueryResponse, QueryFailure> {
        let paths = self.paths.lock().clone();
        if paths.script.trim().is_empty() {
            return Err(QueryFailure::NotConfigured);
        }

        let request = QueryRequest {
            save: save_id.to_string(),
            command: command.to_string(),
            filter: options.filter,
            limit: options.limit,
            offset: options.offset,
            cache_key: options.cache_key,
        };

        let response = self
            .adapter
            .query(&paths.executable, &paths.script, &request)
            .await
            .map_err(|e| QueryFailure::Transport(e.to_string()))?;

        if !response.success {
            let message = response
                .message
                .clone()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            return Err(QueryFailure::Rejected {
                message,
                response: Box::new(response),
            });
        }
        Ok(response)
    }

    /// Whether any query is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failed query, cleared when a query starts
    pub fn last_error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Replace the executable and script used by later queries.
    pub fn set_config(&self, config: &AppConfig) {
        *self.paths.lock() = QueryPaths::from(config);
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
