// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Query tool invoked as `<php> <script> <command> [--flag=value...]`

use super::{QueryAdapter, QueryError, QueryRequest, QueryResponse};
use crate::env;
use crate::subprocess::{background_command, run_with_timeout};
use async_trait::async_trait;
use std::time::Duration;

/// Runs the query script once per request and parses its stdout.
#[derive(Debug, Clone)]
pub struct PhpQueryAdapter {
    timeout: Duration,
}

impl Default for PhpQueryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PhpQueryAdapter {
    pub fn new() -> Self {
        Self {
            timeout: env::query_timeout(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Command-line arguments after the script path
pub fn query_args(request: &QueryRequest) -> Vec<String> {
    let mut args = vec![request.command.clone()];
    if !request.save.is_empty() {
        args.push(format!("--save={}", request.save));
    }
    if let Some(filter) = request.filter.as_deref().filter(|f| !f.is_empty()) {
        args.push(format!("--filter={filter}"));
    }
    if let Some(limit) = request.limit {
        args.push(format!("--limit={limit}"));
    }
    if let Some(offset) = request.offset {
        args.push(format!("--offset={offset}"));
    }
    if let Some(key) = request.cache_key.as_deref().filter(|k| !k.is_empty()) {
        args.push(format!("--cache-key={key}"));
    }
    args
}

#[async_trait]
impl QueryAdapter for PhpQueryAdapter {
    async fn query(
        &self,
        executable: &str,
        script: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError> {
        let mut cmd = background_command(executable);
        cmd.arg(script).args(query_args(request));

        let description = format!("query {}", request.command);
        let output = run_with_timeout(cmd, self.timeout, &description)
            .await
            .map_err(QueryError::Failed)?;

        match serde_json::from_slice::<QueryResponse>(&output.stdout) {
            Ok(response) => Ok(response),
            Err(e) if output.status.success() => Err(QueryError::InvalidResponse(e.to_string())),
            Err(_) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let code = output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string());
                Err(QueryError::Failed(format!(
                    "{description} exited with {code}: {}",
                    stderr.trim()
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "php_tests.rs"]
mod tests;
