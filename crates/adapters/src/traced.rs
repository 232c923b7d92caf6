// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::process::{ProcessAdapter, ProcessError};
use crate::query::{QueryAdapter, QueryError, QueryRequest, QueryResponse};
use async_trait::async_trait;
use sd_core::{ProcessEvent, ToolId};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcess<P> {
    inner: P,
}

impl<P> TracedProcess<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcess<P> {
    async fn launch(
        &self,
        tool: ToolId,
        executable: &str,
        script: &str,
        event_tx: mpsc::Sender<ProcessEvent>,
    ) -> Result<(), ProcessError> {
        async {
            tracing::info!(executable, "starting");
            let start = std::time::Instant::now();
            let result = self.inner.launch(tool, executable, script, event_tx).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "process launched"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "launch failed"),
            }
            result
        }
        .instrument(tracing::info_span!("process.launch", %tool, script))
        .await
    }

    async fn terminate(&self, tool: ToolId) -> Result<(), ProcessError> {
        let result = self.inner.terminate(tool).await;
        tracing::info_span!("process.terminate", %tool).in_scope(|| match &result {
            Ok(()) => tracing::info!("terminated"),
            Err(e) => tracing::warn!(error = %e, "terminate failed"),
        });
        result
    }

    async fn is_alive(&self, tool: ToolId) -> Result<bool, ProcessError> {
        let result = self.inner.is_alive(tool).await;
        tracing::trace!(%tool, alive = ?result.as_ref().ok(), "checked");
        result
    }
}

/// Wrapper that adds tracing to any QueryAdapter
#[derive(Clone)]
pub struct TracedQuery<Q> {
    inner: Q,
}

impl<Q> TracedQuery<Q> {
    pub fn new(inner: Q) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<Q: QueryAdapter> QueryAdapter for TracedQuery<Q> {
    async fn query(
        &self,
        executable: &str,
        script: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse, QueryError> {
        let span = tracing::info_span!(
            "query",
            command = %request.command,
            save = %request.save,
        );
        async {
            tracing::debug!(filter = ?request.filter, limit = ?request.limit, offset = ?request.offset, "sending");
            let start = std::time::Instant::now();
            let result = self.inner.query(executable, script, request).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) => tracing::info!(elapsed_ms, success = r.success, "query answered"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "query failed"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
