// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool process adapters

mod local;

pub use local::LocalProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessAdapter, ProcessCall};

use async_trait::async_trait;
use sd_core::{ProcessEvent, ToolId};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from process operations
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("terminate failed: {0}")]
    TerminateFailed(String),
}

/// Launches and terminates long-running tool processes.
///
/// At most one process runs per tool. Output lines and the final exit are
/// delivered on the `event_tx` given at launch, in emission order.
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    /// Start `<executable> <script>` for `tool`, replacing any process the
    /// tool already has.
    async fn launch(
        &self,
        tool: ToolId,
        executable: &str,
        script: &str,
        event_tx: mpsc::Sender<ProcessEvent>,
    ) -> Result<(), ProcessError>;

    /// Kill the tool's process. Succeeds when there is nothing to kill.
    /// A process killed here reports no `Exited`.
    async fn terminate(&self, tool: ToolId) -> Result<(), ProcessError>;

    /// Whether the tool currently has a live process
    async fn is_alive(&self, tool: ToolId) -> Result<bool, ProcessError>;
}
