// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProcessAdapter, ProcessError};
use async_trait::async_trait;
use parking_lot::Mutex;
use sd_core::{ProcessEvent, ToolId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Recorded process call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCall {
    Launch {
        tool: ToolId,
        executable: String,
        script: String,
    },
    Terminate {
        tool: ToolId,
    },
    IsAlive {
        tool: ToolId,
    },
}

#[derive(Default)]
struct FakeProcessState {
    alive: HashMap<ToolId, mpsc::Sender<ProcessEvent>>,
    calls: Vec<ProcessCall>,
    launch_errors: HashMap<ToolId, String>,
    terminate_errors: HashMap<ToolId, String>,
    scripted_output: HashMap<ToolId, Vec<String>>,
    launch_delay: Option<Duration>,
}

/// Fake process adapter for testing.
///
/// Launches succeed unless a failure was scripted. Scripted output lines are
/// sent on the event channel right after a successful launch.
#[derive(Clone, Default)]
pub struct FakeProcessAdapter {
    inner: Arc<Mutex<FakeProcessState>>,
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ProcessCall> {
        self.inner.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Make every following launch of `tool` fail with `message`
    pub fn fail_launch(&self, tool: ToolId, message: &str) {
        self.inner
            .lock()
            .launch_errors
            .insert(tool, message.to_string());
    }

    /// Make every following terminate of `tool` fail with `message`
    pub fn fail_terminate(&self, tool: ToolId, message: &str) {
        self.inner
            .lock()
            .terminate_errors
            .insert(tool, message.to_string());
    }

    /// Clear scripted failures for `tool`
    pub fn heal(&self, tool: ToolId) {
        let mut inner = self.inner.lock();
        inner.launch_errors.remove(&tool);
        inner.terminate_errors.remove(&tool);
    }

    /// Lines to emit on stdout after the next successful launch of `tool`
    pub fn set_output(&self, tool: ToolId, lines: &[&str]) {
        self.inner
            .lock()
            .scripted_output
            .insert(tool, lines.iter().map(|l| l.to_string()).collect());
    }

    /// Hold each launch for `delay` before it completes
    pub fn set_launch_delay(&self, delay: Duration) {
        self.inner.lock().launch_delay = Some(delay);
    }

    /// Mark a tool alive without a launch (a process left over from before)
    pub fn set_alive(&self, tool: ToolId, event_tx: mpsc::Sender<ProcessEvent>) {
        self.inner.lock().alive.insert(tool, event_tx);
    }

    /// Emit one stdout line from a launched tool
    pub async fn emit(&self, tool: ToolId, line: &str) {
        let tx = self.inner.lock().alive.get(&tool).cloned();
        if let Some(tx) = tx {
            let _ = tx.send(ProcessEvent::stdout(tool, line)).await;
        }
    }

    /// Simulate the tool's process exiting on its own
    pub async fn exit(&self, tool: ToolId, exit_code: Option<i32>) {
        let tx = self.inner.lock().alive.remove(&tool);
        if let Some(tx) = tx {
            let _ = tx.send(ProcessEvent::Exited { tool, exit_code }).await;
        }
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn launch(
        &self,
        tool: ToolId,
        executable: &str,
        script: &str,
        event_tx: mpsc::Sender<ProcessEvent>,
    ) -> Result<(), ProcessError> {
        let delay = {
            let mut inner = self.inner.lock();
            inner.calls.push(ProcessCall::Launch {
                tool,
                executable: executable.to_string(),
                script: script.to_string(),
            });
            inner.launch_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let output = {
            let mut inner = self.inner.lock();
            if let Some(message) = inner.launch_errors.get(&tool) {
                return Err(ProcessError::SpawnFailed(message.clone()));
            }
            inner.alive.insert(tool, event_tx.clone());
            inner.scripted_output.remove(&tool).unwrap_or_default()
        };

        for line in output {
            let _ = event_tx.send(ProcessEvent::stdout(tool, line)).await;
        }
        Ok(())
    }

    async fn terminate(&self, tool: ToolId) -> Result<(), ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::Terminate { tool });
        if let Some(message) = inner.terminate_errors.get(&tool) {
            return Err(ProcessError::TerminateFailed(message.clone()));
        }
        inner.alive.remove(&tool);
        Ok(())
    }

    async fn is_alive(&self, tool: ToolId) -> Result<bool, ProcessError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ProcessCall::IsAlive { tool });
        Ok(inner.alive.contains_key(&tool))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
