// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool process supervisor.
//!
//! Owns the two [`ToolState`]s and drives their lifecycle through a
//! [`ProcessAdapter`]. Output lines arrive on one channel and are classified
//! and folded into the owning tool's state by the pump task.
//!
//! Each state lives in a `watch` channel: lifecycle operations and the pump
//! both mutate it in place, and subscribers always observe a whole snapshot.
//! Lifecycle operations for one tool are serialized by a per-tool async lock,
//! so a `stop` issued while the tool is starting runs after the start.

use crate::audit::AuditLog;
use crate::config::AppConfig;
use crate::error::{LaunchError, StopError};
use parking_lot::Mutex;
use sd_adapters::ProcessAdapter;
use sd_core::{classify, Clock, ProcessEvent, ToolId, ToolState, ToolStatus};
use serde_json::json;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, watch};

/// Output events buffered between the adapters and the pump
const EVENT_BUFFER: usize = 1024;

/// Supervisor dependencies
pub struct SupervisorDeps<P, C> {
    pub processes: P,
    pub clock: C,
    pub audit: AuditLog,
}

struct ToolSlot {
    state: watch::Sender<ToolState>,
    lifecycle: tokio::sync::Mutex<()>,
}

impl ToolSlot {
    fn new() -> Self {
        let (state, _) = watch::channel(ToolState::default());
        Self {
            state,
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    fn status(&self) -> ToolStatus {
        self.state.borrow().status
    }

    fn set_status(&self, status: ToolStatus) {
        self.state.send_if_modified(|s| {
            if s.status == status {
                return false;
            }
            if !s.status.can_transition_to(status) {
                tracing::warn!(from = %s.status, to = %status, "unexpected status transition");
            }
            s.status = status;
            true
        });
    }
}

pub struct Supervisor<P, C> {
    processes: P,
    clock: C,
    audit: AuditLog,
    config: Mutex<AppConfig>,
    tools: [ToolSlot; 2],
    event_tx: mpsc::Sender<ProcessEvent>,
}

impl<P, C> Supervisor<P, C>
where
    P: ProcessAdapter,
    C: Clock,
{
    /// Build a supervisor without a pump. Events on the returned receiver
    /// must be fed to [`Supervisor::ingest`] by the caller.
    pub fn new(
        deps: SupervisorDeps<P, C>,
        config: AppConfig,
    ) -> (Self, mpsc::Receiver<ProcessEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_BUFFER);
        let supervisor = Self {
            processes: deps.processes,
            clock: deps.clock,
            audit: deps.audit,
            config: Mutex::new(config),
            tools: [ToolSlot::new(), ToolSlot::new()],
            event_tx,
        };
        (supervisor, event_rx)
    }

    /// Build a supervisor and spawn its output pump on the current runtime.
    ///
    /// The pump holds only a weak reference and ends once the supervisor is
    /// dropped and the event channel drains.
    pub fn spawn(deps: SupervisorDeps<P, C>, config: AppConfig) -> Arc<Self> {
        let (supervisor, mut event_rx) = Self::new(deps, config);
        let supervisor = Arc::new(supervisor);
        let weak: Weak<Self> = Arc::downgrade(&supervisor);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let Some(supervisor) = weak.upgrade() else {
                    break;
                };
                supervisor.ingest(event);
            }
            tracing::debug!("output pump stopped");
        });
        supervisor
    }

    fn slot(&self, tool: ToolId) -> &ToolSlot {
        &self.tools[tool.index()]
    }

    /// Start `tool` with the configured executable and script.
    pub async fn start(&self, tool: ToolId) -> Result<(), LaunchError> {
        let slot = self.slot(tool);
        let _guard = slot.lifecycle.lock().await;

        if matches!(slot.status(), ToolStatus::Running | ToolStatus::Starting) {
            return Err(LaunchError::AlreadyRunning(tool));
        }

        slot.state.send_modify(|s| {
            s.status = ToolStatus::Starting;
            s.error = None;
        });

        let (executable, script) = {
            let config = self.config.lock();
            (config.php_path.clone(), config.tool_script(tool).to_string())
        };

        let result = if executable.trim().is_empty() || script.trim().is_empty() {
            Err(LaunchError::NotConfigured(tool))
        } else {
            self.processes
                .launch(tool, &executable, &script, self.event_tx.clone())
                .await
                .map_err(|e| LaunchError::Spawn {
                    tool,
                    message: e.to_string(),
                })
        };

        match result {
            Ok(()) => {
                // An exit seen during launch already moved the tool to stopped
                slot.state.send_if_modified(|s| {
                    if s.status != ToolStatus::Starting {
                        return false;
                    }
                    s.status = ToolStatus::Running;
                    true
                });
                self.audit.info(&format!("Started tool: {tool}"), None);
                Ok(())
            }
            Err(e) => {
                slot.set_status(ToolStatus::Stopped);
                self.audit.error(
                    &format!("Failed to start tool: {tool}"),
                    Some(json!({ "error": e.to_string() })),
                );
                Err(e)
            }
        }
    }

    /// Stop `tool`. Stopping a stopped tool succeeds without side effects.
    pub async fn stop(&self, tool: ToolId) -> Result<(), StopError> {
        let slot = self.slot(tool);
        let _guard = slot.lifecycle.lock().await;

        let previous = slot.status();
        if previous == ToolStatus::Stopped {
            return Ok(());
        }

        slot.set_status(ToolStatus::Stopping);
        match self.processes.terminate(tool).await {
            Ok(()) => {
                slot.set_status(ToolStatus::Stopped);
                self.audit.info(&format!("Stopped tool: {tool}"), None);
                Ok(())
            }
            Err(e) => {
                slot.state.send_modify(|s| s.status = previous);
                let err = StopError {
                    tool,
                    message: e.to_string(),
                };
                self.audit.error(
                    &format!("Failed to stop tool: {tool}"),
                    Some(json!({ "error": &err.message })),
                );
                Err(err)
            }
        }
    }

    /// Stop every tool that is not stopped. All tools are attempted; the
    /// first failure is returned.
    pub async fn stop_all(&self) -> Result<(), StopError> {
        let mut first_err = None;
        for tool in ToolId::ALL {
            if let Err(e) = self.stop(tool).await {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Seed each tool's status from the adapter's liveness check.
    pub async fn reconcile(&self) {
        for tool in ToolId::ALL {
            let slot = self.slot(tool);
            let _guard = slot.lifecycle.lock().await;
            let alive = match self.processes.is_alive(tool).await {
                Ok(alive) => alive,
                Err(e) => {
                    tracing::warn!(%tool, error = %e, "liveness check failed");
                    false
                }
            };
            let status = if alive {
                ToolStatus::Running
            } else {
                ToolStatus::Stopped
            };
            slot.state.send_if_modified(|s| {
                let changed = s.status != status;
                s.status = status;
                changed
            });
            tracing::info!(%tool, %status, "reconciled");
        }
    }

    /// Fold one process event into the owning tool's state.
    pub fn ingest(&self, event: ProcessEvent) {
        match event {
            ProcessEvent::Line { tool, line, .. } => {
                let message = classify(tool, &line);
                let received_at = self.clock.rfc3339();
                self.slot(tool)
                    .state
                    .send_modify(|s| s.apply(message, &received_at));
            }
            ProcessEvent::Exited { tool, exit_code } => {
                let unexpected = self.slot(tool).state.send_if_modified(|s| {
                    if !matches!(s.status, ToolStatus::Running | ToolStatus::Starting) {
                        return false;
                    }
                    s.status = ToolStatus::Stopped;
                    true
                });
                if unexpected {
                    self.audit.warn(
                        &format!("Tool exited: {tool}"),
                        Some(json!({ "exit_code": exit_code })),
                    );
                } else {
                    tracing::debug!(%tool, ?exit_code, "exit observed");
                }
            }
        }
    }

    pub fn status(&self, tool: ToolId) -> ToolStatus {
        self.slot(tool).status()
    }

    /// Clone of the tool's current state
    pub fn snapshot(&self, tool: ToolId) -> ToolState {
        self.slot(tool).state.borrow().clone()
    }

    /// Receiver notified on every change to the tool's state
    pub fn subscribe(&self, tool: ToolId) -> watch::Receiver<ToolState> {
        self.slot(tool).state.subscribe()
    }

    pub fn clear_logs(&self, tool: ToolId) {
        self.slot(tool).state.send_modify(ToolState::clear_logs);
    }

    pub fn clear_events(&self, tool: ToolId) {
        self.slot(tool).state.send_modify(ToolState::clear_events);
    }

    pub fn clear_error(&self, tool: ToolId) {
        self.slot(tool).state.send_if_modified(|s| {
            let had_error = s.error.is_some();
            s.clear_error();
            had_error
        });
    }

    /// Replace the configuration used by later starts.
    pub fn set_config(&self, config: AppConfig) {
        *self.config.lock() = config;
    }

    pub fn config(&self) -> AppConfig {
        self.config.lock().clone()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
