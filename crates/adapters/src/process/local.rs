// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local child processes via `tokio::process`

use super::{ProcessAdapter, ProcessError};
use crate::env;
use crate::subprocess::background_command;
use async_trait::async_trait;
use parking_lot::Mutex;
use sd_core::{OutputStream, ProcessEvent, ToolId};
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// How long to wait for output readers after the process is gone. A
/// grandchild can keep the pipes open after the tool itself exits.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

type KillAck = oneshot::Sender<std::io::Result<()>>;

struct RunningChild {
    generation: u64,
    pid: Option<u32>,
    kill_tx: mpsc::Sender<KillAck>,
}

#[derive(Default)]
struct LocalState {
    children: HashMap<ToolId, RunningChild>,
    /// Generation of the most recent launch per tool. A monitor whose
    /// generation is no longer current was replaced and stays silent.
    latest: HashMap<ToolId, u64>,
    next_generation: u64,
}

/// Runs tools as local child processes.
///
/// Each child is owned by a monitor task that waits for exit or a kill
/// request, drains the stdout/stderr readers and then reports `Exited`.
/// A child stopped through `terminate` reports no `Exited`. Children are
/// killed when dropped.
#[derive(Clone)]
pub struct LocalProcessAdapter {
    inner: Arc<Mutex<LocalState>>,
    terminate_timeout: Duration,
}

impl Default for LocalProcessAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(LocalState::default())),
            terminate_timeout: env::terminate_timeout(),
        }
    }

    pub fn with_terminate_timeout(mut self, timeout: Duration) -> Self {
        self.terminate_timeout = timeout;
        self
    }

    async fn kill(&self, running: &RunningChild) -> Result<(), ProcessError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        if running.kill_tx.send(ack_tx).await.is_err() {
            // Monitor already finished: the process is gone
            return Ok(());
        }
        match tokio::time::timeout(self.terminate_timeout, ack_rx).await {
            Ok(Ok(Ok(()))) | Ok(Err(_)) => Ok(()),
            Ok(Ok(Err(e))) => Err(ProcessError::TerminateFailed(e.to_string())),
            Err(_) => Err(ProcessError::TerminateFailed(format!(
                "process {} did not exit within {}ms",
                running.pid.map(|p| p.to_string()).unwrap_or_default(),
                self.terminate_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn launch(
        &self,
        tool: ToolId,
        executable: &str,
        script: &str,
        event_tx: mpsc::Sender<ProcessEvent>,
    ) -> Result<(), ProcessError> {
        let (generation, previous) = {
            let mut inner = self.inner.lock();
            inner.next_generation += 1;
            let generation = inner.next_generation;
            inner.latest.insert(tool, generation);
            (generation, inner.children.remove(&tool))
        };

        if let Some(previous) = previous {
            tracing::info!(%tool, pid = ?previous.pid, "killing previous process");
            if let Err(e) = self.kill(&previous).await {
                tracing::warn!(%tool, error = %e, "previous process did not stop");
            }
        }

        let mut cmd = background_command(executable);
        cmd.arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(e.to_string()))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(ProcessError::SpawnFailed(
                "output pipes were not captured".to_string(),
            ));
        };

        let readers = [
            spawn_reader(tool, stdout, OutputStream::Stdout, event_tx.clone()),
            spawn_reader(tool, stderr, OutputStream::Stderr, event_tx.clone()),
        ];

        let pid = child.id();
        let (kill_tx, kill_rx) = mpsc::channel(1);
        self.inner.lock().children.insert(
            tool,
            RunningChild {
                generation,
                pid,
                kill_tx,
            },
        );
        tracing::debug!(%tool, ?pid, generation, "process spawned");

        tokio::spawn(monitor(
            tool,
            generation,
            child,
            kill_rx,
            readers,
            event_tx,
            Arc::clone(&self.inner),
        ));
        Ok(())
    }

    async fn terminate(&self, tool: ToolId) -> Result<(), ProcessError> {
        let running = {
            let mut inner = self.inner.lock();
            let Some(running) = inner.children.remove(&tool) else {
                return Ok(());
            };
            // A killed generation stays silent, so its late exit cannot
            // stop whatever is launched next for this tool
            if inner.latest.get(&tool) == Some(&running.generation) {
                inner.latest.remove(&tool);
            }
            running
        };

        let result = self.kill(&running).await;
        if result.is_err() {
            // Still alive as far as we know; keep it reachable for a retry
            let mut inner = self.inner.lock();
            inner.latest.entry(tool).or_insert(running.generation);
            inner.children.entry(tool).or_insert(running);
        }
        result
    }

    async fn is_alive(&self, tool: ToolId) -> Result<bool, ProcessError> {
        Ok(self.inner.lock().children.contains_key(&tool))
    }
}

fn spawn_reader<R>(
    tool: ToolId,
    pipe: R,
    stream: OutputStream,
    event_tx: mpsc::Sender<ProcessEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(strip_line_ending(&buf)).into_owned();
                    let event = ProcessEvent::Line { tool, line, stream };
                    if event_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(%tool, %stream, error = %e, "output read failed");
                    break;
                }
            }
        }
    })
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

async fn monitor(
    tool: ToolId,
    generation: u64,
    mut child: Child,
    mut kill_rx: mpsc::Receiver<KillAck>,
    readers: [JoinHandle<()>; 2],
    event_tx: mpsc::Sender<ProcessEvent>,
    state: Arc<Mutex<LocalState>>,
) {
    let exit_code = tokio::select! {
        status = child.wait() => match status {
            Ok(status) => status.code(),
            Err(e) => {
                tracing::warn!(%tool, error = %e, "wait failed");
                None
            }
        },
        Some(ack) = kill_rx.recv() => {
            let result = child.kill().await;
            let code = child.try_wait().ok().flatten().and_then(|s| s.code());
            let _ = ack.send(result);
            code
        }
    };

    for mut reader in readers {
        if tokio::time::timeout(READER_DRAIN_TIMEOUT, &mut reader)
            .await
            .is_err()
        {
            reader.abort();
        }
    }

    let current = {
        let mut inner = state.lock();
        if inner
            .children
            .get(&tool)
            .is_some_and(|c| c.generation == generation)
        {
            inner.children.remove(&tool);
        }
        inner.latest.get(&tool) == Some(&generation)
    };

    tracing::debug!(%tool, ?exit_code, generation, current, "process exited");
    if current {
        let _ = event_tx.send(ProcessEvent::Exited { tool, exit_code }).await;
    }
}

#[cfg(all(test, unix))]
#[path = "local_tests.rs"]
mod tests;
