// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `savedeck run` - Start the tools and stream their state

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::color;
use crate::output::{print_json_line, tool_prefix, OutputFormat};
use sd_adapters::{LocalProcessAdapter, TracedProcess};
use sd_core::{EventLabels, SystemClock, ToolId, ToolState, ToolStatus};
use sd_engine::{AppConfig, AuditLog, Supervisor, SupervisorDeps};

type LocalSupervisor = Supervisor<TracedProcess<LocalProcessAdapter>, SystemClock>;

/// Time allowed for watchers to print final state after shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Args)]
pub struct RunArgs {
    /// Tools to start, comma-separated (default: parser,viewer)
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<ToolId>,
}

impl RunArgs {
    pub fn selected(&self) -> Vec<ToolId> {
        let mut tools = if self.tools.is_empty() {
            ToolId::ALL.to_vec()
        } else {
            self.tools.clone()
        };
        tools.sort();
        tools.dedup();
        tools
    }
}

/// One change observed in a tool's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Update {
    Status { status: ToolStatus },
    Log { line: String },
    Activity { event: String, label: String },
}

#[derive(Serialize)]
struct ToolUpdate<'a> {
    tool: ToolId,
    #[serde(flatten)]
    update: &'a Update,
}

/// Remembers what has been reported for one tool so each snapshot yields
/// only what changed.
pub struct Watcher {
    tool: ToolId,
    labels: EventLabels,
    seen: u64,
    status: Option<ToolStatus>,
    current_event: Option<String>,
}

impl Watcher {
    pub fn new(tool: ToolId, labels: EventLabels) -> Self {
        Self {
            tool,
            labels,
            seen: 0,
            status: None,
            current_event: None,
        }
    }

    pub fn observe(&mut self, state: &ToolState) -> Vec<Update> {
        let mut updates = Vec::new();
        if self.status != Some(state.status) {
            self.status = Some(state.status);
            updates.push(Update::Status {
                status: state.status,
            });
        }

        updates.extend(state.logs_since(self.seen).map(|line| Update::Log {
            line: line.to_string(),
        }));
        self.seen = state.log_seq;

        if state.current_event != self.current_event {
            if let Some(event) = &state.current_event {
                updates.push(Update::Activity {
                    event: event.clone(),
                    label: self.labels.label(event).to_string(),
                });
            }
            self.current_event = state.current_event.clone();
        }
        updates
    }
}

pub fn format_update(tool: ToolId, update: &Update, colorize: bool) -> String {
    let prefix = tool_prefix(tool);
    let prefix = if colorize {
        color::apply_header(&prefix)
    } else {
        prefix
    };
    match update {
        Update::Status { status } => {
            let status = if colorize {
                color::apply_status(*status)
            } else {
                status.to_string()
            };
            format!("{prefix} status: {status}")
        }
        Update::Log { line } => {
            let line = if colorize {
                color::apply_log_line(line)
            } else {
                line.clone()
            };
            format!("{prefix} {line}")
        }
        Update::Activity { label, .. } => format!("{prefix} activity: {label}"),
    }
}

fn emit(tool: ToolId, updates: &[Update], format: OutputFormat) {
    let colorize = format == OutputFormat::Text && color::should_colorize();
    for update in updates {
        let result = match format {
            OutputFormat::Text => {
                println!("{}", format_update(tool, update, colorize));
                Ok(())
            }
            OutputFormat::Json => print_json_line(&ToolUpdate { tool, update }),
        };
        if let Err(e) = result {
            tracing::warn!(%tool, error = %e, "failed to print update");
        }
    }
}

/// Print changes until the supervisor drops the state channel.
async fn watch_tool(
    mut watcher: Watcher,
    mut rx: watch::Receiver<ToolState>,
    format: OutputFormat,
) {
    let updates = watcher.observe(&rx.borrow_and_update());
    emit(watcher.tool, &updates, format);
    loop {
        let closed = rx.changed().await.is_err();
        let updates = watcher.observe(&rx.borrow_and_update());
        emit(watcher.tool, &updates, format);
        if closed {
            break;
        }
    }
}

async fn wait_all_stopped(supervisor: &LocalSupervisor, tools: &[ToolId]) {
    for &tool in tools {
        let mut rx = supervisor.subscribe(tool);
        let _ = rx.wait_for(|s| s.status == ToolStatus::Stopped).await;
    }
}

pub async fn handle(
    args: RunArgs,
    config: AppConfig,
    state_dir: &Path,
    format: OutputFormat,
) -> Result<()> {
    let audit = AuditLog::open(&state_dir.join("debug.log"))?;
    let labels = config.event_labels.clone();
    let deps = SupervisorDeps {
        processes: TracedProcess::new(LocalProcessAdapter::new()),
        clock: SystemClock,
        audit,
    };
    let supervisor = Supervisor::spawn(deps, config);
    supervisor.reconcile().await;

    let tools = args.selected();
    let mut watchers = JoinSet::new();
    for &tool in &tools {
        let watcher = Watcher::new(tool, labels.clone());
        watchers.spawn(watch_tool(watcher, supervisor.subscribe(tool), format));
    }

    let mut started = 0;
    for &tool in &tools {
        match supervisor.start(tool).await {
            Ok(()) => started += 1,
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    if started == 0 {
        watchers.abort_all();
        anyhow::bail!("no tool started");
    }

    tokio::select! {
        _ = wait_all_stopped(&supervisor, &tools) => {
            tracing::info!("all tools stopped");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            eprintln!("{}", color::muted("Stopping tools..."));
        }
    }

    let stopped = supervisor.stop_all().await;

    // Dropping the supervisor closes the state channels and ends the watchers
    drop(supervisor);
    let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
        while watchers.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!("watchers did not finish");
    }

    stopped?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
