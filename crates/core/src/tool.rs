// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervised tool identity and lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two long-running helper tools.
///
/// The set is closed: both handles exist for the whole process lifetime and
/// only their state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolId {
    /// Savegame parser/monitor, emits NDJSON on stdout
    Parser,
    /// Local web viewer, emits free text
    Viewer,
}

impl ToolId {
    pub const ALL: [ToolId; 2] = [ToolId::Parser, ToolId::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolId::Parser => "parser",
            ToolId::Viewer => "viewer",
        }
    }

    /// Whether this tool's output carries structured NDJSON messages.
    pub fn emits_structured_output(&self) -> bool {
        matches!(self, ToolId::Parser)
    }

    /// Stable slot index, used for fixed-size per-tool tables.
    pub fn index(&self) -> usize {
        match self {
            ToolId::Parser => 0,
            ToolId::Viewer => 1,
        }
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parser" => Ok(ToolId::Parser),
            "viewer" => Ok(ToolId::Viewer),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

/// Lifecycle status of a supervised tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ToolStatus {
    /// Starting or stopping: an operation is in flight.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, ToolStatus::Starting | ToolStatus::Stopping)
    }

    /// Whether `next` is a permitted successor of `self`.
    ///
    /// Any state may fall back to `Stopped` on failure; otherwise the cycle
    /// is stopped -> starting -> running -> stopping -> stopped.
    pub fn can_transition_to(&self, next: ToolStatus) -> bool {
        use ToolStatus::*;
        matches!(
            (self, next),
            (_, Stopped) | (Stopped, Starting) | (Starting, Running) | (Running, Stopping)
        )
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolStatus::Stopped => "stopped",
            ToolStatus::Starting => "starting",
            ToolStatus::Running => "running",
            ToolStatus::Stopping => "stopping",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
