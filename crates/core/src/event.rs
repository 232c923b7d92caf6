// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events delivered by the process collaborator

use crate::tool::ToolId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which pipe of the child process a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => f.write_str("stdout"),
            OutputStream::Stderr => f.write_str("stderr"),
        }
    }
}

/// Output and exit notifications for supervised tools.
///
/// Lines for one tool arrive in the order the process wrote them; `Exited`
/// follows the last line of that process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProcessEvent {
    #[serde(rename = "process:line")]
    Line {
        tool: ToolId,
        line: String,
        stream: OutputStream,
    },

    #[serde(rename = "process:exited")]
    Exited {
        tool: ToolId,
        exit_code: Option<i32>,
    },
}

impl ProcessEvent {
    pub fn stdout(tool: ToolId, line: impl Into<String>) -> Self {
        ProcessEvent::Line {
            tool,
            line: line.into(),
            stream: OutputStream::Stdout,
        }
    }

    pub fn stderr(tool: ToolId, line: impl Into<String>) -> Self {
        ProcessEvent::Line {
            tool,
            line: line.into(),
            stream: OutputStream::Stderr,
        }
    }

    pub fn tool(&self) -> ToolId {
        match self {
            ProcessEvent::Line { tool, .. } | ProcessEvent::Exited { tool, .. } => *tool,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
