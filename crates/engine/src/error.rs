// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types at the engine boundary

use sd_adapters::QueryResponse;
use sd_core::ToolId;
use std::path::PathBuf;
use thiserror::Error;

/// A tool could not be started. The tool is left stopped.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{0} is already running")]
    AlreadyRunning(ToolId),
    #[error("{0} is not configured: set php_path and {0}_tool_path")]
    NotConfigured(ToolId),
    #[error("failed to start {tool}: {message}")]
    Spawn { tool: ToolId, message: String },
}

/// A tool could not be stopped. Its previous status is restored.
#[derive(Debug, Error)]
#[error("failed to stop {tool}: {message}")]
pub struct StopError {
    pub tool: ToolId,
    pub message: String,
}

/// A query did not produce a usable response. The display text is what the
/// gateway records as its error string.
#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("Query script path not configured")]
    NotConfigured,
    /// The tool answered with `success: false`
    #[error("{message}")]
    Rejected {
        message: String,
        response: Box<QueryResponse>,
    },
    /// The tool could not be run or its output could not be read
    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory could be determined")]
    NoConfigDir,
    #[error("no state directory could be determined")]
    NoStateDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}
