// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session audit log.
//!
//! One shared sink for operator-visible activity: tool starts and stops,
//! unexpected exits, failed queries. Entries are kept in memory for the
//! session, optionally mirrored to a log file, and emitted as `tracing`
//! events.
//!
//! Session entries carry an RFC 3339 UTC timestamp:
//!   `[2026-01-30T08:14:09.120Z] [INFO] Started tool: parser`
//! File lines carry local time:
//!   `[2026-01-30 09:14:09] [ERROR] Failed to start tool: viewer | {"error":"..."}`

use chrono::{Local, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuditLevel::Debug => "DEBUG",
            AuditLevel::Info => "INFO",
            AuditLevel::Warn => "WARN",
            AuditLevel::Error => "ERROR",
        };
        f.write_str(s)
    }
}

#[derive(Default)]
struct AuditState {
    entries: Vec<String>,
    file: Option<PathBuf>,
}

/// Cloneable handle to one session's audit log.
#[derive(Clone, Default)]
pub struct AuditLog {
    inner: Arc<Mutex<AuditState>>,
}

impl AuditLog {
    /// In-memory only
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session backed by `path`. The file is truncated.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        File::create(path)?;
        let log = Self {
            inner: Arc::new(Mutex::new(AuditState {
                entries: Vec::new(),
                file: Some(path.to_path_buf()),
            })),
        };
        log.info("Logger initialized for new session", None);
        Ok(log)
    }

    pub fn log(&self, level: AuditLevel, message: &str, details: Option<Value>) {
        let formatted = match &details {
            Some(details) => format!("{message} | {details}"),
            None => message.to_string(),
        };

        match level {
            AuditLevel::Debug => tracing::debug!(target: "audit", "{formatted}"),
            AuditLevel::Info => tracing::info!(target: "audit", "{formatted}"),
            AuditLevel::Warn => tracing::warn!(target: "audit", "{formatted}"),
            AuditLevel::Error => tracing::error!(target: "audit", "{formatted}"),
        }

        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut inner = self.inner.lock();
        inner.entries.push(format!("[{stamp}] [{level}] {formatted}"));

        if let Some(path) = inner.file.as_deref() {
            if let Err(e) = append_line(path, level, &formatted) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write audit log");
            }
        }
    }

    pub fn debug(&self, message: &str, details: Option<Value>) {
        self.log(AuditLevel::Debug, message, details);
    }

    pub fn info(&self, message: &str, details: Option<Value>) {
        self.log(AuditLevel::Info, message, details);
    }

    pub fn warn(&self, message: &str, details: Option<Value>) {
        self.log(AuditLevel::Warn, message, details);
    }

    pub fn error(&self, message: &str, details: Option<Value>) {
        self.log(AuditLevel::Error, message, details);
    }

    /// All entries of this session, newline-joined
    pub fn session_log(&self) -> String {
        self.inner.lock().entries.join("\n")
    }

    /// Drop the session entries and empty the log file.
    pub fn clear(&self) -> std::io::Result<()> {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        if let Some(path) = inner.file.as_deref() {
            if path.exists() {
                File::create(path)?;
            }
        }
        Ok(())
    }

    pub fn file_path(&self) -> Option<PathBuf> {
        self.inner.lock().file.clone()
    }
}

fn append_line(path: &Path, level: AuditLevel, message: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(file, "[{stamp}] [{level}] {message}")
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
