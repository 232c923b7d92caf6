// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-tool state folded from classified output.
//!
//! [`ToolState::apply`] is a pure reducer: no I/O, no clock. The ingestion
//! timestamp is passed in by the caller so replays are deterministic.

use crate::message::{ClassifiedMessage, ErrorCode, ErrorDetail};
use crate::tool::ToolStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;

/// Most recent log lines kept per tool
pub const MAX_LOG_LINES: usize = 1000;

/// Most recent event records kept per tool
pub const MAX_EVENTS: usize = 50;

const MONITOR_STARTED: &str = "MONITOR_STARTED";
const SAVE_DETECTED: &str = "SAVE_DETECTED";

/// Savegame announced by a `SAVE_DETECTED` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedSave {
    pub name: String,
    pub path: String,
}

impl DetectedSave {
    /// Read `name` and `path` from an event payload. Non-string values keep
    /// their JSON text; missing ones are empty.
    pub fn from_payload(payload: &Value) -> Self {
        let field = |key: &str| match payload.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Self {
            name: field("name"),
            path: field("path"),
        }
    }
}

/// Last fatal error reported in-band by a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
}

/// One entry in the newest-first event history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    pub timestamp: String,
    #[serde(flatten)]
    pub kind: EventRecordKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventRecordKind {
    Event {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
    },
}

/// Everything known about one supervised tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToolState {
    pub status: ToolStatus,
    /// Rendered output lines, oldest first, at most [`MAX_LOG_LINES`]
    pub logs: VecDeque<String>,
    /// Event and error records, newest first, at most [`MAX_EVENTS`]
    pub events: VecDeque<EventRecord>,
    pub current_event: Option<String>,
    pub last_tick: Option<u64>,
    pub detected_save: Option<DetectedSave>,
    pub version: Option<String>,
    pub error: Option<ToolError>,
    /// Number of lines ever appended to `logs`. Survives eviction and
    /// `clear_logs`, so the newest line always has sequence `log_seq`.
    pub log_seq: u64,
}

impl ToolState {
    /// Fold one classified message into the state.
    ///
    /// `received_at` stamps event records whose message carried no timestamp.
    pub fn apply(&mut self, msg: ClassifiedMessage, received_at: &str) {
        match msg {
            ClassifiedMessage::Tick { counter } => {
                self.last_tick = Some(counter);
            }
            ClassifiedMessage::Event {
                name,
                payload,
                timestamp,
            } => {
                if let Some(payload) = payload.as_ref() {
                    match name.as_str() {
                        MONITOR_STARTED => {
                            if let Some(version) = payload_version(payload) {
                                self.version = Some(version);
                            }
                        }
                        SAVE_DETECTED => {
                            self.detected_save = Some(DetectedSave::from_payload(payload));
                        }
                        _ => {}
                    }
                }
                self.push_log(render_event(&name, payload.as_ref()));
                self.current_event = Some(name.clone());
                self.push_record(EventRecord {
                    timestamp: timestamp.unwrap_or_else(|| received_at.to_string()),
                    kind: EventRecordKind::Event { name, payload },
                });
            }
            ClassifiedMessage::Log { level, message } => {
                self.push_log(render_log(level.as_deref(), &message));
            }
            ClassifiedMessage::Error {
                message,
                code,
                errors,
                timestamp,
            } => {
                self.push_log(format!("[ERROR] {message}"));
                self.push_record(EventRecord {
                    timestamp: timestamp.unwrap_or_else(|| received_at.to_string()),
                    kind: EventRecordKind::Error {
                        message: message.clone(),
                        code: code.clone(),
                    },
                });
                self.error = Some(ToolError {
                    message,
                    code,
                    errors,
                });
            }
            ClassifiedMessage::Plain { text } => {
                self.push_log(text);
            }
        }
    }

    /// Append a rendered line, evicting the oldest beyond [`MAX_LOG_LINES`].
    pub fn push_log(&mut self, line: String) {
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.log_seq += 1;
    }

    fn push_record(&mut self, record: EventRecord) {
        self.events.push_front(record);
        self.events.truncate(MAX_EVENTS);
    }

    /// Lines appended after sequence number `seen`, oldest first.
    ///
    /// Lines that were evicted or cleared since are skipped.
    pub fn logs_since(&self, seen: u64) -> impl Iterator<Item = &str> {
        let unseen = self.log_seq.saturating_sub(seen);
        let available = self.logs.len();
        let skip = available.saturating_sub(usize::try_from(unseen).unwrap_or(usize::MAX));
        self.logs.iter().skip(skip).map(String::as_str)
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// `[EVENT] NAME` or `[EVENT] NAME: <compact json payload>`
pub fn render_event(name: &str, payload: Option<&Value>) -> String {
    match payload {
        Some(payload) => format!("[EVENT] {name}: {payload}"),
        None => format!("[EVENT] {name}"),
    }
}

/// `[LEVEL] message`, or just the message when no level was given
pub fn render_log(level: Option<&str>, message: &str) -> String {
    match level.filter(|l| !l.is_empty()) {
        Some(level) => format!("[{}] {message}", level.to_uppercase()),
        None => message.to_string(),
    }
}

fn payload_version(payload: &Value) -> Option<String> {
    match payload.get("version")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
