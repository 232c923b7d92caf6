// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of raw tool output lines.
//!
//! The parser tool writes one JSON object per line (NDJSON) interleaved with
//! ordinary text. Each line is classified on its own; nothing is buffered
//! between lines. Anything that does not decode as a known message shape is
//! kept as plain text, so a single bad line never breaks the stream.

use crate::tool::ToolId;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Tool-defined error code, numeric or textual, kept exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(Number),
    Text(String),
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        ErrorCode::Number(code.into())
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        ErrorCode::Text(code.to_string())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{n}"),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of a tool-reported error chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

/// A single output line after classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedMessage {
    /// Heartbeat counter; never rendered into the log buffer
    Tick { counter: u64 },
    /// Named activity with optional payload. `timestamp` is only what the
    /// tool sent; ingestion time is filled in by the reducer.
    Event {
        name: String,
        payload: Option<Value>,
        timestamp: Option<String>,
    },
    Log {
        level: Option<String>,
        message: String,
    },
    /// Fatal error reported in-band by the tool
    Error {
        message: String,
        code: Option<ErrorCode>,
        errors: Option<Vec<ErrorDetail>>,
        timestamp: Option<String>,
    },
    /// Anything else, verbatim
    Plain { text: String },
}

impl ClassifiedMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        ClassifiedMessage::Plain { text: text.into() }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self, ClassifiedMessage::Plain { .. })
    }
}

/// Wire shape of structured lines, keyed by the `type` field.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum WireMessage {
    Tick {
        counter: u64,
    },
    Event {
        name: String,
        #[serde(default)]
        payload: Option<Value>,
        #[serde(default)]
        timestamp: Option<String>,
    },
    Log {
        #[serde(default)]
        level: Option<String>,
        message: String,
    },
    Error {
        message: String,
        #[serde(default)]
        code: Option<ErrorCode>,
        #[serde(default)]
        errors: Option<Vec<ErrorDetail>>,
        #[serde(default)]
        timestamp: Option<String>,
    },
}

impl From<WireMessage> for ClassifiedMessage {
    fn from(wire: WireMessage) -> Self {
        match wire {
            WireMessage::Tick { counter } => ClassifiedMessage::Tick { counter },
            WireMessage::Event {
                name,
                payload,
                timestamp,
            } => ClassifiedMessage::Event {
                name,
                payload,
                timestamp,
            },
            WireMessage::Log { level, message } => ClassifiedMessage::Log { level, message },
            WireMessage::Error {
                message,
                code,
                errors,
                timestamp,
            } => ClassifiedMessage::Error {
                message,
                code,
                errors,
                timestamp,
            },
        }
    }
}

/// Classify one raw output line from `tool`.
///
/// Never fails: unknown types, missing fields and invalid JSON all fall back
/// to [`ClassifiedMessage::Plain`] carrying the original line.
pub fn classify(tool: ToolId, line: &str) -> ClassifiedMessage {
    if !tool.emits_structured_output() {
        return ClassifiedMessage::plain(line);
    }

    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return ClassifiedMessage::plain(line);
    }

    match serde_json::from_str::<WireMessage>(trimmed) {
        Ok(wire) => wire.into(),
        Err(_) => ClassifiedMessage::plain(line),
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
