// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sd-core: tool identity, output classification and folded tool state

pub mod clock;
pub mod event;
pub mod labels;
pub mod message;
pub mod state;
pub mod tool;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::{OutputStream, ProcessEvent};
pub use labels::EventLabels;
pub use message::{classify, ClassifiedMessage, ErrorCode, ErrorDetail};
pub use state::{
    DetectedSave, EventRecord, EventRecordKind, ToolError, ToolState, MAX_EVENTS, MAX_LOG_LINES,
};
pub use tool::{ToolId, ToolStatus};
