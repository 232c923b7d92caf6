// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sd_core::ToolStatus;
use std::io::IsTerminal;

pub mod codes {
    /// Tool prefixes and event lines: steel blue
    pub const HEADER: u8 = 74;
    /// Secondary text: darker grey
    pub const MUTED: u8 = 240;
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Apply the header color (steel blue).
pub(crate) fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

/// Format text with the muted color (darker grey).
pub fn muted(text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(codes::MUTED), text, RESET)
    } else {
        text.to_string()
    }
}

/// Green when running, yellow in transition or stopped.
pub(crate) fn apply_status(status: ToolStatus) -> String {
    let code = match status {
        ToolStatus::Running => GREEN,
        ToolStatus::Starting | ToolStatus::Stopping | ToolStatus::Stopped => YELLOW,
    };
    format!("{code}{status}{RESET}")
}

/// Color a rendered log line by its `[LEVEL]` prefix.
pub(crate) fn apply_log_line(line: &str) -> String {
    let code = if line.starts_with("[ERROR]") {
        RED.to_string()
    } else if line.starts_with("[WARN]") {
        YELLOW.to_string()
    } else if line.starts_with("[EVENT]") {
        fg256(codes::HEADER)
    } else if line.starts_with("[DEBUG]") {
        fg256(codes::MUTED)
    } else {
        return line.to_string();
    };
    format!("{code}{line}{RESET}")
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
