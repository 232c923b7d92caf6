// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Query tool invocation timeout (default: 60000ms).
pub fn query_timeout() -> Duration {
    parse_duration_ms("SD_QUERY_TIMEOUT_MS").unwrap_or(Duration::from_secs(60))
}

/// How long `terminate` waits for a killed tool to be reaped (default: 5000ms).
pub fn terminate_timeout() -> Duration {
    parse_duration_ms("SD_TERMINATE_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}
