// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn known_name_uses_label() {
    let labels: EventLabels = [("SAVE_DETECTED", "Save detected")].into_iter().collect();
    assert_eq!(labels.label("SAVE_DETECTED"), "Save detected");
}

#[test]
fn unknown_name_falls_back_to_itself() {
    let labels = EventLabels::new();
    assert!(labels.is_empty());
    assert_eq!(labels.label("SCAN_FINISHED"), "SCAN_FINISHED");
}

#[test]
fn insert_overrides() {
    let mut labels = EventLabels::new();
    labels.insert("MONITOR_STARTED", "Monitor started");
    labels.insert("MONITOR_STARTED", "Watching");
    assert_eq!(labels.label("MONITOR_STARTED"), "Watching");
}

#[test]
fn deserializes_from_plain_table() {
    let labels: EventLabels =
        serde_json::from_str(r#"{"SAVE_DETECTED":"Neuer Spielstand"}"#).unwrap();
    assert_eq!(labels.label("SAVE_DETECTED"), "Neuer Spielstand");
}
