// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn init_writes_defaults_that_load_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("savedeck").join("config.toml");

    assert!(init(&path, false).unwrap());

    let loaded = AppConfig::load_from(&path).unwrap();
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn init_keeps_existing_file_without_force() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "php_path = \"/usr/bin/php8.3\"\n").unwrap();

    assert!(!init(&path, false).unwrap());
    assert_eq!(AppConfig::load_from(&path).unwrap().php_path, "/usr/bin/php8.3");

    assert!(init(&path, true).unwrap());
    assert_eq!(AppConfig::load_from(&path).unwrap().php_path, "php");
}

#[test]
fn init_refusal_is_an_error_for_the_command() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();

    let err = handle(ConfigCommand::Init { force: false }, &path, OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("already exists"));
}
