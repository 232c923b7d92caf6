// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn empty_file_gives_defaults() {
    let config = AppConfig::parse("").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.php_path, "php");
    assert_eq!(config.viewer_url(), "http://localhost:9494");
    assert_eq!(config.language, "auto");
}

#[test]
fn partial_file_keeps_other_defaults() {
    let config = AppConfig::parse(
        r#"
php_path = "C:/php/php.exe"
parser_tool_path = "C:/tools/parser/monitor.php"
viewer_port = 8080

[event_labels]
SAVE_DETECTED = "Save detected"
"#,
    )
    .unwrap();

    assert_eq!(config.php_path, "C:/php/php.exe");
    assert_eq!(config.tool_script(ToolId::Parser), "C:/tools/parser/monitor.php");
    assert_eq!(config.tool_script(ToolId::Viewer), "");
    assert_eq!(config.viewer_host, "localhost");
    assert_eq!(config.viewer_port, 8080);
    assert_eq!(config.event_labels.label("SAVE_DETECTED"), "Save detected");
}

#[yare::parameterized(
    full_url        = { "http://192.168.1.5:8000", "192.168.1.5", 8000 },
    https_with_path = { "https://viewer.lan:9000/index.php", "viewer.lan", 9000 },
    bare_host_port  = { "myhost:7000", "myhost", 7000 },
    no_port         = { "http://myhost", "myhost", 9494 },
    bad_port        = { "myhost:abc", "myhost", 9494 },
    zero_port       = { "myhost:0", "myhost", 9494 },
    no_host         = { ":8123", "localhost", 8123 },
    empty           = { "", "localhost", 9494 },
)]
fn legacy_viewer_url_is_split(url: &str, host: &str, port: u16) {
    let config = AppConfig::parse(&format!("viewer_url = {url:?}")).unwrap();
    assert_eq!(config.viewer_host, host);
    assert_eq!(config.viewer_port, port);
}

#[test]
fn explicit_viewer_host_wins_over_legacy_url() {
    let config = AppConfig::parse(
        r#"
viewer_url = "http://old:1111"
viewer_host = "new"
"#,
    )
    .unwrap();
    assert_eq!(config.viewer_host, "new");
    assert_eq!(config.viewer_port, DEFAULT_VIEWER_PORT);
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(AppConfig::parse("viewer_port = \"not a number\"").is_err());
    assert!(AppConfig::parse("php_path = ").is_err());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[broken").unwrap();

    let err = AppConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn save_then_load_preserves_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let mut config = AppConfig {
        viewer_tool_path: "/opt/viewer/index.php".to_string(),
        query_tool_path: "/opt/parser/query.php".to_string(),
        language: "de".to_string(),
        ..AppConfig::default()
    };
    config.event_labels.insert("MONITOR_STARTED", "Monitor gestartet");

    config.save(&path).unwrap();
    let loaded = AppConfig::load_from(&path).unwrap();

    assert_eq!(loaded, config);
}
