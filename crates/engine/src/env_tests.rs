// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

/// Run `f` with the given variables set (or removed), restoring them after.
fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    let saved: Vec<_> = vars
        .iter()
        .map(|(k, _)| (k.to_string(), std::env::var_os(k)))
        .collect();
    for (k, v) in vars {
        match v {
            Some(v) => std::env::set_var(k, v),
            None => std::env::remove_var(k),
        }
    }
    let result = f();
    for (k, v) in saved {
        match v {
            Some(v) => std::env::set_var(&k, v),
            None => std::env::remove_var(&k),
        }
    }
    result
}

#[test]
#[serial(env)]
fn config_path_override() {
    let path = with_env(&[("SD_CONFIG", Some("/etc/savedeck.toml"))], config_path).unwrap();
    assert_eq!(path, PathBuf::from("/etc/savedeck.toml"));
}

#[test]
#[serial(env)]
fn config_path_default_is_under_config_dir() {
    let path = with_env(&[("SD_CONFIG", None)], config_path).unwrap();
    assert!(path.ends_with("savedeck/config.toml"), "got {}", path.display());
}

#[test]
#[serial(env)]
fn state_dir_precedence() {
    let explicit = with_env(
        &[("SD_STATE_DIR", Some("/tmp/sd")), ("XDG_STATE_HOME", Some("/xdg"))],
        state_dir,
    )
    .unwrap();
    assert_eq!(explicit, PathBuf::from("/tmp/sd"));

    let xdg = with_env(
        &[("SD_STATE_DIR", None), ("XDG_STATE_HOME", Some("/xdg"))],
        state_dir,
    )
    .unwrap();
    assert_eq!(xdg, PathBuf::from("/xdg/savedeck"));

    let home = with_env(&[("SD_STATE_DIR", None), ("XDG_STATE_HOME", None)], state_dir).unwrap();
    assert!(home.ends_with(".local/state/savedeck"));
}
