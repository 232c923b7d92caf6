// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use crate::error::ConfigError;
use std::path::PathBuf;

/// Resolve the config file: SD_CONFIG > <config_dir>/savedeck/config.toml
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os("SD_CONFIG").filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::config_dir()
        .map(|dir| dir.join("savedeck").join("config.toml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Resolve state directory: SD_STATE_DIR > XDG_STATE_HOME/savedeck > ~/.local/state/savedeck
pub fn state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("SD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("savedeck"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoStateDir)?;
    Ok(home.join(".local/state/savedeck"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
