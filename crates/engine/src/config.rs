// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Application configuration (TOML)
//!
//! Every field has a default, so a missing file or a partial file loads.

use crate::env;
use crate::error::ConfigError;
use sd_core::{EventLabels, ToolId};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_VIEWER_HOST: &str = "localhost";
pub const DEFAULT_VIEWER_PORT: u16 = 9494;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// PHP executable used to run every tool
    pub php_path: String,
    pub game_folder_path: String,
    pub savegame_folder_path: String,
    pub parser_tool_path: String,
    pub viewer_tool_path: String,
    pub query_tool_path: String,
    pub viewer_host: String,
    pub viewer_port: u16,
    /// UI language code, or `auto` for the system language
    pub language: String,
    /// Display labels for parser event names
    #[serde(skip_serializing_if = "EventLabels::is_empty")]
    pub event_labels: EventLabels,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            php_path: "php".to_string(),
            game_folder_path: String::new(),
            savegame_folder_path: String::new(),
            parser_tool_path: String::new(),
            viewer_tool_path: String::new(),
            query_tool_path: String::new(),
            viewer_host: DEFAULT_VIEWER_HOST.to_string(),
            viewer_port: DEFAULT_VIEWER_PORT,
            language: "auto".to_string(),
            event_labels: EventLabels::default(),
        }
    }
}

impl AppConfig {
    /// Load from the resolved config path; a missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&env::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML, migrating a legacy `viewer_url` key when no
    /// `viewer_host` is present.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let mut table: toml::Table = toml::from_str(content)?;
        if !table.contains_key("viewer_host") {
            if let Some(url) = table.get("viewer_url").and_then(|v| v.as_str()) {
                let (host, port) = split_viewer_url(url);
                table.insert("viewer_host".to_string(), toml::Value::String(host));
                table.insert("viewer_port".to_string(), toml::Value::Integer(port.into()));
            }
        }
        table.remove("viewer_url");
        toml::Value::Table(table).try_into()
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Script path configured for `tool`
    pub fn tool_script(&self, tool: ToolId) -> &str {
        match tool {
            ToolId::Parser => &self.parser_tool_path,
            ToolId::Viewer => &self.viewer_tool_path,
        }
    }

    pub fn viewer_url(&self) -> String {
        format!("http://{}:{}", self.viewer_host, self.viewer_port)
    }
}

/// Split `http://host:port` or `host:port` into its parts, falling back to
/// the defaults for a missing host or a missing/invalid port.
fn split_viewer_url(url: &str) -> (String, u16) {
    let rest = url
        .trim()
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    let authority = rest.split('/').next().unwrap_or_default();
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().ok().filter(|p| *p != 0)),
        None => (authority, None),
    };
    let host = if host.is_empty() {
        DEFAULT_VIEWER_HOST.to_string()
    } else {
        host.to_string()
    };
    (host, port.unwrap_or(DEFAULT_VIEWER_PORT))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
