// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `savedeck config` - Inspect and initialize the configuration file

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::{print_json, OutputFormat};
use sd_engine::AppConfig;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Write defaults to `path`. Returns false when a file exists and `force`
/// is not set.
pub fn init(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    AppConfig::default().save(path)?;
    Ok(true)
}

pub fn handle(command: ConfigCommand, path: &Path, format: OutputFormat) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = AppConfig::load_from(path)?;
            match format {
                OutputFormat::Text => {
                    print!("{}", toml::to_string_pretty(&config)?);
                    println!("# viewer: {}", config.viewer_url());
                }
                OutputFormat::Json => print_json(&config)?,
            }
        }
        ConfigCommand::Path => println!("{}", path.display()),
        ConfigCommand::Init { force } => {
            if init(path, force)? {
                println!("Wrote {}", path.display());
            } else {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
