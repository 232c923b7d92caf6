// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! savedeck - supervise the savegame tools from a terminal

mod color;
mod commands;
mod env;
mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use commands::{config, query, run};
use output::OutputFormat;
use sd_engine::AppConfig;

#[derive(Parser)]
#[command(
    name = "savedeck",
    version,
    about = "Savedeck - run the savegame parser and viewer, query saves"
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    /// Configuration file (default: $SD_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tools and stream their output until Ctrl-C
    Run(run::RunArgs),
    /// Run one command against the query tool
    Query(query::QueryArgs),
    /// Configuration file management
    Config(config::ConfigArgs),
}

pub(crate) fn cli_command() -> clap::Command {
    Cli::command()
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(1);
    }
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains every source message, the
/// "Caused by" chain is skipped.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let Some(command) = cli.command else {
        // No subcommand provided: print help and exit 0
        cli_command().print_help()?;
        println!();
        return Ok(());
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => sd_engine::env::config_path()?,
    };

    match command {
        Commands::Config(args) => config::handle(args.command, &config_path, format)?,
        Commands::Run(args) => {
            let state_dir = sd_engine::env::state_dir()?;
            let _guard = setup_logging(&state_dir)?;
            let config = load_config(&config_path)?;
            run::handle(args, config, &state_dir, format).await?
        }
        Commands::Query(args) => {
            let state_dir = sd_engine::env::state_dir()?;
            let _guard = setup_logging(&state_dir)?;
            let config = load_config(&config_path)?;
            query::handle(args, config, format).await?
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<AppConfig> {
    let config = AppConfig::load_from(path)?;
    tracing::info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Log to `<state_dir>/savedeck.log`, filtered by `RUST_LOG` (default info).
fn setup_logging(state_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    std::fs::create_dir_all(state_dir)?;

    let file_appender = tracing_appender::rolling::never(state_dir, "savedeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
