// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::error::ErrorKind;
use clap::FromArgMatches;
use sd_core::ToolId;

use super::{cli_command, format_error, Cli, Commands};
use crate::output::OutputFormat;

fn parse(args: &[&str]) -> Cli {
    let matches = cli_command().try_get_matches_from(args).unwrap();
    Cli::from_arg_matches(&matches).unwrap()
}

#[test]
fn version_long() {
    let err = cli_command()
        .try_get_matches_from(["savedeck", "--version"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
}

#[test]
fn no_subcommand_is_allowed() {
    let cli = parse(&["savedeck"]);
    assert!(cli.command.is_none());
    assert_eq!(cli.output, OutputFormat::Text);
}

#[test]
fn run_accepts_comma_separated_tools() {
    let cli = parse(&["savedeck", "run", "--tools", "viewer,parser"]);
    let Some(Commands::Run(args)) = cli.command else {
        panic!("expected run");
    };
    assert_eq!(args.tools, vec![ToolId::Viewer, ToolId::Parser]);
}

#[test]
fn run_rejects_unknown_tool() {
    let err = cli_command()
        .try_get_matches_from(["savedeck", "run", "--tools", "compiler"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("unknown tool: compiler"));
}

#[test]
fn query_arguments() {
    let cli = parse(&[
        "savedeck",
        "-o",
        "json",
        "query",
        "logbook",
        "--save",
        "autosave_1",
        "--filter",
        "category = 'upkeep'",
        "--limit",
        "25",
        "--offset",
        "50",
        "--cache-key",
        "k",
    ]);
    assert_eq!(cli.output, OutputFormat::Json);
    let Some(Commands::Query(args)) = cli.command else {
        panic!("expected query");
    };
    assert_eq!(args.command, "logbook");
    assert_eq!(args.save, "autosave_1");
    assert_eq!(args.filter.as_deref(), Some("category = 'upkeep'"));
    assert_eq!(args.limit, Some(25));
    assert_eq!(args.offset, Some(50));
    assert_eq!(args.cache_key.as_deref(), Some("k"));
}

#[test]
fn query_save_defaults_to_empty() {
    let cli = parse(&["savedeck", "query", "list-saves"]);
    let Some(Commands::Query(args)) = cli.command else {
        panic!("expected query");
    };
    assert_eq!(args.save, "");
    assert_eq!(args.limit, None);
}

#[test]
fn global_config_flag_after_subcommand() {
    let cli = parse(&["savedeck", "config", "show", "--config", "/tmp/sd.toml"]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/sd.toml"))
    );
}

#[test]
fn format_error_skips_redundant_chain() {
    let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = anyhow::Error::new(inner).context("read failed: missing");
    assert_eq!(format_error(&err), "read failed: missing");
}

#[test]
fn format_error_renders_distinct_causes() {
    let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = anyhow::Error::new(inner).context("could not load config");
    assert_eq!(
        format_error(&err),
        "could not load config\n\nCaused by:\n    0: missing"
    );
}
