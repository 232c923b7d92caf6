// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `savedeck query` - Run one command against the query tool

use anyhow::Result;
use clap::Args;

use crate::color;
use crate::output::{print_json, OutputFormat};
use sd_adapters::{Pagination, PhpQueryAdapter, QueryResponse, TracedQuery};
use sd_engine::{AppConfig, AuditLog, QueryFailure, QueryGateway, QueryOptions};

#[derive(Args)]
pub struct QueryArgs {
    /// Query command (e.g. list-saves, save-info, ships)
    pub command: String,
    /// Save identifier; omit for commands that list saves
    #[arg(long, default_value = "")]
    pub save: String,
    /// Filter expression, passed to the query tool verbatim
    #[arg(long)]
    pub filter: Option<String>,
    #[arg(long)]
    pub limit: Option<u64>,
    #[arg(long)]
    pub offset: Option<u64>,
    /// Cache key for the query tool's result cache
    #[arg(long)]
    pub cache_key: Option<String>,
}

impl QueryArgs {
    fn options(&self) -> QueryOptions {
        QueryOptions {
            filter: self.filter.clone(),
            limit: self.limit,
            offset: self.offset,
            cache_key: self.cache_key.clone(),
        }
    }
}

/// `75 total, showing 51-75` plus a note when more pages follow
pub fn format_pagination(pagination: &Pagination, shown: Option<usize>) -> String {
    let first = pagination.offset.saturating_add(1);
    let count = shown.map_or(pagination.limit, |n| n as u64);
    let last = pagination.offset.saturating_add(count).min(pagination.total);
    let mut text = if pagination.total == 0 || count == 0 {
        format!("{} total", pagination.total)
    } else {
        format!("{} total, showing {first}-{last}", pagination.total)
    };
    if pagination.has_more {
        text.push_str(" (more available)");
    }
    text
}

/// Pretty data followed by the pagination summary, if any
pub fn format_response_text(response: &QueryResponse) -> Result<String> {
    let mut text = serde_json::to_string_pretty(&response.data)?;
    if let Some(pagination) = &response.pagination {
        let shown = response.data.as_array().map(Vec::len);
        text.push('\n');
        text.push_str(&color::muted(&format_pagination(pagination, shown)));
    }
    Ok(text)
}

pub async fn handle(args: QueryArgs, config: AppConfig, format: OutputFormat) -> Result<()> {
    let adapter = TracedQuery::new(PhpQueryAdapter::new());
    let gateway = QueryGateway::new(adapter, AuditLog::new(), &config);

    match gateway.query(&args.save, &args.command, args.options()).await {
        Ok(response) => match format {
            OutputFormat::Text => println!("{}", format_response_text(&response)?),
            OutputFormat::Json => print_json(&response)?,
        },
        Err(QueryFailure::Rejected { message, response }) => {
            if format == OutputFormat::Json {
                print_json(&response)?;
            }
            anyhow::bail!(message);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
