//! Table query commands

use crate::client::{FetchOptions, IpfClient};
use crate::commands::{output_rows, parse_filters};
use crate::error::{IpfError, Result};
use crate::inventory::InventoryTable;
use crate::session::QueryBody;
use std::io::Read;

/// Arguments of the `fetch` command
#[derive(Debug, Clone, Default)]
pub struct FetchArgs {
    pub endpoint: String,
    pub columns: Vec<String>,
    pub filters: Option<String>,
    pub limit: Option<usize>,
    pub start: usize,
    pub all: bool,
    pub json: bool,
}

/// Print the discovered columns of a table, one per line
pub fn show_columns(client: &IpfClient, endpoint: &str) -> Result<()> {
    for column in client.columns(endpoint)? {
        println!("{}", column);
    }
    Ok(())
}

/// Fetch one page, or every page with `--all`
pub fn fetch(client: &IpfClient, args: FetchArgs) -> Result<()> {
    let options = FetchOptions {
        columns: (!args.columns.is_empty()).then(|| args.columns.clone()),
        filters: parse_filters(args.filters.as_deref())?,
        snapshot: None,
        limit: args.limit,
        start: args.start,
    };

    if args.all && args.start != 0 {
        tracing::warn!("--start is ignored when fetching all rows");
    }

    let rows = if args.all {
        client.fetch_all(&args.endpoint, &options)?
    } else {
        client.fetch(&args.endpoint, &options)?
    };

    output_rows(&rows, &args.columns, args.json)
}

/// Fetch every row of an inventory table
pub fn inventory(
    client: &IpfClient,
    table: InventoryTable,
    filters: Option<&str>,
    json: bool,
) -> Result<()> {
    let table = client.inventory().table(table);
    tracing::info!("Fetching inventory table {}", table.name());
    let rows = table.all(parse_filters(filters)?, None)?;
    output_rows(&rows, &[], json)
}

/// Post a raw body read from a file or stdin
pub fn query(client: &IpfClient, endpoint: &str, body_path: &str, json: bool) -> Result<()> {
    let body = read_body(body_path)?;
    let rows = client.query(endpoint, QueryBody::Text(body))?;
    output_rows(&rows, &[], json)
}

fn read_body(path: &str) -> Result<String> {
    let body = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(IpfError::Io)?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|e| {
            IpfError::InvalidArgument(format!("Failed to read query body {}: {}", path, e))
        })?
    };

    serde_json::from_str::<serde_json::Value>(&body)
        .map_err(|e| IpfError::InvalidArgument(format!("Query body is not valid JSON: {}", e)))?;
    Ok(body)
}
