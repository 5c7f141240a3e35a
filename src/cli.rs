//! Command-line interface definition for ipf
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for inspecting snapshots and querying tables.

use crate::inventory::InventoryTable;
use clap::{Parser, Subcommand};

/// ipf - query IP Fabric tables from the command line
///
/// Connection settings come from the config file, then the `IPF_URL`,
/// `IPF_TOKEN` and related environment variables, then these flags.
#[derive(Parser, Debug, Clone)]
#[command(name = "ipf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Instance base URL (overrides IPF_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// API token (overrides IPF_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Default snapshot: $last, $prev, $lastLocked or a snapshot ID
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for ipf
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the server OS version
    Version,

    /// List snapshots, newest first
    Snapshots {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the column names of a table endpoint
    Columns {
        /// Table endpoint, e.g. tables/inventory/sites
        endpoint: String,
    },

    /// Fetch rows from a table endpoint
    Fetch {
        /// Table endpoint, e.g. tables/addressing/arp
        endpoint: String,

        /// Comma-separated columns (discovered from the server when omitted)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Filter expression as JSON
        #[arg(long)]
        filters: Option<String>,

        /// Rows per page
        #[arg(long)]
        limit: Option<usize>,

        /// First row of the page (single-page fetch only)
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Follow pagination and fetch every row
        #[arg(long)]
        all: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch every row of an inventory table
    Inventory {
        /// Inventory table
        #[arg(value_enum)]
        table: InventoryTable,

        /// Filter expression as JSON
        #[arg(long)]
        filters: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Post a raw query body (file path or `-` for stdin)
    Query {
        /// Table endpoint or full URL copied from the web UI
        endpoint: String,

        /// File holding the JSON request body, `-` reads stdin
        #[arg(long)]
        body: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            url: None,
            token: None,
            snapshot: None,
            insecure: false,
            verbose: false,
            command: Commands::Version,
        }
    }
}
