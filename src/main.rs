//! ipf - IP Fabric table client
//!
#![doc = "Main entry point for the ipf command-line tool."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ipfabric_client::cli::{Cli, Commands};
use ipfabric_client::commands;
use ipfabric_client::commands::tables::FetchArgs;
use ipfabric_client::config::Config;
use ipfabric_client::IpfClient;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load and validate configuration
    let config = Config::load(cli.config.as_deref(), &cli)?;
    config.validate()?;

    // Connecting verifies the token and resolves the default snapshot
    let client = IpfClient::connect(&config)?;

    match cli.command {
        Commands::Version => commands::snapshots::show_version(&client),
        Commands::Snapshots { json } => commands::snapshots::list_snapshots(&client, json),
        Commands::Columns { endpoint } => commands::tables::show_columns(&client, &endpoint),
        Commands::Fetch {
            endpoint,
            columns,
            filters,
            limit,
            start,
            all,
            json,
        } => {
            tracing::debug!("Fetching {} (all: {})", endpoint, all);
            commands::tables::fetch(
                &client,
                FetchArgs {
                    endpoint,
                    columns,
                    filters,
                    limit,
                    start,
                    all,
                    json,
                },
            )
        }
        Commands::Inventory {
            table,
            filters,
            json,
        } => commands::tables::inventory(&client, table, filters.as_deref(), json),
        Commands::Query {
            endpoint,
            body,
            json,
        } => commands::tables::query(&client, &endpoint, &body, json),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so table and JSON output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "ipfabric_client=debug"
    } else {
        "ipfabric_client=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
