//! ipfabric-client - paginated table client for the IP Fabric REST API
//!
//! This library verifies credentials against an IP Fabric instance, loads
//! its snapshot catalog, and fetches complete tables by following the
//! server's pagination.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: HTTP session carrying the API token, raw API calls
//! - `client`: Verified client with snapshot selection and table fetches
//! - `pager`: Page-by-page fetch loop over any `PageSource`
//! - `snapshot`: Snapshot catalog and `$last` / `$prev` / `$lastLocked` resolution
//! - `columns`: Column discovery from validation error messages
//! - `inventory`: Typed accessors for inventory tables
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface for the `ipf` binary
//!
//! # Example
//!
//! ```no_run
//! use ipfabric_client::{Config, IpfClient};
//!
//! fn main() -> anyhow::Result<()> {
//!     // falls back to IPF_URL / IPF_TOKEN
//!     let config = Config::new(None, None);
//!     let mut client = IpfClient::connect(&config)?;
//!
//!     client.set_snapshot("$prev")?;
//!     let sites = client.inventory().sites.all(None, None)?;
//!     println!("{} sites in snapshot {}", sites.len(), client.snapshot_id());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod columns;
pub mod commands;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod inventory;
pub mod pager;
pub mod session;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use client::{FetchOptions, IpfClient};
pub use config::Config;
pub use error::{IpfError, Result};
pub use inventory::{Inventory, InventoryTable, Table};
pub use pager::{fetch_all_pages, PageSource};
pub use session::{QueryBody, Session, SessionOptions};
pub use snapshot::{Snapshot, SnapshotCatalog, SnapshotSelector, SnapshotState};
pub use types::{Page, Pagination, Row, TableRequest};
