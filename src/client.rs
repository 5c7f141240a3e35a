//! Table client
//!
//! [`IpfClient`] is the verified session: constructing one checks the
//! credentials against `os/version`, loads the snapshot catalog and resolves
//! the default snapshot selector. A client that exists is known to work.

use crate::config::Config;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::pager::{check_page_size, fetch_all_pages, PageSource, DEFAULT_FETCH_LIMIT};
use crate::session::{QueryBody, Session};
use crate::snapshot::{Snapshot, SnapshotCatalog, SnapshotSelector};
use crate::types::{Pagination, Row, TableRequest};
use serde_json::Value;

/// Options for [`IpfClient::fetch`] and [`IpfClient::fetch_all`]
///
/// All fields are optional. Without `columns` the client discovers the
/// table's native columns first; without `snapshot` the client's resolved
/// default is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    pub columns: Option<Vec<String>>,
    pub filters: Option<Value>,
    pub snapshot: Option<SnapshotSelector>,
    /// Page size; defaults differ between single-page and full fetches
    pub limit: Option<usize>,
    /// First row of a single-page fetch (ignored by `fetch_all`)
    pub start: usize,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn snapshot(mut self, selector: impl Into<SnapshotSelector>) -> Self {
        self.snapshot = Some(selector.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }
}

/// Verified client for the table query API
///
/// # Examples
///
/// ```no_run
/// use ipfabric_client::{Config, FetchOptions, IpfClient};
///
/// # fn example() -> ipfabric_client::Result<()> {
/// let config = Config::new(Some("https://ipf.example.com"), Some("token"));
/// let client = IpfClient::connect(&config)?;
/// println!("IP Fabric version: {}", client.os_version());
///
/// let controllers = client.fetch_all("tables/wireless/controllers", &FetchOptions::new())?;
/// println!("Wireless controllers: {}", controllers.len());
///
/// let devices = client.inventory().devices.all(None, None)?;
/// println!("Devices: {}", devices.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct IpfClient {
    session: Session,
    os_version: String,
    snapshots: SnapshotCatalog,
    snapshot_id: String,
    page_size: usize,
}

impl IpfClient {
    /// Build a session from configuration and verify it
    ///
    /// # Errors
    ///
    /// - [`Config`](crate::IpfError::Config) for missing credentials or invalid values
    /// - [`Connection`](crate::IpfError::Connection) or
    ///   [`InvalidResponse`](crate::IpfError::InvalidResponse) if the version
    ///   check fails
    /// - selector resolution errors for the configured snapshot
    pub fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        let session = Session::from_config(config)?;
        Self::verify(
            session,
            SnapshotSelector::from(config.snapshot.as_str()),
            config.page_size,
        )
    }

    /// Verify an existing session and populate the snapshot catalog
    ///
    /// Runs `GET os/version`, then `GET snapshots`, then resolves `selector`.
    pub fn verify(session: Session, selector: SnapshotSelector, page_size: usize) -> Result<Self> {
        check_page_size(page_size)?;

        let os_version = session.os_version()?;
        let snapshots = session.list_snapshots()?;
        let snapshot_id = snapshots.resolve(&selector)?;

        tracing::info!(
            "Connected to {} (version {}), {} snapshots, using snapshot {} ({})",
            session.base_url(),
            os_version,
            snapshots.len(),
            snapshot_id,
            selector
        );

        Ok(Self {
            session,
            os_version,
            snapshots,
            snapshot_id,
            page_size,
        })
    }

    /// Server OS version reported during verification
    pub fn os_version(&self) -> &str {
        &self.os_version
    }

    /// Snapshot catalog loaded during verification
    pub fn snapshots(&self) -> &SnapshotCatalog {
        &self.snapshots
    }

    /// Resolved default snapshot ID
    pub fn snapshot_id(&self) -> &str {
        &self.snapshot_id
    }

    /// Metadata of the default snapshot
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.get(&self.snapshot_id)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Reassign the default snapshot
    ///
    /// The selector is resolved immediately; on error the previous default
    /// is kept.
    pub fn set_snapshot(&mut self, selector: impl Into<SnapshotSelector>) -> Result<()> {
        let selector = selector.into();
        let snapshot_id = self.snapshots.resolve(&selector)?;
        tracing::info!("Default snapshot set to {} ({})", snapshot_id, selector);
        self.snapshot_id = snapshot_id;
        Ok(())
    }

    /// Typed accessors for the inventory tables
    pub fn inventory(&self) -> Inventory<'_> {
        Inventory::new(self)
    }

    /// Discover the native column names of a table in the default snapshot
    pub fn columns(&self, endpoint: &str) -> Result<Vec<String>> {
        self.session.discover_columns(endpoint, &self.snapshot_id)
    }

    /// Fetch a single page of rows
    ///
    /// Uses `options.limit` (default 1000) and `options.start` as the page
    /// window.
    pub fn fetch(&self, endpoint: &str, options: &FetchOptions) -> Result<Vec<Row>> {
        let limit = options.limit.unwrap_or(DEFAULT_FETCH_LIMIT);
        check_page_size(limit)?;
        let mut request = self.build_request(endpoint, options)?;
        request.pagination = Some(Pagination {
            start: options.start,
            limit,
        });
        Ok(self.session.fetch_page(endpoint, &request)?.data)
    }

    /// Fetch every row of a table, following pagination
    ///
    /// Uses `options.limit` or the configured page size per request. Any
    /// failed page aborts the fetch and no rows are returned.
    pub fn fetch_all(&self, endpoint: &str, options: &FetchOptions) -> Result<Vec<Row>> {
        let limit = options.limit.unwrap_or(self.page_size);
        check_page_size(limit)?;
        let request = self.build_request(endpoint, options)?;
        let rows = fetch_all_pages(&self.session, endpoint, request, limit)?;
        tracing::info!("Fetched {} rows from {}", rows.len(), endpoint);
        Ok(rows)
    }

    /// Post a raw query body, e.g. one copied from the web UI
    pub fn query(&self, endpoint: &str, body: QueryBody) -> Result<Vec<Row>> {
        self.session.query(endpoint, body)
    }

    fn resolve_override(&self, selector: Option<&SnapshotSelector>) -> Result<String> {
        match selector {
            Some(selector) => self.snapshots.resolve(selector),
            None => Ok(self.snapshot_id.clone()),
        }
    }

    fn build_request(&self, endpoint: &str, options: &FetchOptions) -> Result<TableRequest> {
        let snapshot_id = self.resolve_override(options.snapshot.as_ref())?;
        let columns = match &options.columns {
            Some(columns) if !columns.is_empty() => columns.clone(),
            _ => self.session.discover_columns(endpoint, &snapshot_id)?,
        };
        Ok(TableRequest::new(columns, snapshot_id).with_filters(options.filters.clone()))
    }
}
