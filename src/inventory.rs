//! Inventory table accessors
//!
//! Thin wrappers binding well-known table endpoints to a client so callers
//! can write `client.inventory().devices.all(None, None)`.

use crate::client::{FetchOptions, IpfClient};
use crate::endpoint::endpoint_name;
use crate::error::Result;
use crate::snapshot::SnapshotSelector;
use crate::types::Row;
use clap::ValueEnum;
use serde_json::Value;

/// Known inventory tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InventoryTable {
    Sites,
    Devices,
    Models,
    Platforms,
    Families,
    Vendors,
    PartNumbers,
    Interfaces,
}

impl InventoryTable {
    pub const ALL: [InventoryTable; 8] = [
        InventoryTable::Sites,
        InventoryTable::Devices,
        InventoryTable::Models,
        InventoryTable::Platforms,
        InventoryTable::Families,
        InventoryTable::Vendors,
        InventoryTable::PartNumbers,
        InventoryTable::Interfaces,
    ];

    /// API endpoint backing this table
    pub fn endpoint(self) -> &'static str {
        match self {
            InventoryTable::Sites => "tables/inventory/sites",
            InventoryTable::Devices => "tables/inventory/devices",
            InventoryTable::Models => "tables/inventory/summary/models",
            InventoryTable::Platforms => "tables/inventory/summary/platforms",
            InventoryTable::Families => "tables/inventory/summary/families",
            InventoryTable::Vendors => "tables/inventory/summary/vendors",
            InventoryTable::PartNumbers => "tables/inventory/pn",
            InventoryTable::Interfaces => "tables/inventory/interfaces",
        }
    }
}

/// A table endpoint bound to a client
#[derive(Debug, Clone, Copy)]
pub struct Table<'a> {
    client: &'a IpfClient,
    endpoint: &'static str,
}

impl<'a> Table<'a> {
    pub fn new(client: &'a IpfClient, endpoint: &'static str) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// Short name: the last segment of the endpoint
    pub fn name(&self) -> &'static str {
        endpoint_name(self.endpoint)
    }

    /// Fetch every row with the table's native columns
    pub fn all(
        &self,
        filters: Option<Value>,
        snapshot: Option<SnapshotSelector>,
    ) -> Result<Vec<Row>> {
        let options = FetchOptions {
            filters,
            snapshot,
            ..FetchOptions::default()
        };
        self.client.fetch_all(self.endpoint, &options)
    }
}

/// The inventory tables of one client
#[derive(Debug, Clone, Copy)]
pub struct Inventory<'a> {
    pub sites: Table<'a>,
    pub devices: Table<'a>,
    pub models: Table<'a>,
    pub platforms: Table<'a>,
    pub families: Table<'a>,
    pub vendors: Table<'a>,
    pub part_numbers: Table<'a>,
    pub interfaces: Table<'a>,
}

impl<'a> Inventory<'a> {
    pub fn new(client: &'a IpfClient) -> Self {
        let table = |kind: InventoryTable| Table::new(client, kind.endpoint());
        Self {
            sites: table(InventoryTable::Sites),
            devices: table(InventoryTable::Devices),
            models: table(InventoryTable::Models),
            platforms: table(InventoryTable::Platforms),
            families: table(InventoryTable::Families),
            vendors: table(InventoryTable::Vendors),
            part_numbers: table(InventoryTable::PartNumbers),
            interfaces: table(InventoryTable::Interfaces),
        }
    }

    /// Look up a table by kind
    pub fn table(&self, kind: InventoryTable) -> Table<'a> {
        match kind {
            InventoryTable::Sites => self.sites,
            InventoryTable::Devices => self.devices,
            InventoryTable::Models => self.models,
            InventoryTable::Platforms => self.platforms,
            InventoryTable::Families => self.families,
            InventoryTable::Vendors => self.vendors,
            InventoryTable::PartNumbers => self.part_numbers,
            InventoryTable::Interfaces => self.interfaces,
        }
    }
}
