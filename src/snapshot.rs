//! Snapshot catalog and selector resolution
//!
//! Every table query is scoped to one snapshot. The server lists snapshots
//! newest first; this module keeps that order and resolves the symbolic
//! selectors (`$last`, `$prev`, `$lastLocked`) against it.

use crate::error::{IpfError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnapshotState {
    /// Loaded into the database and queryable
    Loaded,
    /// Currently being loaded
    Loading,
    /// Any other state reported by the server (e.g. `unloaded`, `discovering`)
    Other(String),
}

impl From<String> for SnapshotState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "loaded" => SnapshotState::Loaded,
            "loading" => SnapshotState::Loading,
            _ => SnapshotState::Other(s),
        }
    }
}

impl From<SnapshotState> for String {
    fn from(state: SnapshotState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotState::Loaded => write!(f, "loaded"),
            SnapshotState::Loading => write!(f, "loading"),
            SnapshotState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Snapshot metadata as returned by `GET snapshots`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Number of devices discovered in the snapshot
    #[serde(rename = "totalDevCount", default)]
    pub device_count: u64,
    pub state: SnapshotState,
    #[serde(default)]
    pub locked: bool,
    #[serde(
        rename = "tsStart",
        default,
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub start: Option<DateTime<Utc>>,
    #[serde(
        rename = "tsEnd",
        default,
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub end: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Whether the snapshot is loaded and can be queried
    pub fn is_loaded(&self) -> bool {
        self.state == SnapshotState::Loaded
    }
}

/// Selects which snapshot a query runs against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SnapshotSelector {
    /// Most recent loaded snapshot (`$last`)
    #[default]
    Last,
    /// Second most recent loaded snapshot (`$prev`)
    Prev,
    /// Most recent loaded and locked snapshot (`$lastLocked`)
    LastLocked,
    /// Explicit snapshot ID
    Id(String),
}

impl SnapshotSelector {
    /// Build a selector from an optional string; `None` means `$last`
    pub fn from_option(value: Option<&str>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<&str> for SnapshotSelector {
    fn from(value: &str) -> Self {
        match value {
            "$last" => SnapshotSelector::Last,
            "$prev" => SnapshotSelector::Prev,
            "$lastLocked" => SnapshotSelector::LastLocked,
            id => SnapshotSelector::Id(id.to_string()),
        }
    }
}

impl FromStr for SnapshotSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for SnapshotSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSelector::Last => write!(f, "$last"),
            SnapshotSelector::Prev => write!(f, "$prev"),
            SnapshotSelector::LastLocked => write!(f, "$lastLocked"),
            SnapshotSelector::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Ordered snapshot list, newest first, keyed by unique ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotCatalog {
    snapshots: Vec<Snapshot>,
}

impl SnapshotCatalog {
    /// Build a catalog preserving the given order
    ///
    /// Later entries that repeat an earlier ID are dropped.
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        let mut unique: Vec<Snapshot> = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            if unique.iter().any(|s| s.id == snapshot.id) {
                tracing::warn!("Duplicate snapshot id {} in listing, ignoring", snapshot.id);
                continue;
            }
            unique.push(snapshot);
        }
        Self { snapshots: unique }
    }

    pub fn get(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Loaded snapshots in server order
    pub fn loaded(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter().filter(|s| s.is_loaded())
    }

    /// Resolve a selector to a concrete snapshot ID
    ///
    /// # Errors
    ///
    /// - [`IpfError::NotFound`] when no loaded snapshot satisfies `$last`,
    ///   `$prev` or `$lastLocked`
    /// - [`IpfError::InvalidArgument`] when a literal ID is not in the catalog
    ///
    /// # Examples
    ///
    /// ```
    /// use ipfabric_client::snapshot::{SnapshotCatalog, SnapshotSelector};
    ///
    /// let catalog: SnapshotCatalog = serde_json::from_str::<Vec<_>>(r#"[
    ///     {"id": "A", "state": "loaded", "locked": false},
    ///     {"id": "B", "state": "loaded", "locked": true}
    /// ]"#).map(SnapshotCatalog::new).unwrap();
    ///
    /// assert_eq!(catalog.resolve(&SnapshotSelector::Last).unwrap(), "A");
    /// assert_eq!(catalog.resolve(&SnapshotSelector::LastLocked).unwrap(), "B");
    /// ```
    pub fn resolve(&self, selector: &SnapshotSelector) -> Result<String> {
        let found = match selector {
            SnapshotSelector::Last => self
                .loaded()
                .next()
                .ok_or_else(|| IpfError::NotFound("No loaded snapshots found".to_string()))?,
            SnapshotSelector::Prev => self.loaded().nth(1).ok_or_else(|| {
                IpfError::NotFound("Fewer than two loaded snapshots found".to_string())
            })?,
            SnapshotSelector::LastLocked => {
                self.loaded().find(|s| s.locked).ok_or_else(|| {
                    IpfError::NotFound("No loaded locked snapshots found".to_string())
                })?
            }
            SnapshotSelector::Id(id) => self.get(id).ok_or_else(|| {
                IpfError::InvalidArgument(format!("Incorrect snapshot ID: '{}'", id))
            })?,
        };
        Ok(found.id.clone())
    }
}

impl<'a> IntoIterator for &'a SnapshotCatalog {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
