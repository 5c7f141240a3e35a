//! Version and snapshot commands

use crate::client::IpfClient;
use crate::commands::print_json;
use crate::error::Result;
use crate::snapshot::{Snapshot, SnapshotCatalog, SnapshotState};
use chrono::{DateTime, Utc};
use colored::Colorize;
use prettytable::{row, Table};

/// Print the server OS version
pub fn show_version(client: &IpfClient) -> Result<()> {
    println!("IP Fabric version: {}", client.os_version());
    Ok(())
}

/// List the snapshot catalog, marking the client's default snapshot
pub fn list_snapshots(client: &IpfClient, json: bool) -> Result<()> {
    let catalog = client.snapshots();

    if json {
        let snapshots: Vec<&Snapshot> = catalog.iter().collect();
        return print_json(&snapshots);
    }

    if catalog.is_empty() {
        println!("No snapshots available");
        return Ok(());
    }

    render_snapshots(catalog, client.snapshot_id()).printstd();
    println!("\n* default snapshot: {}", client.snapshot_id());
    Ok(())
}

/// Build the snapshot table
pub fn render_snapshots(catalog: &SnapshotCatalog, default_id: &str) -> Table {
    let mut table = Table::new();
    table.set_titles(row!["", "ID", "Name", "State", "Locked", "Devices", "Start", "End"]);

    for snapshot in catalog {
        let marker = if snapshot.id == default_id { "*" } else { "" };
        let locked = if snapshot.locked { "yes" } else { "no" };
        table.add_row(row![
            marker,
            snapshot.id,
            snapshot.name.as_deref().unwrap_or(""),
            colored_state(&snapshot.state),
            locked,
            snapshot.device_count,
            format_time(snapshot.start),
            format_time(snapshot.end)
        ]);
    }

    table
}

fn colored_state(state: &SnapshotState) -> String {
    match state {
        SnapshotState::Loaded => state.to_string().green().to_string(),
        SnapshotState::Loading => state.to_string().yellow().to_string(),
        SnapshotState::Other(_) => state.to_string().dimmed().to_string(),
    }
}

fn format_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}
