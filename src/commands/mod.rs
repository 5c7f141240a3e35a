//! Command handlers for ipf
//!
//! Each subcommand connects a verified [`IpfClient`] and prints its result
//! either as a terminal table or as pretty JSON.

pub mod snapshots;
pub mod tables;

use crate::error::{IpfError, Result};
use crate::types::Row;
use prettytable::{Cell, Row as TableRow, Table};
use serde::Serialize;
use serde_json::Value;

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(IpfError::Serialization)?;
    println!("{}", json);
    Ok(())
}

/// Parse a `--filters` argument
pub fn parse_filters(filters: Option<&str>) -> Result<Option<Value>> {
    let Some(filters) = filters else {
        return Ok(None);
    };
    let value = serde_json::from_str::<Value>(filters)
        .map_err(|e| IpfError::InvalidArgument(format!("Invalid filters JSON: {}", e)))?;
    Ok(Some(value))
}

/// Column order for display: requested columns, else keys of the first row
pub fn display_columns(rows: &[Row], requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Render table rows, one cell per column
pub fn render_rows(rows: &[Row], columns: &[String]) -> Table {
    let mut table = Table::new();
    table.set_titles(TableRow::new(columns.iter().map(|c| Cell::new(c)).collect()));

    for row in rows {
        let cells = columns
            .iter()
            .map(|column| Cell::new(&cell_text(row.get(column))))
            .collect();
        table.add_row(TableRow::new(cells));
    }

    table
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Print rows as a table (with a count footer) or as JSON
pub fn output_rows(rows: &[Row], requested: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(rows);
    }

    if rows.is_empty() {
        println!("No rows returned");
        return Ok(());
    }

    let columns = display_columns(rows, requested);
    render_rows(rows, &columns).printstd();
    println!("\n{} rows", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<Row> {
        vec![
            json!({"hostname": "L1R1", "siteName": "L1", "uptime": 42, "vendor": null})
                .as_object()
                .cloned()
                .unwrap(),
            json!({"hostname": "L1R2", "siteName": "L1", "uptime": 7})
                .as_object()
                .cloned()
                .unwrap(),
        ]
    }

    #[test]
    fn test_parse_filters() {
        assert!(parse_filters(None).unwrap().is_none());
        let f = parse_filters(Some(r#"{"siteName": ["eq", "L1"]}"#)).unwrap().unwrap();
        assert_eq!(f["siteName"][0], "eq");
        assert!(parse_filters(Some("{oops")).is_err());
    }

    #[test]
    fn test_display_columns_prefers_requested() {
        let requested = vec!["siteName".to_string()];
        assert_eq!(display_columns(&rows(), &requested), requested);
        let discovered = display_columns(&rows(), &[]);
        assert!(discovered.contains(&"hostname".to_string()));
        assert!(display_columns(&[], &[]).is_empty());
    }

    #[test]
    fn test_render_rows() {
        let columns = vec!["hostname".to_string(), "uptime".to_string(), "vendor".to_string()];
        let rendered = render_rows(&rows(), &columns).to_string();
        assert!(rendered.contains("hostname"));
        assert!(rendered.contains("L1R2"));
        assert!(rendered.contains("42"));
        assert!(!rendered.contains("null"));
    }
}
