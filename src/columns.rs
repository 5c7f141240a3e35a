//! Column discovery through the server's validation errors
//!
//! The table API has no schema endpoint. Posting `columns: ["*"]` makes the
//! server answer 422 with a message that lists the valid columns:
//!
//! ```text
//! "columns[0]" must be one of [id, siteName, siteKey, devicesCount]
//! ```
//!
//! This depends entirely on the server keeping that message format. Any
//! other shape is reported as [`IpfError::Protocol`] rather than guessed at.

use crate::error::{IpfError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Column selector the server is guaranteed to reject
pub const WILDCARD_COLUMN: &str = "*";

fn column_list_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // quoted field name, anything, then a bracketed list closing the message
        Regex::new(r#"^".*".*\[(.*)\]$"#).expect("valid column list regex")
    })
}

/// Extract the column names embedded in a 422 validation message
///
/// # Errors
///
/// Returns [`IpfError::Protocol`] if the message does not end with a
/// bracket-delimited list or the list is empty.
///
/// # Examples
///
/// ```
/// use ipfabric_client::columns::parse_column_list;
///
/// let cols = parse_column_list(r#""columns[0]" must be one of [colA, colB, colC]"#).unwrap();
/// assert_eq!(cols, vec!["colA", "colB", "colC"]);
/// ```
pub fn parse_column_list(message: &str) -> Result<Vec<String>> {
    let captures = column_list_regex()
        .captures(message.trim())
        .ok_or_else(|| {
            IpfError::Protocol(format!(
                "column discovery message has unexpected format: {}",
                message
            ))
        })?;

    let columns: Vec<String> = captures[1]
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if columns.is_empty() {
        return Err(IpfError::Protocol(format!(
            "column discovery message lists no columns: {}",
            message
        ))
        .into());
    }

    Ok(columns)
}
