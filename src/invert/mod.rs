// src/invert/mod.rs

pub mod types;

pub use types::{ColumnSpec, InvertedMap, Table};

use crate::error::{ColumnRole, InvertError};
use tracing::{debug, warn};

/// Index of the first header exactly equal to `name`.
pub fn resolve_column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Split a cell on `'\n'` and drop the empty pieces. Order and duplicates are kept.
pub fn split_members(cell: &str) -> Vec<&str> {
    cell.split('\n').filter(|s| !s.is_empty()).collect()
}

fn require_column(headers: &[String], name: &str, which: ColumnRole) -> Result<usize, InvertError> {
    resolve_column(headers, name).ok_or_else(|| InvertError::ColumnNotFound {
        which,
        searched: name.to_string(),
        available: headers.to_vec(),
    })
}

/// Build the member → keys map for `table`.
///
/// - Both columns are resolved before any row is read; the first miss is returned.
/// - A row too short to hold a resolved column reads that cell as `""`.
/// - Rows whose value cell has no members contribute nothing.
/// - Key cells are appended once per occurrence of the member, in row order.
pub fn invert(table: &Table, spec: &ColumnSpec) -> Result<InvertedMap, InvertError> {
    let key_idx = require_column(&table.headers, &spec.key, ColumnRole::Key)?;
    let value_idx = require_column(&table.headers, &spec.value, ColumnRole::Value)?;
    debug!(
        key = %spec.key,
        key_idx,
        value = %spec.value,
        value_idx,
        rows = table.rows.len(),
        "resolved columns"
    );

    let mut inverted = InvertedMap::default();
    let mut short_rows = 0usize;

    for row in &table.rows {
        if row.len() <= key_idx.max(value_idx) {
            short_rows += 1;
        }
        let key = row.get(key_idx).map(String::as_str).unwrap_or("");
        let cell = row.get(value_idx).map(String::as_str).unwrap_or("");

        for member in split_members(cell) {
            inverted.push(member, key);
        }
    }

    if short_rows > 0 {
        warn!(
            short_rows,
            "some rows are missing the key or value cell; treated as empty"
        );
    }
    debug!(members = inverted.len(), "inverted");

    Ok(inverted)
}
