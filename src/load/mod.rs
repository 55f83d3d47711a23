// src/load/mod.rs
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use encoding_rs::Encoding;
use std::{fs, io::Read, path::Path};
use tracing::{debug, warn};

use crate::error::InvertError;
use crate::invert::Table;

/// Encoding the exporting tool writes by default.
pub const DEFAULT_ENCODING_LABEL: &str = "windows-31j";

/// Look up an encoding by its WHATWG label (`windows-31j`, `shift_jis`, `utf-8`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| anyhow!("unknown encoding label `{}`", label))
}

/// Decode `bytes` as `encoding`, unless a BOM says otherwise.
/// Malformed sequences become U+FFFD. Returns the encoding actually used.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> (String, &'static Encoding) {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            encoding = used.name(),
            "input contained malformed sequences; replaced with U+FFFD"
        );
    }
    if used != encoding {
        debug!(requested = encoding.name(), used = used.name(), "BOM overrides encoding");
    }
    (text.into_owned(), used)
}

/// Read CSV records from `rdr`: the first record is the header, the rest are the body.
///
/// Empty lines are skipped and records may have any number of fields.
pub fn read_table<R: Read>(rdr: R) -> Result<Table, InvertError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(rdr);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| {
            InvertError::parse_failure(format!("record {}: {}", idx + 1, e))
        })?;
        let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if headers.is_none() {
            headers = Some(cells);
        } else {
            rows.push(cells);
        }
    }

    let headers = headers.unwrap_or_default();
    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
    Ok(Table::new(headers, rows))
}

pub fn parse_table(text: &str) -> Result<Table, InvertError> {
    read_table(text.as_bytes())
}

/// Read, decode and parse the CSV file at `path`.
#[tracing::instrument(level = "info", skip(path, encoding), fields(path = %path.as_ref().display(), encoding = encoding.name()))]
pub fn load_table<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<Table> {
    let bytes = fs::read(&path)
        .with_context(|| format!("Failed to read {:?}", path.as_ref()))?;
    let (text, _) = decode(&bytes, encoding);
    let table = parse_table(&text)?;
    Ok(table)
}
