// src/error.rs

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of the two configured columns a lookup was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    Key,
    Value,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Key => f.write_str("key"),
            ColumnRole::Value => f.write_str("value"),
        }
    }
}

/// Everything a caller of the inverter has to switch on.
///
/// `DownstreamParseFailure` never comes out of `invert` itself; the CSV loader
/// produces it so both failure paths share one result type.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InvertError {
    #[error("could not find {which} column `{searched}` (available: {})", .available.join(", "))]
    ColumnNotFound {
        which: ColumnRole,
        searched: String,
        available: Vec<String>,
    },

    #[error("failed to parse CSV: {message}")]
    DownstreamParseFailure { message: String },
}

impl InvertError {
    pub fn parse_failure(message: impl Into<String>) -> Self {
        InvertError::DownstreamParseFailure {
            message: message.into(),
        }
    }
}
