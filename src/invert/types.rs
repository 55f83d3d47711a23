// src/invert/types.rs

use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// A parsed CSV document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names from the first record. Names may repeat.
    pub headers: Vec<String>,
    /// Every record after the header, as-is. Rows may be shorter or longer
    /// than `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// The pair of column names to invert on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub key: String,
    pub value: String,
}

impl ColumnSpec {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Member → every key cell whose value cell listed it.
///
/// Iteration is in ascending ordinal (code point) order of the member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvertedMap(BTreeMap<String, Vec<String>>);

impl InvertedMap {
    /// Append `key` to the list for `member`, creating the entry on first use.
    pub(crate) fn push(&mut self, member: &str, key: &str) {
        match self.0.get_mut(member) {
            Some(keys) => keys.push(key.to_string()),
            None => {
                self.0.insert(member.to_string(), vec![key.to_string()]);
            }
        }
    }

    pub fn get(&self, member: &str) -> Option<&[String]> {
        self.0.get(member).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl<'a> IntoIterator for &'a InvertedMap {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
