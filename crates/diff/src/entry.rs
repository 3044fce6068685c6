use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Key of a diff entry: an index into a sequence or a member name of an object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffKey {
    /// Position in a list, a string's lines or a line's chars
    #[display(fmt = "{}", _0)]
    Index(usize),

    /// Member of an object
    #[display(fmt = "`{}`", _0)]
    Name(String),
}

impl DiffKey {
    /// The sequence index, if this key addresses a sequence
    pub fn as_index(&self) -> Option<usize> {
        match self {
            DiffKey::Index(index) => Some(*index),
            DiffKey::Name(_) => None,
        }
    }

    /// The member name, if this key addresses an object
    pub fn as_name(&self) -> Option<&str> {
        match self {
            DiffKey::Index(_) => None,
            DiffKey::Name(name) => Some(name),
        }
    }
}

impl From<&str> for DiffKey {
    fn from(name: &str) -> Self {
        DiffKey::Name(name.to_string())
    }
}

/// The operation tag of a diff entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DiffOp {
    #[display(fmt = "addrange")]
    AddRange,
    #[display(fmt = "removerange")]
    RemoveRange,
    #[display(fmt = "add")]
    Add,
    #[display(fmt = "remove")]
    Remove,
    #[display(fmt = "replace")]
    Replace,
    #[display(fmt = "patch")]
    Patch,
}

/// Values inserted by an `addrange` entry.
///
/// Line and list level entries carry a list of values; character level
/// entries inside a patched line carry a plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeValues {
    Text(String),
    Items(Vec<Value>),
}

impl RangeValues {
    /// Number of inserted items, counting chars for text
    pub fn len(&self) -> usize {
        match self {
            RangeValues::Text(text) => text.chars().count(),
            RangeValues::Items(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated text of the inserted values, or `None` if any item is
    /// not a string
    pub fn to_text(&self) -> Option<String> {
        match self {
            RangeValues::Text(text) => Some(text.clone()),
            RangeValues::Items(items) => items
                .iter()
                .map(|item| item.as_str())
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.concat()),
        }
    }
}

/// A structural edit operation over a JSON-like value.
///
/// Serializes to the nbdime wire format, e.g.
/// `{"op": "removerange", "key": 3, "length": 2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DiffEntry {
    /// Insert values before the base item at `key`
    AddRange {
        key: DiffKey,
        #[serde(rename = "valuelist")]
        values: RangeValues,
    },

    /// Remove `length` base items starting at `key`
    RemoveRange { key: DiffKey, length: usize },

    /// Add a new member to an object
    Add { key: DiffKey, value: Value },

    /// Remove a member from an object
    Remove { key: DiffKey },

    /// Replace a member wholesale
    Replace { key: DiffKey, value: Value },

    /// Recursively edit the item at `key`
    Patch { key: DiffKey, diff: Vec<DiffEntry> },
}

impl DiffEntry {
    pub fn add_range(key: impl Into<DiffKey>, values: RangeValues) -> Self {
        DiffEntry::AddRange {
            key: key.into(),
            values,
        }
    }

    pub fn remove_range(key: impl Into<DiffKey>, length: usize) -> Self {
        DiffEntry::RemoveRange {
            key: key.into(),
            length,
        }
    }

    pub fn add(key: impl Into<DiffKey>, value: Value) -> Self {
        DiffEntry::Add {
            key: key.into(),
            value,
        }
    }

    pub fn remove(key: impl Into<DiffKey>) -> Self {
        DiffEntry::Remove { key: key.into() }
    }

    pub fn replace(key: impl Into<DiffKey>, value: Value) -> Self {
        DiffEntry::Replace {
            key: key.into(),
            value,
        }
    }

    pub fn patch(key: impl Into<DiffKey>, diff: Vec<DiffEntry>) -> Self {
        DiffEntry::Patch {
            key: key.into(),
            diff,
        }
    }

    /// The key this entry applies to
    pub fn key(&self) -> &DiffKey {
        match self {
            DiffEntry::AddRange { key, .. }
            | DiffEntry::RemoveRange { key, .. }
            | DiffEntry::Add { key, .. }
            | DiffEntry::Remove { key }
            | DiffEntry::Replace { key, .. }
            | DiffEntry::Patch { key, .. } => key,
        }
    }

    /// The operation tag of this entry
    pub fn op(&self) -> DiffOp {
        match self {
            DiffEntry::AddRange { .. } => DiffOp::AddRange,
            DiffEntry::RemoveRange { .. } => DiffOp::RemoveRange,
            DiffEntry::Add { .. } => DiffOp::Add,
            DiffEntry::Remove { .. } => DiffOp::Remove,
            DiffEntry::Replace { .. } => DiffOp::Replace,
            DiffEntry::Patch { .. } => DiffOp::Patch,
        }
    }
}

/// Parse a diff list in the nbdime JSON format
pub fn parse_diff(json: &str) -> Result<Vec<DiffEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Result of looking up a key in a diff list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyLookup<'a> {
    /// No entry touches the key
    NotFound,
    /// The member was added with this value
    Added(&'a Value),
    /// The member was removed
    Removed,
    /// The member was replaced by this value
    Replaced(&'a Value),
    /// The member was edited by this nested diff
    Patched(&'a [DiffEntry]),
    /// A range insertion or removal starts at the key
    Range(&'a DiffEntry),
}

impl<'a> KeyLookup<'a> {
    /// The nested diff, if the member can be descended into
    pub fn nested(self) -> Option<&'a [DiffEntry]> {
        match self {
            KeyLookup::Patched(diff) => Some(diff),
            _ => None,
        }
    }
}

/// Find the entry addressing `key` in `diff`.
///
/// A `patch` entry wins over range entries sharing its key, since it is the
/// only one that can be descended into.
pub fn get_diff_key<'a>(diff: &'a [DiffEntry], key: &DiffKey) -> KeyLookup<'a> {
    let mut found = KeyLookup::NotFound;
    for entry in diff.iter().filter(|entry| entry.key() == key) {
        let lookup = match entry {
            DiffEntry::Patch { diff, .. } => return KeyLookup::Patched(diff),
            DiffEntry::Add { value, .. } => KeyLookup::Added(value),
            DiffEntry::Remove { .. } => KeyLookup::Removed,
            DiffEntry::Replace { value, .. } => KeyLookup::Replaced(value),
            DiffEntry::AddRange { .. } | DiffEntry::RemoveRange { .. } => KeyLookup::Range(entry),
        };
        if found == KeyLookup::NotFound {
            found = lookup;
        }
    }
    found
}
