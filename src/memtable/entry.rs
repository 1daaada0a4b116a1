//! MemTable entry definitions
//!
//! Defines the unit of state held per key: a value or a tombstone, stamped
//! with the time of the write.

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;

use crate::types::{Key, Timestamp, Value, ENTRY_OVERHEAD};

/// Kind of write that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryKind {
    /// A live value
    Put = 0,

    /// A tombstone (deleted key)
    Delete = 1,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Put => write!(f, "PUT"),
            EntryKind::Delete => write!(f, "DELETE"),
        }
    }
}

/// Latest version of a key held in the MemTable
///
/// Ordering: (key ASC, timestamp DESC), so when several buffers are merged
/// the newest version of a key comes first. Two entries are equal when key
/// and timestamp match; kind and value take no part in comparisons.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: Key,

    /// Empty for tombstones
    pub value: Value,

    pub kind: EntryKind,

    pub timestamp: Timestamp,
}

impl Entry {
    /// A live value entry
    pub fn put(key: impl Into<Key>, value: impl Into<Value>, timestamp: Timestamp) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: EntryKind::Put,
            timestamp,
        }
    }

    /// A tombstone entry, always with an empty payload
    pub fn tombstone(key: impl Into<Key>, timestamp: Timestamp) -> Self {
        Self {
            key: key.into(),
            value: Bytes::new(),
            kind: EntryKind::Delete,
            timestamp,
        }
    }

    pub fn is_tombstone(&self) -> bool {
        self.kind == EntryKind::Delete
    }

    /// Approximate bytes this entry accounts for in the MemTable
    pub fn estimated_size(&self) -> usize {
        self.key.len() + self.value.len() + ENTRY_OVERHEAD
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.timestamp == other.timestamp
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| other.timestamp.cmp(&self.timestamp))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
