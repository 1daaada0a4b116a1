//! Shared type aliases and constants

use bytes::Bytes;

/// Raw key bytes.
pub type Key = Bytes;

/// Raw value bytes. Empty for tombstones.
pub type Value = Bytes;

/// Write timestamp in microseconds.
pub type Timestamp = u64;

/// Default memtable size limit: 4 MB.
pub const DEFAULT_MEMTABLE_SIZE_BYTES: usize = 4 * 1024 * 1024;

/// Fixed bookkeeping overhead charged to every entry in the size estimate
/// (map node, entry header, timestamp).
pub const ENTRY_OVERHEAD: usize = 32;
