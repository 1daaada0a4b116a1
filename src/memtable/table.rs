//! MemTable implementation
//!
//! BTreeMap-based memtable with RwLock for concurrency.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::Entry;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{ChronoError, Result};
use crate::types::{Key, Timestamp, Value, DEFAULT_MEMTABLE_SIZE_BYTES};

/// Lifecycle of a MemTable. Only ever moves from `Mutable` to `Frozen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemTableState {
    /// Accepting puts and removes
    Mutable,

    /// Read-only, waiting to be flushed
    Frozen,
}

/// In-memory table for recent writes
///
/// ## Concurrency:
/// - `entries`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - `approximate_size`: Atomic counter, updated under the write lock but read
///   without it (`size_bytes`, `should_flush`)
/// - `immutable`: Atomic flag, read without the lock (`is_immutable`)
/// - All methods use `&self`; share with `Arc<MemTable>`
pub struct MemTable {
    /// Latest entry per key, values and tombstones alike
    entries: RwLock<BTreeMap<Key, Entry>>,

    /// Sum of `Entry::estimated_size` over all resident entries
    approximate_size: AtomicUsize,

    /// Fixed at construction
    max_size_bytes: usize,

    /// One-way freeze flag
    immutable: AtomicBool,

    /// Stamps writes that carry no explicit timestamp
    clock: Arc<dyn Clock>,
}

impl MemTable {
    /// Create a new empty MemTable that reports `should_flush` once its
    /// approximate size reaches `max_size_bytes`
    pub fn new(max_size_bytes: usize) -> Self {
        Self::with_clock(max_size_bytes, Arc::new(SystemClock::new()))
    }

    /// Create a new empty MemTable sized from `config`
    pub fn with_config(config: &Config) -> Self {
        Self::new(config.memtable_size_limit)
    }

    /// Create a new empty MemTable stamping writes from `clock`
    pub fn with_clock(max_size_bytes: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            approximate_size: AtomicUsize::new(0),
            max_size_bytes,
            immutable: AtomicBool::new(false),
            clock,
        }
    }

    // =========================================================================
    // Writes (write lock)
    // =========================================================================

    /// Put a key-value pair stamped with the current time
    ///
    /// Returns false if the MemTable is frozen; nothing is written then.
    pub fn put(&self, key: impl Into<Key>, value: impl Into<Value>) -> bool {
        let timestamp = self.clock.now_micros();
        self.put_at(key, value, timestamp)
    }

    /// Put a key-value pair with a caller-supplied timestamp
    ///
    /// The timestamp is stored as given. It does not decide which write
    /// wins: a later call overwrites an earlier one even with an older stamp.
    pub fn put_at(&self, key: impl Into<Key>, value: impl Into<Value>, timestamp: Timestamp) -> bool {
        self.apply(Entry::put(key, value, timestamp))
    }

    /// Delete a key stamped with the current time (inserts tombstone)
    ///
    /// A tombstone is written even if the key was never put, so it can shadow
    /// older versions in already-flushed tables. Returns false if frozen.
    pub fn remove(&self, key: impl Into<Key>) -> bool {
        let timestamp = self.clock.now_micros();
        self.remove_at(key, timestamp)
    }

    /// Delete a key with a caller-supplied timestamp (inserts tombstone)
    pub fn remove_at(&self, key: impl Into<Key>, timestamp: Timestamp) -> bool {
        self.apply(Entry::tombstone(key, timestamp))
    }

    /// Like `put`, but reports a frozen MemTable as `ChronoError::Immutable`
    pub fn try_put(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        if self.put(key, value) {
            Ok(())
        } else {
            Err(ChronoError::Immutable)
        }
    }

    /// Like `remove`, but reports a frozen MemTable as `ChronoError::Immutable`
    pub fn try_remove(&self, key: impl Into<Key>) -> Result<()> {
        if self.remove(key) {
            Ok(())
        } else {
            Err(ChronoError::Immutable)
        }
    }

    /// Insert or replace the entry for its key, adjusting the size by delta
    fn apply(&self, entry: Entry) -> bool {
        // Cheap rejection without touching the lock
        if self.is_immutable() {
            tracing::trace!("Rejected {} on frozen memtable", entry.kind);
            return false;
        }

        let mut entries = self.entries.write();

        // make_immutable flips the flag under this lock; re-check so no write
        // lands after the freeze has returned
        if self.is_immutable() {
            tracing::trace!("Rejected {} on frozen memtable", entry.kind);
            return false;
        }

        let new_size = entry.estimated_size();
        match entries.insert(entry.key.clone(), entry) {
            Some(old) => self.adjust_size(old.estimated_size(), new_size),
            None => {
                self.approximate_size.fetch_add(new_size, Ordering::AcqRel);
            }
        }

        true
    }

    fn adjust_size(&self, old_size: usize, new_size: usize) {
        if new_size >= old_size {
            self.approximate_size
                .fetch_add(new_size - old_size, Ordering::AcqRel);
        } else {
            self.approximate_size
                .fetch_sub(old_size - new_size, Ordering::AcqRel);
        }
    }

    /// Clear all entries and reset the size to zero
    ///
    /// Not gated by the freeze flag: a frozen MemTable can still be cleared.
    pub fn clear(&self) {
        let mut entries = self.entries.write();

        if self.is_immutable() {
            tracing::warn!(
                "Clearing frozen memtable with {} entries",
                entries.len()
            );
        } else {
            tracing::debug!("Clearing memtable with {} entries", entries.len());
        }

        entries.clear();
        self.approximate_size.store(0, Ordering::Release);
    }

    // =========================================================================
    // Reads (read lock)
    // =========================================================================

    /// Get the live value for a key
    ///
    /// None if the key was never written or its latest entry is a tombstone.
    pub fn get(&self, key: &[u8]) -> Option<Value> {
        let entries = self.entries.read();
        match entries.get(key) {
            Some(entry) if !entry.is_tombstone() => Some(entry.value.clone()),
            _ => None,
        }
    }

    /// Get the latest entry for a key, tombstones included
    pub fn get_entry(&self, key: &[u8]) -> Option<Entry> {
        self.entries.read().get(key).cloned()
    }

    /// Get the entry count (tombstones included)
    pub fn entry_count(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the MemTable holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every entry in ascending key order (for flush)
    pub fn get_all_entries(&self) -> Vec<Entry> {
        self.entries.read().values().cloned().collect()
    }

    /// Snapshot of entries with `start_key <= key < end_key`, ascending
    ///
    /// Tombstones are included. An empty or inverted range yields nothing.
    pub fn get_range(&self, start_key: &[u8], end_key: &[u8]) -> Vec<Entry> {
        if start_key >= end_key {
            return Vec::new();
        }

        let entries = self.entries.read();
        entries
            .range::<[u8], _>((Bound::Included(start_key), Bound::Excluded(end_key)))
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    // =========================================================================
    // Size and lifecycle (lock-free)
    // =========================================================================

    /// Get approximate size in bytes
    pub fn size_bytes(&self) -> usize {
        self.approximate_size.load(Ordering::Acquire)
    }

    /// Size limit this MemTable was created with
    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    /// Check if the approximate size has reached the limit
    ///
    /// Advisory only: writes keep succeeding until `make_immutable` is called.
    pub fn should_flush(&self) -> bool {
        self.size_bytes() >= self.max_size_bytes
    }

    /// Freeze the MemTable. Idempotent; there is no way back.
    ///
    /// Waits for any in-flight write, so once this returns the contents are
    /// final and safe to drain with `get_all_entries`.
    pub fn make_immutable(&self) {
        let entries = self.entries.write();

        if !self.immutable.swap(true, Ordering::AcqRel) {
            tracing::debug!(
                "Memtable frozen: {} entries, ~{} bytes",
                entries.len(),
                self.size_bytes()
            );
        }
    }

    pub fn is_immutable(&self) -> bool {
        self.immutable.load(Ordering::Acquire)
    }

    pub fn state(&self) -> MemTableState {
        if self.is_immutable() {
            MemTableState::Frozen
        } else {
            MemTableState::Mutable
        }
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new(DEFAULT_MEMTABLE_SIZE_BYTES)
    }
}
