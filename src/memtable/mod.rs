//! MemTable Module
//!
//! In-memory write buffer at the front of the LSM-tree.
//!
//! ## Responsibilities
//! - Fast reads and writes in memory
//! - Many concurrent readers, one writer at a time
//! - Track approximate size for flush triggers
//! - Ordered iteration and range scans for SSTable creation
//! - One-way freeze so a flush thread can drain it safely
//!
//! ## Data Structure Choice
//! BTreeMap wrapped in a parking_lot RwLock:
//! - Ordered keys (required for SSTable generation)
//! - One version per key, last writer wins
//! - Size counter and freeze flag live outside the lock (atomics), so
//!   flush polling never contends with readers or writers of the map

mod entry;
mod table;

pub use entry::{Entry, EntryKind};
pub use table::{MemTable, MemTableState};
