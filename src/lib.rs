//! # ChronoLog
//!
//! The in-memory write buffer ("memtable") at the front of an LSM-tree
//! storage engine:
//! - Ordered key space with one latest version per key
//! - Tombstones for deletes, kept so they can shadow flushed data
//! - Approximate size tracking to signal when a flush is due
//! - One-way freeze so a flush thread can drain it while writes move on
//!
//! ## Architecture Overview
//!
//! ```text
//!        writers / readers (any thread)
//!                   │
//! ┌─────────────────▼───────────────────────────────────────────┐
//! │                        MemTable                              │
//! │  ┌──────────────────────────┐   ┌─────────────────────────┐  │
//! │  │ RwLock<BTreeMap<Key,     │   │ AtomicUsize  size       │  │
//! │  │        Entry>>           │   │ AtomicBool   immutable  │  │
//! │  │ put/remove/clear: write  │   │ size_bytes, should_flush│  │
//! │  │ get/scan:         read   │   │ is_immutable: lock-free │  │
//! │  └──────────────────────────┘   └─────────────────────────┘  │
//! └─────────────────┬───────────────────────────────────────────┘
//!                   │ make_immutable + get_all_entries
//!                   ▼
//!           flush driver (SSTable writer, external)
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod types;

pub mod clock;
pub mod memtable;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ChronoError, Result};
pub use config::Config;
pub use clock::{Clock, ManualClock, SystemClock};
pub use memtable::{Entry, EntryKind, MemTable, MemTableState};
pub use types::{Key, Timestamp, Value, DEFAULT_MEMTABLE_SIZE_BYTES, ENTRY_OVERHEAD};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ChronoLog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
