//! Error types for ChronoLog
//!
//! The memtable's core API reports rejection through plain booleans and
//! `Option`s. This error type covers the fallible wrappers built on top of
//! it (`try_put` / `try_remove`) and configuration validation.

use thiserror::Error;

/// Result type alias using ChronoError
pub type Result<T> = std::result::Result<T, ChronoError>;

/// Unified error type for ChronoLog operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChronoError {
    // -------------------------------------------------------------------------
    // MemTable Errors
    // -------------------------------------------------------------------------
    /// A mutation was attempted on a frozen memtable. Expected during flush
    /// rotation: route the write to the current active memtable.
    #[error("MemTable is immutable, write rejected")]
    Immutable,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
