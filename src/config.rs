//! Configuration for ChronoLog
//!
//! Centralized configuration with sensible defaults.

use crate::error::{ChronoError, Result};
use crate::types::DEFAULT_MEMTABLE_SIZE_BYTES;

/// Main configuration for a ChronoLog memtable
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // MemTable Configuration
    // -------------------------------------------------------------------------
    /// Approximate size (in bytes) at which `should_flush` starts reporting true.
    /// Writes are still accepted past this point until the memtable is frozen.
    pub memtable_size_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            memtable_size_limit: DEFAULT_MEMTABLE_SIZE_BYTES, // 4 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values no memtable can work with
    pub fn validate(&self) -> Result<()> {
        if self.memtable_size_limit == 0 {
            return Err(ChronoError::Config(
                "memtable_size_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the memtable size limit (in bytes)
    pub fn memtable_size_limit(mut self, size: usize) -> Self {
        self.config.memtable_size_limit = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
