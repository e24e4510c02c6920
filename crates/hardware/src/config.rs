//! Configuration for the cache simulator.
//!
//! This module defines the configuration value the driver builds once and hands
//! to the cache. It provides:
//! 1. **Defaults:** The classic 64 KiB, 2-way, 32-byte-block, 30-cycle-penalty setup.
//! 2. **Structures:** `CacheConfig` (deserializable) and the validated `CacheGeometry`.
//! 3. **Enums:** `WritebackPolicy`, choosing when the write-back cost is charged.
//!
//! Configuration is supplied as JSON or built from command-line flags; use
//! `CacheConfig::default()` for the baseline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::error::GeometryError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Ways per set.
    pub const ASSOCIATIVITY: u64 = 2;

    /// Block (line) size in bytes.
    pub const BLOCK_BYTES: u64 = 32;

    /// Total cache capacity in bytes (64 KiB).
    pub const SIZE_BYTES: u64 = 64 * 1024;

    /// Cycles charged for each miss.
    pub const MISS_PENALTY: u64 = 30;

    /// Extra cycles charged for writing a dirty block back.
    pub const WRITEBACK_CYCLES: u64 = 2;
}

/// When the write-back cost is added to the cycle count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritebackPolicy {
    /// Charge `writeback_cycles` only when the victim block is dirty.
    #[default]
    #[serde(alias = "DirtyEviction")]
    DirtyEviction,
    /// Charge `writeback_cycles` on every miss, dirty or not.
    ///
    /// Dirty evictions are still counted only for dirty victims.
    #[serde(alias = "EveryMiss")]
    EveryMiss,
}

/// Cache parameters as supplied by the user.
///
/// Nothing here is validated until [`CacheConfig::geometry`] is called, which
/// is what [`SetAssociativeCache::new`](crate::cache::SetAssociativeCache::new)
/// does.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::{CacheConfig, WritebackPolicy};
///
/// let json = r#"{ "associativity": 4, "size_bytes": 16384, "writeback": "every_miss" }"#;
/// let config = CacheConfig::from_json(json).unwrap();
/// assert_eq!(config.associativity, 4);
/// assert_eq!(config.block_bytes, 32);
/// assert_eq!(config.writeback, WritebackPolicy::EveryMiss);
///
/// let geometry = config.geometry().unwrap();
/// assert_eq!(geometry.num_sets(), 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Ways per set.
    #[serde(default = "CacheConfig::default_associativity")]
    pub associativity: u64,
    /// Block size in bytes; must be a power of two.
    #[serde(default = "CacheConfig::default_block_bytes")]
    pub block_bytes: u64,
    /// Total capacity in bytes; must be a multiple of `block_bytes * associativity`.
    #[serde(default = "CacheConfig::default_size_bytes")]
    pub size_bytes: u64,
    /// Cycles charged per miss.
    #[serde(default = "CacheConfig::default_miss_penalty")]
    pub miss_penalty: u64,
    /// Cycles charged per write-back.
    #[serde(default = "CacheConfig::default_writeback_cycles")]
    pub writeback_cycles: u64,
    /// When write-back cycles are charged.
    #[serde(default)]
    pub writeback: WritebackPolicy,
}

impl CacheConfig {
    fn default_associativity() -> u64 {
        defaults::ASSOCIATIVITY
    }

    fn default_block_bytes() -> u64 {
        defaults::BLOCK_BYTES
    }

    fn default_size_bytes() -> u64 {
        defaults::SIZE_BYTES
    }

    fn default_miss_penalty() -> u64 {
        defaults::MISS_PENALTY
    }

    fn default_writeback_cycles() -> u64 {
        defaults::WRITEBACK_CYCLES
    }

    /// Parses a JSON configuration document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validates the geometry parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] when associativity is zero, the block size
    /// or set count is not a power of two, the capacity is not an exact
    /// multiple of one set's footprint, or the cache would hold more than
    /// [`CacheGeometry::MAX_BLOCKS`] blocks.
    pub fn geometry(&self) -> Result<CacheGeometry, GeometryError> {
        CacheGeometry::new(self.associativity, self.block_bytes, self.size_bytes)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            associativity: defaults::ASSOCIATIVITY,
            block_bytes: defaults::BLOCK_BYTES,
            size_bytes: defaults::SIZE_BYTES,
            miss_penalty: defaults::MISS_PENALTY,
            writeback_cycles: defaults::WRITEBACK_CYCLES,
            writeback: WritebackPolicy::default(),
        }
    }
}

impl fmt::Display for CacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache parameters:")?;
        if self.size_bytes % 1024 == 0 {
            writeln!(f, "Cache Size (KB)\t\t\t{}", self.size_bytes / 1024)?;
        } else {
            writeln!(f, "Cache Size (bytes)\t\t{}", self.size_bytes)?;
        }
        writeln!(f, "Cache Associativity\t\t{}", self.associativity)?;
        writeln!(f, "Cache Block Size (bytes)\t{}", self.block_bytes)?;
        writeln!(f, "Miss penalty (cyc)\t\t{}", self.miss_penalty)
    }
}

/// Validated cache shape, fixed for the lifetime of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    associativity: usize,
    block_bytes: u64,
    size_bytes: u64,
    num_sets: usize,
    pub(crate) offset_bits: u32,
    pub(crate) index_bits: u32,
}

impl CacheGeometry {
    /// Largest number of blocks a cache may hold.
    pub const MAX_BLOCKS: u64 = 1 << 26;

    /// Validates and derives the set count and bit widths.
    ///
    /// `num_sets = size_bytes / (block_bytes * associativity)`,
    /// `offset_bits = log2(block_bytes)`, `index_bits = log2(num_sets)`.
    ///
    /// # Errors
    ///
    /// See [`CacheConfig::geometry`].
    pub fn new(associativity: u64, block_bytes: u64, size_bytes: u64) -> Result<Self, GeometryError> {
        if associativity == 0 {
            return Err(GeometryError::ZeroAssociativity);
        }
        if !block_bytes.is_power_of_two() {
            return Err(GeometryError::BlockSizeNotPowerOfTwo(block_bytes));
        }
        if size_bytes == 0 {
            return Err(GeometryError::ZeroCapacity);
        }
        let set_bytes = block_bytes.checked_mul(associativity);
        let num_sets = match set_bytes {
            Some(set_bytes) if size_bytes % set_bytes == 0 => size_bytes / set_bytes,
            _ => {
                return Err(GeometryError::SizeNotMultiple {
                    size_bytes,
                    set_bytes: set_bytes.unwrap_or(u64::MAX),
                });
            }
        };
        if !num_sets.is_power_of_two() {
            return Err(GeometryError::SetCountNotPowerOfTwo(num_sets));
        }
        let blocks = size_bytes / block_bytes;
        if blocks > Self::MAX_BLOCKS {
            return Err(GeometryError::TooManyBlocks {
                blocks,
                max: Self::MAX_BLOCKS,
            });
        }

        Ok(Self {
            associativity: associativity as usize,
            block_bytes,
            size_bytes,
            num_sets: num_sets as usize,
            offset_bits: block_bytes.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        })
    }

    /// Ways per set.
    pub const fn associativity(&self) -> usize {
        self.associativity
    }

    /// Block size in bytes.
    pub const fn block_bytes(&self) -> u64 {
        self.block_bytes
    }

    /// Total capacity in bytes.
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Total number of blocks (`num_sets * associativity`).
    pub const fn num_blocks(&self) -> usize {
        self.num_sets * self.associativity
    }

    /// `log2(block_bytes)`.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// `log2(num_sets)`.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }
}
