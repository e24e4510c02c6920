//! Set-Associative Cache Simulator.
//!
//! This module implements a single-level set-associative cache with true LRU
//! replacement and write-back accounting. Each access is decoded into tag and
//! set, looked up across the set's ways, and on a miss fills the LRU way,
//! charging the miss penalty and, when the victim is dirty, the write-back cost.

/// LRU victim selection.
pub mod lru;

use std::fmt;

use crate::common::addr::{AddressDecoder, PhysAddr};
use crate::common::data::AccessType;
use crate::common::error::GeometryError;
use crate::config::{CacheConfig, CacheGeometry, WritebackPolicy};
use crate::stats::CacheStats;

/// One way of one set.
///
/// A block with `valid == false` is never dirty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheBlock {
    /// Whether the block holds a line.
    pub valid: bool,
    /// Written since it was filled.
    pub dirty: bool,
    /// Upper address bits of the line held.
    pub tag: u64,
    /// Access number of the last hit or fill.
    pub recency: u64,
}

impl fmt::Display for CacheBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Valid Bit: {}\tDirty Bit: {}\tTag Bit: {}\tLRU Counter: {}",
            u8::from(self.valid),
            u8::from(self.dirty),
            self.tag,
            self.recency
        )
    }
}

/// Line pushed out of the cache by a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Eviction {
    /// Tag of the evicted line.
    pub tag: u64,
    /// Whether it was written back.
    pub dirty: bool,
}

/// What a single [`SetAssociativeCache::access`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// The line was present.
    pub hit: bool,
    /// Set the address mapped to.
    pub set_index: usize,
    /// Way that was hit or filled.
    pub way: usize,
    /// Live line displaced by the fill, if any.
    pub evicted: Option<Eviction>,
    /// Cycles added by this access, including the per-instruction base cost.
    pub cycles: u64,
}

/// Single-level set-associative cache.
///
/// Blocks live in one flat vector addressed by `set * associativity + way`.
/// The cache starts empty and is mutated only through [`access`](Self::access).
pub struct SetAssociativeCache {
    geometry: CacheGeometry,
    decoder: AddressDecoder,
    miss_penalty: u64,
    writeback_cycles: u64,
    writeback: WritebackPolicy,
    blocks: Vec<CacheBlock>,
    stats: CacheStats,
}

impl SetAssociativeCache {
    /// Creates an empty cache.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the configured shape is not valid.
    pub fn new(config: &CacheConfig) -> Result<Self, GeometryError> {
        let geometry = config.geometry()?;
        tracing::debug!(
            sets = geometry.num_sets(),
            ways = geometry.associativity(),
            block_bytes = geometry.block_bytes(),
            offset_bits = geometry.offset_bits(),
            index_bits = geometry.index_bits(),
            "cache constructed"
        );

        Ok(Self {
            decoder: AddressDecoder::new(&geometry),
            blocks: vec![CacheBlock::default(); geometry.num_blocks()],
            geometry,
            miss_penalty: config.miss_penalty,
            writeback_cycles: config.writeback_cycles,
            writeback: config.writeback,
            stats: CacheStats::default(),
        })
    }

    /// Applies one trace record to the cache.
    ///
    /// Always counts the access and its instructions, then either refreshes
    /// the hit block's recency (marking it dirty on a store) or fills the LRU
    /// way, charging the miss penalty and any write-back cost.
    ///
    /// Instruction and cycle counters saturate at `u64::MAX`.
    pub fn access(&mut self, op: AccessType, addr: PhysAddr, instructions: u64) -> AccessOutcome {
        self.stats.memory_accesses += 1;
        self.stats.total_instructions = self.stats.total_instructions.saturating_add(instructions);
        let now = self.stats.memory_accesses;
        let mut cycles = instructions;

        let decoded = self.decoder.decode(addr);
        let ways = self.geometry.associativity();
        let base = decoded.set_index * ways;
        let set = &mut self.blocks[base..base + ways];

        if let Some(way) = set.iter().position(|b| b.valid && b.tag == decoded.tag) {
            let block = &mut set[way];
            block.recency = now;
            match op {
                AccessType::Load => self.stats.load_hits += 1,
                AccessType::Store => {
                    self.stats.store_hits += 1;
                    block.dirty = true;
                }
            }
            self.stats.execution_cycles = self.stats.execution_cycles.saturating_add(cycles);
            tracing::trace!(%op, addr = addr.val(), set = decoded.set_index, way, "hit");
            return AccessOutcome {
                hit: true,
                set_index: decoded.set_index,
                way,
                evicted: None,
                cycles,
            };
        }

        match op {
            AccessType::Load => self.stats.load_misses += 1,
            AccessType::Store => self.stats.store_misses += 1,
        }
        cycles = cycles.saturating_add(self.miss_penalty);

        let way = lru::select_victim(set);
        let victim = set[way];
        let evicted = victim.valid.then_some(Eviction {
            tag: victim.tag,
            dirty: victim.dirty,
        });

        if victim.dirty {
            self.stats.dirty_evictions += 1;
        }
        let charge_writeback = match self.writeback {
            WritebackPolicy::DirtyEviction => victim.dirty,
            WritebackPolicy::EveryMiss => true,
        };
        if charge_writeback {
            cycles = cycles.saturating_add(self.writeback_cycles);
        }
        self.stats.execution_cycles = self.stats.execution_cycles.saturating_add(cycles);

        set[way] = CacheBlock {
            valid: true,
            dirty: op.is_store(),
            tag: decoded.tag,
            recency: now,
        };

        tracing::trace!(
            %op,
            addr = addr.val(),
            set = decoded.set_index,
            way,
            ?evicted,
            writeback = victim.dirty,
            "miss"
        );
        AccessOutcome {
            hit: false,
            set_index: decoded.set_index,
            way,
            evicted,
            cycles,
        }
    }

    /// Returns `true` if the line holding `addr` is present. Does not touch LRU state.
    pub fn contains(&self, addr: PhysAddr) -> bool {
        let decoded = self.decoder.decode(addr);
        self.set(decoded.set_index)
            .is_some_and(|ways| ways.iter().any(|b| b.valid && b.tag == decoded.tag))
    }

    /// Iterates over the sets in index order, each as a slice of its ways.
    pub fn sets(&self) -> impl ExactSizeIterator<Item = &[CacheBlock]> + '_ {
        self.blocks.chunks_exact(self.geometry.associativity())
    }

    /// The ways of set `index`, or `None` if out of range.
    pub fn set(&self, index: usize) -> Option<&[CacheBlock]> {
        if index >= self.geometry.num_sets() {
            return None;
        }
        let ways = self.geometry.associativity();
        self.blocks.get(index * ways..(index + 1) * ways)
    }

    /// A single block, or `None` if out of range.
    pub fn block(&self, set: usize, way: usize) -> Option<&CacheBlock> {
        self.set(set).and_then(|ways| ways.get(way))
    }

    /// Number of blocks currently holding a line.
    pub fn valid_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.valid).count()
    }

    /// Address of byte 0 of the line held by `block` in set `set_index`.
    pub fn line_address(&self, block: &CacheBlock, set_index: usize) -> PhysAddr {
        self.decoder.line_address(block.tag, set_index)
    }

    /// Validated shape of this cache.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Address decoder for this cache's geometry.
    pub const fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Consumes the cache, keeping only its counters.
    pub fn into_stats(self) -> CacheStats {
        self.stats
    }
}

impl fmt::Debug for SetAssociativeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetAssociativeCache")
            .field("geometry", &self.geometry)
            .field("miss_penalty", &self.miss_penalty)
            .field("writeback_cycles", &self.writeback_cycles)
            .field("writeback", &self.writeback)
            .field("valid_blocks", &self.valid_blocks())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
