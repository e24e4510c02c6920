//! Physical addresses and tag/index/offset decomposition.
//!
//! This module splits a trace address into the three fields a set-associative
//! cache cares about. It provides:
//! 1. **Type Safety:** A `PhysAddr` newtype so raw counters and addresses are not mixed.
//! 2. **Decomposition:** `AddressDecoder` computes tag, set index and block offset.
//! 3. **Recomposition:** The inverse operation, used to rebuild a line address from a block.

use std::fmt;

use crate::config::CacheGeometry;

/// A physical address as it appears in the memory trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::LowerHex for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// The three fields of an address as seen by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// Upper address bits identifying the memory line.
    pub tag: u64,
    /// Set the line maps to.
    pub set_index: usize,
    /// Byte offset within the block. Not used by the replacement logic.
    pub block_offset: u64,
}

/// Stateless address splitter for one cache geometry.
///
/// Holds only the shift amounts and masks; construct it from a validated
/// [`CacheGeometry`] so that block size and set count are powers of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    /// Builds a decoder for the given geometry.
    pub const fn new(geometry: &CacheGeometry) -> Self {
        Self {
            offset_bits: geometry.offset_bits,
            index_bits: geometry.index_bits,
        }
    }

    /// Number of low address bits selecting a byte within a block.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Number of address bits selecting the set.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Splits `addr` into tag, set index and block offset.
    ///
    /// `block_offset = addr & (block_bytes - 1)`,
    /// `set_index = (addr >> offset_bits) & (num_sets - 1)`,
    /// `tag = addr >> (offset_bits + index_bits)`.
    #[inline]
    pub fn decode(&self, addr: PhysAddr) -> DecodedAddr {
        let raw = addr.val();
        DecodedAddr {
            tag: shr(raw, self.offset_bits + self.index_bits),
            set_index: (shr(raw, self.offset_bits) & low_mask(self.index_bits)) as usize,
            block_offset: raw & low_mask(self.offset_bits),
        }
    }

    /// Rebuilds the address that `decoded` was produced from.
    #[inline]
    pub fn recompose(&self, decoded: &DecodedAddr) -> PhysAddr {
        let tag = shl(decoded.tag, self.offset_bits + self.index_bits);
        let index = shl(decoded.set_index as u64, self.offset_bits);
        PhysAddr(tag | index | decoded.block_offset)
    }

    /// Address of byte 0 of the line identified by `tag` in `set_index`.
    pub fn line_address(&self, tag: u64, set_index: usize) -> PhysAddr {
        self.recompose(&DecodedAddr {
            tag,
            set_index,
            block_offset: 0,
        })
    }
}

/// Convenience form of [`AddressDecoder::decode`] for one-off lookups.
pub fn decode(addr: PhysAddr, geometry: &CacheGeometry) -> DecodedAddr {
    AddressDecoder::new(geometry).decode(addr)
}

// Shifts by 64 or more are defined as producing zero rather than panicking.
#[inline(always)]
fn shr(value: u64, bits: u32) -> u64 {
    value.checked_shr(bits).unwrap_or(0)
}

#[inline(always)]
fn shl(value: u64, bits: u32) -> u64 {
    value.checked_shl(bits).unwrap_or(0)
}

#[inline(always)]
fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}
