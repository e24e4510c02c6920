//! Least Recently Used (LRU) victim selection.
//!
//! Every block carries the access number of its last touch. The victim in a
//! full set is the block with the smallest stamp; an empty way is always taken
//! before any live block is evicted.
//!
//! # Performance
//!
//! - **Time Complexity:** O(W) per miss, where W is the associativity
//! - **Space Complexity:** one `u64` stamp per block, stored in the block itself

use super::CacheBlock;

/// Picks the way to fill in `ways`.
///
/// Returns the first invalid way if there is one. Otherwise returns the way
/// with the smallest `recency`; ties go to the lowest way index.
///
/// `ways` must be non-empty, which a validated geometry guarantees.
pub fn select_victim(ways: &[CacheBlock]) -> usize {
    let mut lru_way = 0;
    let mut min_recency = u64::MAX;

    for (way, block) in ways.iter().enumerate() {
        if !block.valid {
            return way;
        }
        if block.recency < min_recency {
            min_recency = block.recency;
            lru_way = way;
        }
    }
    lru_way
}
