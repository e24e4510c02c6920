//! Trace-driven set-associative cache simulator library.
//!
//! This crate models a single-level cache fed by a memory trace:
//! 1. **Common:** Addresses, tag/index/offset decoding, access types and errors.
//! 2. **Config:** Cache parameters and the validated geometry derived from them.
//! 3. **Cache:** Per-set hit detection, true LRU replacement and dirty write-back accounting.
//! 4. **Stats:** Hit/miss counters, cycle count and derived rates.
//! 5. **Simulation:** Trace parsing and the run loop.

/// Common types (addresses, decoder, access types, errors).
pub mod common;
/// Cache configuration and geometry.
pub mod config;
/// The set-associative cache model.
pub mod cache;
/// Trace reader and simulator loop.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Cache parameters; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// The cache model.
pub use crate::cache::SetAssociativeCache;
/// Trace-driven run loop.
pub use crate::sim::Simulator;
/// Accumulated counters.
pub use crate::stats::CacheStats;
