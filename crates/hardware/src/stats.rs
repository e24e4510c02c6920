//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters mutated by every cache access. It provides:
//! 1. **Counters:** Accesses, instructions, load/store hits and misses, dirty evictions, cycles.
//! 2. **Derived metrics:** Miss rates, CPI and average memory access time.
//! 3. **Reporting:** The plain-text results block and a serializable snapshot.
//!
//! Derived metrics return `None` when their denominator is zero, for example
//! after an empty trace, and print as `undefined`.

use std::fmt;

use serde::Serialize;

/// Counters accumulated over one simulation run.
///
/// All fields only ever grow; the cache is the only writer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of trace records applied.
    pub memory_accesses: u64,
    /// Sum of the per-record instruction counts.
    pub total_instructions: u64,
    /// Loads that found their line present.
    pub load_hits: u64,
    /// Loads that had to fill a block.
    pub load_misses: u64,
    /// Stores that found their line present.
    pub store_hits: u64,
    /// Stores that had to fill a block.
    pub store_misses: u64,
    /// Victims evicted with the dirty bit set.
    pub dirty_evictions: u64,
    /// One cycle per instruction plus miss and write-back penalties.
    pub execution_cycles: u64,
}

impl CacheStats {
    /// Loads plus stores that hit.
    pub const fn total_hits(&self) -> u64 {
        self.load_hits + self.store_hits
    }

    /// Loads plus stores that missed.
    pub const fn total_misses(&self) -> u64 {
        self.load_misses + self.store_misses
    }

    /// Cycles spent beyond the one-per-instruction base cost.
    pub const fn memory_stall_cycles(&self) -> u64 {
        self.execution_cycles.saturating_sub(self.total_instructions)
    }

    /// `(load_misses + store_misses) / memory_accesses`.
    pub fn overall_miss_rate(&self) -> Option<f64> {
        ratio(self.total_misses(), self.memory_accesses)
    }

    /// `load_misses / (load_hits + load_misses)`.
    pub fn read_miss_rate(&self) -> Option<f64> {
        ratio(self.load_misses, self.load_hits + self.load_misses)
    }

    /// `store_misses / (store_hits + store_misses)`.
    pub fn write_miss_rate(&self) -> Option<f64> {
        ratio(self.store_misses, self.store_hits + self.store_misses)
    }

    /// `(execution_cycles - total_instructions) / total_instructions`.
    pub fn memory_cpi(&self) -> Option<f64> {
        ratio(self.memory_stall_cycles(), self.total_instructions)
    }

    /// `execution_cycles / total_instructions`.
    pub fn total_cpi(&self) -> Option<f64> {
        ratio(self.execution_cycles, self.total_instructions)
    }

    /// `(execution_cycles - total_instructions) / memory_accesses`.
    pub fn average_memory_access_time(&self) -> Option<f64> {
        ratio(self.memory_stall_cycles(), self.memory_accesses)
    }

    /// Snapshot of the counters together with every derived metric.
    pub fn report(&self) -> StatsReport {
        StatsReport {
            counters: self.clone(),
            overall_miss_rate: self.overall_miss_rate(),
            read_miss_rate: self.read_miss_rate(),
            write_miss_rate: self.write_miss_rate(),
            memory_cpi: self.memory_cpi(),
            total_cpi: self.total_cpi(),
            average_memory_access_time: self.average_memory_access_time(),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Serializable view of a finished run. Undefined metrics serialize as `null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsReport {
    /// Raw counters.
    #[serde(flatten)]
    pub counters: CacheStats,
    /// See [`CacheStats::overall_miss_rate`].
    pub overall_miss_rate: Option<f64>,
    /// See [`CacheStats::read_miss_rate`].
    pub read_miss_rate: Option<f64>,
    /// See [`CacheStats::write_miss_rate`].
    pub write_miss_rate: Option<f64>,
    /// See [`CacheStats::memory_cpi`].
    pub memory_cpi: Option<f64>,
    /// See [`CacheStats::total_cpi`].
    pub total_cpi: Option<f64>,
    /// See [`CacheStats::average_memory_access_time`].
    pub average_memory_access_time: Option<f64>,
}

/// Two-decimal rendering of a metric, or `undefined`.
struct Metric(Option<f64>);

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2}"),
            None => write!(f, "undefined"),
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation results:")?;
        writeln!(f, "\texecution time {} cycles", self.execution_cycles)?;
        writeln!(f, "\tinstructions {}", self.total_instructions)?;
        writeln!(f, "\tmemory accesses {}", self.memory_accesses)?;
        writeln!(f, "\toverall miss rate {}", Metric(self.overall_miss_rate()))?;
        writeln!(f, "\tread miss rate {}", Metric(self.read_miss_rate()))?;
        writeln!(f, "\tmemory CPI {}", Metric(self.memory_cpi()))?;
        writeln!(f, "\ttotal CPI {}", Metric(self.total_cpi()))?;
        writeln!(
            f,
            "\taverage memory access time {} cycles",
            Metric(self.average_memory_access_time())
        )?;
        writeln!(f, "dirty evictions {}", self.dirty_evictions)?;
        writeln!(f, "load_misses {}", self.load_misses)?;
        writeln!(f, "store_misses {}", self.store_misses)?;
        writeln!(f, "load_hits {}", self.load_hits)?;
        writeln!(f, "store_hits {}", self.store_hits)
    }
}
