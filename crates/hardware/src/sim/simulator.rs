//! Simulator: feeds trace records to a cache, one at a time and in order.
//!
//! Each run owns its own cache. Runs over independent traces can proceed on
//! separate threads, but a single run is inherently sequential since every
//! access depends on the LRU and dirty state left by the previous ones.

use crate::cache::{AccessOutcome, SetAssociativeCache};
use crate::common::error::{GeometryError, TraceError};
use crate::config::CacheConfig;
use crate::sim::trace::TraceRecord;
use crate::stats::CacheStats;

/// Top-level simulator: one cache plus a count of applied records.
#[derive(Debug)]
pub struct Simulator {
    cache: SetAssociativeCache,
    records: u64,
}

impl Simulator {
    /// Builds an empty cache from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the configuration is rejected.
    pub fn new(config: &CacheConfig) -> Result<Self, GeometryError> {
        Ok(Self {
            cache: SetAssociativeCache::new(config)?,
            records: 0,
        })
    }

    /// Applies a single record.
    pub fn step(&mut self, record: &TraceRecord) -> AccessOutcome {
        self.records += 1;
        self.cache
            .access(record.access, record.addr, record.instructions)
    }

    /// Applies every record until the input is exhausted.
    ///
    /// Stops at the first error; records before it have already been applied.
    ///
    /// # Errors
    ///
    /// Propagates the first [`TraceError`] produced by `records`.
    pub fn run<I>(&mut self, records: I) -> Result<&CacheStats, TraceError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        tracing::info!(
            sets = self.cache.geometry().num_sets(),
            ways = self.cache.geometry().associativity(),
            "simulation started"
        );
        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(applied = self.records, error = %e, "trace aborted");
                    return Err(e);
                }
            };
            let _ = self.step(&record);
        }

        let stats = self.cache.stats();
        tracing::info!(
            accesses = stats.memory_accesses,
            misses = stats.total_misses(),
            dirty_evictions = stats.dirty_evictions,
            cycles = stats.execution_cycles,
            "simulation finished"
        );
        Ok(stats)
    }

    /// Number of records applied so far.
    pub const fn records_processed(&self) -> u64 {
        self.records
    }

    /// The simulated cache.
    pub const fn cache(&self) -> &SetAssociativeCache {
        &self.cache
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    /// Releases the cache, e.g. to dump its blocks after the run.
    pub fn into_cache(self) -> SetAssociativeCache {
        self.cache
    }
}
