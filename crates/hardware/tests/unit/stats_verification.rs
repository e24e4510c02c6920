//! CacheStats unit tests.
//!
//! Verifies default initialization, derived metric computation, the
//! zero-denominator cases, and both report formats.

use cachesim_core::stats::CacheStats;
use pretty_assertions::assert_eq;

fn sample() -> CacheStats {
    CacheStats {
        memory_accesses: 4,
        total_instructions: 10,
        load_hits: 1,
        load_misses: 2,
        store_hits: 0,
        store_misses: 1,
        dirty_evictions: 1,
        execution_cycles: 10 + 3 * 30 + 2,
    }
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-10)
}

#[test]
fn default_stats_all_zero() {
    let stats = CacheStats::default();
    assert_eq!(stats.memory_accesses, 0);
    assert_eq!(stats.total_instructions, 0);
    assert_eq!(stats.load_hits, 0);
    assert_eq!(stats.load_misses, 0);
    assert_eq!(stats.store_hits, 0);
    assert_eq!(stats.store_misses, 0);
    assert_eq!(stats.dirty_evictions, 0);
    assert_eq!(stats.execution_cycles, 0);
}

#[test]
fn derived_metrics() {
    let stats = sample();
    assert_eq!(stats.total_hits(), 1);
    assert_eq!(stats.total_misses(), 3);
    assert_eq!(stats.memory_stall_cycles(), 92);
    assert!(close(stats.overall_miss_rate(), 0.75));
    assert!(close(stats.read_miss_rate(), 2.0 / 3.0));
    assert!(close(stats.write_miss_rate(), 1.0));
    assert!(close(stats.memory_cpi(), 9.2));
    assert!(close(stats.total_cpi(), 10.2));
    assert!(close(stats.average_memory_access_time(), 23.0));
}

#[test]
fn empty_run_metrics_are_undefined() {
    let stats = CacheStats::default();
    assert_eq!(stats.overall_miss_rate(), None);
    assert_eq!(stats.read_miss_rate(), None);
    assert_eq!(stats.write_miss_rate(), None);
    assert_eq!(stats.memory_cpi(), None);
    assert_eq!(stats.total_cpi(), None);
    assert_eq!(stats.average_memory_access_time(), None);
}

/// Accesses with zero instruction counts leave CPI undefined but miss rates defined.
#[test]
fn zero_instructions_only_cpi_undefined() {
    let stats = CacheStats {
        memory_accesses: 2,
        store_misses: 2,
        execution_cycles: 60,
        ..CacheStats::default()
    };
    assert_eq!(stats.memory_cpi(), None);
    assert_eq!(stats.total_cpi(), None);
    assert_eq!(stats.read_miss_rate(), None);
    assert!(close(stats.overall_miss_rate(), 1.0));
    assert!(close(stats.average_memory_access_time(), 30.0));
}

#[test]
fn text_report_format() {
    let expected = "Simulation results:\n\
                    \texecution time 102 cycles\n\
                    \tinstructions 10\n\
                    \tmemory accesses 4\n\
                    \toverall miss rate 0.75\n\
                    \tread miss rate 0.67\n\
                    \tmemory CPI 9.20\n\
                    \ttotal CPI 10.20\n\
                    \taverage memory access time 23.00 cycles\n\
                    dirty evictions 1\n\
                    load_misses 2\n\
                    store_misses 1\n\
                    load_hits 1\n\
                    store_hits 0\n";
    assert_eq!(sample().to_string(), expected);
}

#[test]
fn text_report_marks_undefined() {
    let report = CacheStats::default().to_string();
    assert!(report.contains("\toverall miss rate undefined\n"));
    assert!(report.contains("\ttotal CPI undefined\n"));
    assert!(report.contains("\taverage memory access time undefined cycles\n"));
    assert!(!report.contains("NaN"));
    assert!(!report.contains("inf"));
}

#[test]
fn json_report_flattens_counters() {
    let value = serde_json::to_value(sample().report()).unwrap();
    assert_eq!(value["memory_accesses"], 4);
    assert_eq!(value["dirty_evictions"], 1);
    assert_eq!(value["overall_miss_rate"], 0.75);
    assert_eq!(value["total_cpi"].as_f64().map(|v| (v * 100.0).round()), Some(1020.0));
}

#[test]
fn json_report_undefined_is_null() {
    let value = serde_json::to_value(CacheStats::default().report()).unwrap();
    assert!(value["read_miss_rate"].is_null());
    assert!(value["memory_cpi"].is_null());
    assert_eq!(value["execution_cycles"], 0);
}
