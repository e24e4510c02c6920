//! Trace input and the simulation loop.
//!
//! Provides the trace line parser and reader, and the `Simulator` that applies
//! records to a cache in order.

/// Trace line parsing and streaming reader.
pub mod trace;

/// Run loop over a trace.
pub mod simulator;

pub use simulator::Simulator;
pub use trace::{TraceReader, TraceRecord};
