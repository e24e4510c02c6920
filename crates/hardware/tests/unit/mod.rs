//! # Unit Components
//!
//! Tests for each part of the simulator, from address decoding up to the
//! trace-driven run loop.

/// Address decoding and access type tests.
pub mod common;



/// Derived statistics and report formatting.
pub mod stats_verification;

/// Trace parsing and the simulator loop.
pub mod sim;
