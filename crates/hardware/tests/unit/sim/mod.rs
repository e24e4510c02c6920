//! Trace input and run loop tests.

/// Trace line parsing and the streaming reader.
pub mod trace;
