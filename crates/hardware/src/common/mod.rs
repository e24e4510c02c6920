//! Common types shared across the simulator.
//!
//! 1. **Addresses:** `PhysAddr` and the tag/index/offset `AddressDecoder`.
//! 2. **Memory Access:** Load/store classification of trace records.
//! 3. **Errors:** Geometry and trace error types.

/// Address type and decomposition.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{AddressDecoder, DecodedAddr, PhysAddr};
pub use data::AccessType;
pub use error::{GeometryError, TraceError};
