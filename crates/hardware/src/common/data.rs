//! Memory access type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of memory operation carried by a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Read from memory. Trace code `0`.
    Load,
    /// Write to memory. Trace code `1`; marks the block dirty.
    Store,
}

impl AccessType {
    /// Returns `true` for stores.
    #[inline(always)]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }

    /// Numeric code used in trace files.
    pub const fn code(self) -> u64 {
        match self {
            Self::Load => 0,
            Self::Store => 1,
        }
    }
}

impl TryFrom<u64> for AccessType {
    type Error = u64;

    /// Maps the trace code to an access type, returning the code back on failure.
    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Load),
            1 => Ok(Self::Store),
            other => Err(other),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Store => write!(f, "store"),
        }
    }
}
