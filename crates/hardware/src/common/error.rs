//! Error types for configuration and trace input.
//!
//! All geometry problems are caught when a cache is built; `access` itself
//! never fails. Trace errors come from the reader, before a record reaches
//! the cache.

use thiserror::Error;

/// Rejected cache geometry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Associativity of zero.
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    /// Block size that is zero or not a power of two.
    #[error("block size {0} bytes is not a power of two")]
    BlockSizeNotPowerOfTwo(u64),

    /// Cache size of zero bytes.
    #[error("cache size must be non-zero")]
    ZeroCapacity,

    /// Cache size that is not an exact multiple of one set's footprint.
    #[error(
        "cache size {size_bytes} bytes is not a multiple of block size x associativity ({set_bytes} bytes)"
    )]
    SizeNotMultiple {
        /// Requested cache size in bytes.
        size_bytes: u64,
        /// `block_bytes * associativity`, saturated on overflow.
        set_bytes: u64,
    },

    /// Number of sets that is not a power of two.
    #[error("set count {0} is not a power of two")]
    SetCountNotPowerOfTwo(u64),

    /// More blocks than a cache is allowed to allocate.
    #[error("cache of {blocks} blocks exceeds the limit of {max} blocks")]
    TooManyBlocks {
        /// `size_bytes / block_bytes`.
        blocks: u64,
        /// The configured ceiling.
        max: u64,
    },
}

/// Failure while reading a memory trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line that does not match `<marker> <0|1> <hex address> <count>`.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number in the input.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// Underlying read failure.
    #[error("trace read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
