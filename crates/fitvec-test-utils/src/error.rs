//! Ledger error types.

use std::error::Error;
use std::fmt;

/// Inconsistencies a [`TrackingAllocator`](crate::TrackingAllocator) can
/// detect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// Blocks are still live where none were expected.
    Unbalanced {
        /// Number of live blocks.
        allocations: usize,
        /// Total bytes in live blocks.
        bytes: usize,
    },
    /// A free for an address the ledger never handed out (or already took
    /// back).
    UnknownPointer {
        /// The address passed to `free`.
        addr: usize,
    },
    /// A free whose layout size differs from the one allocated.
    LayoutMismatch {
        /// The address passed to `free`.
        addr: usize,
        /// Bytes recorded at allocation.
        expected: usize,
        /// Bytes passed to `free`.
        actual: usize,
    },
    /// Every ledger slot is occupied.
    SlotsExhausted {
        /// The configured slot count.
        limit: usize,
    },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbalanced { allocations, bytes } => {
                write!(
                    f,
                    "unbalanced allocator: {allocations} live blocks, {bytes} bytes outstanding"
                )
            }
            Self::UnknownPointer { addr } => {
                write!(f, "free of unknown pointer {addr:#x}")
            }
            Self::LayoutMismatch {
                addr,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "free of {addr:#x} with {actual} bytes, allocated with {expected} bytes"
                )
            }
            Self::SlotsExhausted { limit } => {
                write!(f, "allocation ledger full: {limit} live blocks")
            }
        }
    }
}

impl Error for LedgerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_counts() {
        let err = LedgerError::Unbalanced {
            allocations: 2,
            bytes: 48,
        };
        assert_eq!(
            err.to_string(),
            "unbalanced allocator: 2 live blocks, 48 bytes outstanding"
        );
        assert_eq!(
            LedgerError::UnknownPointer { addr: 0x10 }.to_string(),
            "free of unknown pointer 0x10"
        );
    }
}
