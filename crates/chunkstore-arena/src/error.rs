//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The byte budget is spent; no more segments can be allocated.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total byte budget of the arena.
        capacity: usize,
    },
    /// A single block larger than an [`ArenaRef`](crate::ArenaRef) can
    /// address was requested.
    BlockTooLarge {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The arena configuration is inconsistent.
    InvalidConfig {
        /// Which constraint was violated.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::BlockTooLarge { requested } => {
                write!(f, "block of {requested} bytes exceeds the addressable block size")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_exceeded_message_names_both_sizes() {
        let err = ArenaError::CapacityExceeded {
            requested: 10,
            capacity: 4096,
        };
        let msg = err.to_string();
        assert!(msg.contains("10 bytes"));
        assert!(msg.contains("4096 bytes"));
    }
}
