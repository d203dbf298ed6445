//! Storage error types.

use std::error::Error;
use std::fmt;

use chunkstore_arena::ArenaError;
use chunkstore_core::Generation;

use crate::handle::ChunkHandle;

/// Errors that can occur during storage operations.
///
/// A lookup miss is not an error: [`Storage::get`](crate::Storage::get)
/// returns `None` for absent content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The arena's byte budget cannot hold the new chunk. The storage is
    /// left exactly as it was before the call.
    CapacityExceeded {
        /// Size of the rejected chunk in bytes.
        requested: usize,
        /// Configured byte budget of the arena.
        capacity: usize,
    },
    /// The chunk is longer than a single arena block can address.
    ChunkTooLarge {
        /// Size of the rejected chunk in bytes.
        requested: usize,
    },
    /// A memory-limited put would push the storage past its limit.
    MemoryLimitExceeded {
        /// Size of the rejected chunk in bytes.
        requested: usize,
        /// Memory held by the storage at the time of the call.
        used: usize,
        /// Memory the storage would hold after storing the chunk.
        projected: usize,
        /// The limit the caller passed.
        limit: usize,
    },
    /// A handle issued before the last `clear()`.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: Generation,
        /// The storage's current generation.
        current: Generation,
    },
    /// A handle that does not name a chunk of this storage.
    UnknownChunk {
        /// The offending handle.
        handle: ChunkHandle,
    },
    /// The stored bytes are not valid UTF-8.
    NotUtf8 {
        /// The handle that was resolved as a string.
        handle: ChunkHandle,
    },
    /// The storage configuration is inconsistent.
    InvalidConfig {
        /// Which constraint was violated.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "storage capacity exceeded: chunk of {requested} bytes, budget {capacity} bytes"
                )
            }
            Self::ChunkTooLarge { requested } => {
                write!(f, "chunk of {requested} bytes is too large to store")
            }
            Self::MemoryLimitExceeded {
                requested,
                used,
                projected,
                limit,
            } => {
                write!(
                    f,
                    "memory limit exceeded: chunk of {requested} bytes would grow memory from {used} to {projected} bytes, limit {limit} bytes"
                )
            }
            Self::StaleHandle {
                handle_generation,
                current,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, current {current}"
                )
            }
            Self::UnknownChunk { handle } => {
                write!(f, "unknown chunk: {handle}")
            }
            Self::NotUtf8 { handle } => {
                write!(f, "chunk {handle} is not valid UTF-8")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid storage config: {reason}")
            }
        }
    }
}

impl Error for StorageError {}

impl From<ArenaError> for StorageError {
    fn from(e: ArenaError) -> Self {
        match e {
            ArenaError::CapacityExceeded {
                requested,
                capacity,
            } => Self::CapacityExceeded {
                requested,
                capacity,
            },
            ArenaError::BlockTooLarge { requested } => Self::ChunkTooLarge { requested },
            ArenaError::InvalidConfig { reason } => Self::InvalidConfig { reason },
        }
    }
}
