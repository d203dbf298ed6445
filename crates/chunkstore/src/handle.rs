//! Chunk handles.
//!
//! A [`ChunkHandle`] names the canonical copy of one distinct chunk. It is
//! generation-scoped: the `generation` field lets the storage reject a
//! handle that outlived a `clear()` in O(1).

use std::fmt;

use chunkstore_arena::ArenaRef;
use chunkstore_core::Generation;

/// Stable reference to a stored chunk.
///
/// Two handles issued by the same storage are equal exactly when they name
/// the same canonical copy, so comparing handles is as good as comparing
/// content. Handles from different storages must not be mixed; the storage
/// cannot tell them apart from its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkHandle {
    /// Storage generation when the chunk was stored.
    pub(crate) generation: Generation,
    /// Where the payload lives in the arena.
    pub(crate) location: ArenaRef,
}

impl ChunkHandle {
    pub(crate) fn new(generation: Generation, location: ArenaRef) -> Self {
        Self {
            generation,
            location,
        }
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Length of the chunk in bytes.
    pub fn len(&self) -> usize {
        self.location.len() as usize
    }

    /// Whether this is the empty chunk.
    pub fn is_empty(&self) -> bool {
        self.location.is_empty()
    }
}

impl fmt::Display for ChunkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ChunkHandle(gen={}, seg={}, off={}, len={})",
            self.generation,
            self.location.segment(),
            self.location.offset(),
            self.location.len()
        )
    }
}
