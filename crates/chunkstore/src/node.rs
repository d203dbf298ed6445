//! Storage nodes: one record per distinct chunk.

use chunkstore_arena::{ArenaRef, ByteArena};

/// Index record for one interned chunk.
///
/// Created once, when a put finds no existing match, and never mutated
/// afterwards. The payload bytes live in the arena at `location`; the
/// chain link is the node's position in its hash bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StorageNode {
    location: ArenaRef,
}

impl StorageNode {
    pub(crate) fn new(location: ArenaRef) -> Self {
        Self { location }
    }

    pub(crate) fn location(&self) -> ArenaRef {
        self.location
    }

    pub(crate) fn data_len(&self) -> usize {
        self.location.len() as usize
    }

    pub(crate) fn data<'a>(&self, arena: &'a ByteArena) -> &'a [u8] {
        arena.bytes(self.location)
    }

    /// Exact-match test: same length, then same bytes.
    ///
    /// The length check runs first so differently sized chunks whose folds
    /// collide are rejected without touching the arena.
    pub(crate) fn holds(&self, arena: &ByteArena, data: &[u8]) -> bool {
        self.data_len() == data.len() && self.data(arena) == data
    }
}
