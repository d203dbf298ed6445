//! Block references.
//!
//! An [`ArenaRef`] encodes the physical location of one block within the
//! arena. It carries no lifetime: the arena that issued it must be used to
//! resolve it, and only until the next reset.

use std::fmt;

/// Physical location of a block within a [`ByteArena`](crate::ByteArena).
///
/// Enough information to resolve a `&[u8]` slice in O(1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArenaRef {
    /// Index of the segment holding the block.
    pub(crate) segment: u32,
    /// Byte offset within the segment.
    pub(crate) offset: u32,
    /// Length of the block in bytes.
    pub(crate) len: u32,
}

impl ArenaRef {
    /// Create a new reference.
    pub(crate) fn new(segment: u32, offset: u32, len: u32) -> Self {
        Self {
            segment,
            offset,
            len,
        }
    }

    /// Index of the segment holding the block.
    pub fn segment(&self) -> u32 {
        self.segment
    }

    /// Byte offset of the block within its segment.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the block in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for ArenaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArenaRef(seg={}, off={}, len={})",
            self.segment, self.offset, self.len
        )
    }
}
