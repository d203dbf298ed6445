//! Contiguous byte segments with bump allocation.
//!
//! A [`Segment`] is a `Vec<u8>` reserved to a fixed capacity up front. The
//! vector's length doubles as the bump cursor, and because it never grows
//! past the reserved capacity the backing buffer is never reallocated.

/// One fixed-capacity run of chunk bytes.
///
/// Blocks are carved off the end in order and never move once written.
/// A segment is only ever emptied as a whole, by [`reset`](Self::reset) or
/// by dropping it.
pub struct Segment {
    /// Reserved to `capacity` at creation; `data.len()` is the cursor.
    data: Vec<u8>,
    /// Hard limit in bytes. `Vec::capacity` may round up; this does not.
    capacity: usize,
}

impl Segment {
    /// Reserve an empty segment of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Carve `len` zeroed bytes off the end of the segment.
    ///
    /// Returns the block's starting offset and a mutable view of it, or
    /// `None` if fewer than `len` bytes remain.
    pub fn alloc(&mut self, len: usize) -> Option<(u32, &mut [u8])> {
        let start = self.data.len();
        let end = start.checked_add(len)?;
        if end > self.capacity {
            return None;
        }
        let offset = u32::try_from(start).ok()?;
        // Stays within the reserved capacity, so this never reallocates.
        self.data.resize(end, 0);
        Some((offset, &mut self.data[start..end]))
    }

    /// Bytes of the block at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the block reaches past the written part of the segment.
    pub fn slice(&self, offset: u32, len: u32) -> &[u8] {
        let from = offset as usize;
        &self.data[from..from + len as usize]
    }

    /// Bytes of the block at `offset`, or `None` if it reaches past the
    /// written part of the segment.
    pub fn get(&self, offset: u32, len: u32) -> Option<&[u8]> {
        let from = offset as usize;
        let to = from.checked_add(len as usize)?;
        self.data.get(from..to)
    }

    /// Forget every block, keeping the reservation.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Bytes written so far.
    pub fn used(&self) -> usize {
        self.data.len()
    }

    /// Bytes reserved for this segment.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }
}
