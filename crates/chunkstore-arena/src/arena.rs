//! The growable byte arena.
//!
//! [`ByteArena`] owns a list of [`Segment`]s and decides where each block
//! goes. Fill segments double in capacity as the arena grows; a block too
//! large for the next fill segment gets a dedicated segment of exactly its
//! size. Blocks are never split across segments.

use tracing::{debug, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::ArenaRef;
use crate::segment::Segment;

/// Append-only bump allocator over a growable list of byte segments.
///
/// There is no per-block free. The whole arena is released on drop, or
/// rewound with [`reset`](Self::reset).
pub struct ByteArena {
    segments: Vec<Segment>,
    config: ArenaConfig,
    /// Index of the fill segment currently being bumped.
    current: usize,
    /// Capacity the next fill segment will get.
    next_segment_bytes: usize,
    /// Sum of all segment capacities; charged against `max_total_bytes`.
    reserved_bytes: usize,
}

impl ByteArena {
    /// Create a new arena with one pre-reserved segment.
    ///
    /// Returns `Err(ArenaError::InvalidConfig)` if the config does not
    /// validate.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Create an arena whose first segment holds `initial_segment_bytes`,
    /// with default growth and an unbounded budget.
    pub fn with_capacity(initial_segment_bytes: usize) -> Self {
        // `ArenaConfig::new` clamps its hint, so the result always validates.
        Self::from_valid(ArenaConfig::new(initial_segment_bytes))
    }

    fn from_valid(config: ArenaConfig) -> Self {
        let first = config.initial_segment_bytes;
        let mut segments = Vec::with_capacity(4);
        segments.push(Segment::new(first));
        Self {
            segments,
            next_segment_bytes: Self::grown(first, &config),
            reserved_bytes: first,
            current: 0,
            config,
        }
    }

    fn grown(capacity: usize, config: &ArenaConfig) -> usize {
        capacity.saturating_mul(2).min(config.max_segment_bytes)
    }

    /// Bump-allocate `len` bytes, growing into a new segment if needed.
    ///
    /// Returns the block's reference together with a zero-filled mutable
    /// slice over it, or `Err(ArenaError::CapacityExceeded)` if the byte
    /// budget would be exceeded. A failed call leaves the arena unchanged.
    pub fn alloc(&mut self, len: usize) -> Result<(ArenaRef, &mut [u8]), ArenaError> {
        let len32 = u32::try_from(len).map_err(|_| ArenaError::BlockTooLarge { requested: len })?;
        let index = self.segment_for(len)?;
        let segment = u32::try_from(index).map_err(|_| ArenaError::CapacityExceeded {
            requested: len,
            capacity: self.config.max_total_bytes,
        })?;
        let (offset, slice) =
            self.segments[index]
                .alloc(len)
                .ok_or(ArenaError::CapacityExceeded {
                    requested: len,
                    capacity: self.config.max_total_bytes,
                })?;
        Ok((ArenaRef::new(segment, offset, len32), slice))
    }

    /// Allocate a block and copy `data` into it in one step.
    pub fn alloc_copy(&mut self, data: &[u8]) -> Result<ArenaRef, ArenaError> {
        let (r, block) = self.alloc(data.len())?;
        block.copy_from_slice(data);
        Ok(r)
    }

    /// Pick the segment that will hold a `len`-byte block, appending one
    /// if the current fill segment is too full.
    fn segment_for(&mut self, len: usize) -> Result<usize, ArenaError> {
        if self.segments[self.current].remaining() >= len {
            return Ok(self.current);
        }

        let dedicated = len > self.next_segment_bytes;
        let capacity = if dedicated {
            len
        } else {
            self.next_segment_bytes
        };

        let reserved = self
            .reserved_bytes
            .checked_add(capacity)
            .filter(|&total| total <= self.config.max_total_bytes);
        let Some(reserved) = reserved else {
            warn!(
                requested = len,
                reserved = self.reserved_bytes,
                budget = self.config.max_total_bytes,
                "arena byte budget exhausted"
            );
            return Err(ArenaError::CapacityExceeded {
                requested: len,
                capacity: self.config.max_total_bytes,
            });
        };

        self.segments.push(Segment::new(capacity));
        self.reserved_bytes = reserved;
        let index = self.segments.len() - 1;

        if dedicated {
            debug!(segment = index, capacity, "arena added dedicated segment");
        } else {
            self.current = index;
            self.next_segment_bytes = Self::grown(capacity, &self.config);
            debug!(segment = index, capacity, "arena added fill segment");
        }
        Ok(index)
    }

    /// How many bytes of new segment capacity an allocation of `len`
    /// bytes would reserve. Zero when the block fits the current segment.
    pub fn growth_for(&self, len: usize) -> usize {
        if self.segments[self.current].remaining() >= len {
            0
        } else if len > self.next_segment_bytes {
            len
        } else {
            self.next_segment_bytes
        }
    }

    /// Get the bytes of a block.
    ///
    /// # Panics
    ///
    /// Panics if `r` does not name an allocated block of this arena.
    pub fn bytes(&self, r: ArenaRef) -> &[u8] {
        self.segments[r.segment as usize].slice(r.offset, r.len)
    }

    /// Get the bytes of a block, or `None` if `r` lies outside every
    /// allocated region.
    pub fn get(&self, r: ArenaRef) -> Option<&[u8]> {
        self.segments.get(r.segment as usize)?.get(r.offset, r.len)
    }

    /// Rewind the arena to a single empty segment.
    ///
    /// Every segment but the first is released. All previously issued
    /// references become invalid.
    pub fn reset(&mut self) {
        let released = self.segments.len() - 1;
        self.segments.truncate(1);
        self.segments[0].reset();
        self.current = 0;
        let first = self.config.initial_segment_bytes;
        self.next_segment_bytes = Self::grown(first, &self.config);
        self.reserved_bytes = first;
        debug!(released, "arena reset");
    }

    /// Total bytes handed out across all segments.
    pub fn used_bytes(&self) -> usize {
        self.segments.iter().map(Segment::used).sum()
    }

    /// Total bytes reserved for backing storage across all segments.
    pub fn memory_bytes(&self) -> usize {
        self.reserved_bytes
    }

    /// Number of segments currently allocated.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_arena() -> ByteArena {
        ByteArena::new(
            ArenaConfig::new(100)
                .with_max_segment_bytes(400)
                .with_max_total_bytes(1000),
        )
        .unwrap()
    }

    #[test]
    fn alloc_within_first_segment() {
        let mut arena = small_arena();
        let r = arena.alloc_copy(b"hello").unwrap();
        assert_eq!(r.segment(), 0);
        assert_eq!(r.offset(), 0);
        assert_eq!(arena.bytes(r), b"hello");
        assert_eq!(arena.used_bytes(), 5);
        assert_eq!(arena.memory_bytes(), 100);
    }

    #[test]
    fn with_capacity_matches_config_new() {
        let arena = ByteArena::with_capacity(0);
        assert_eq!(arena.config(), &ArenaConfig::new(0));
        assert_eq!(arena.memory_bytes(), ArenaConfig::MIN_SEGMENT_BYTES);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ArenaConfig::new(100).with_max_segment_bytes(10);
        assert!(matches!(
            ByteArena::new(config),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn grows_on_overflow_with_doubling() {
        let mut arena = small_arena();
        arena.alloc(100).unwrap(); // fills segment 0
        let (r, _) = arena.alloc(50).unwrap();
        assert_eq!(r.segment(), 1);
        assert_eq!(arena.segment_count(), 2);
        assert_eq!(arena.memory_bytes(), 100 + 200);

        arena.alloc(150).unwrap(); // fills segment 1
        let (r, _) = arena.alloc(1).unwrap();
        assert_eq!(r.segment(), 2);
        // Doubling is capped at max_segment_bytes.
        assert_eq!(arena.memory_bytes(), 100 + 200 + 400);
    }

    #[test]
    fn oversized_block_gets_dedicated_segment() {
        let mut arena = small_arena();
        let small = arena.alloc_copy(b"ab").unwrap();
        let big = vec![7u8; 250];
        let r = arena.alloc_copy(&big).unwrap();
        assert_eq!(r.segment(), 1);
        assert_eq!(arena.bytes(r), big.as_slice());
        // The partially filled first segment is still used afterwards.
        let next = arena.alloc_copy(b"cd").unwrap();
        assert_eq!(next.segment(), 0);
        assert_eq!(next.offset(), 2);
        assert_eq!(arena.bytes(small), b"ab");
    }

    #[test]
    fn budget_exceeded_leaves_arena_unchanged() {
        let mut arena = small_arena();
        arena.alloc(100).unwrap();
        arena.alloc(200).unwrap();
        arena.alloc(400).unwrap();
        let used = arena.used_bytes();
        let segments = arena.segment_count();
        let result = arena.alloc(301);
        assert!(matches!(
            result,
            Err(ArenaError::CapacityExceeded {
                requested: 301,
                capacity: 1000
            })
        ));
        assert_eq!(arena.used_bytes(), used);
        assert_eq!(arena.segment_count(), segments);
    }

    #[test]
    fn growth_for_predicts_reservation() {
        let mut arena = small_arena();
        assert_eq!(arena.growth_for(10), 0);
        arena.alloc(95).unwrap();
        assert_eq!(arena.growth_for(5), 0);
        assert_eq!(arena.growth_for(6), 200);
        assert_eq!(arena.growth_for(300), 300);
    }

    #[test]
    fn zero_length_block_never_grows() {
        let mut arena = small_arena();
        arena.alloc(100).unwrap();
        let (r, data) = arena.alloc(0).unwrap();
        assert!(data.is_empty());
        assert!(r.is_empty());
        assert_eq!(arena.segment_count(), 1);
    }

    #[test]
    fn reset_releases_extra_segments() {
        let mut arena = small_arena();
        arena.alloc(100).unwrap();
        arena.alloc(100).unwrap();
        assert_eq!(arena.segment_count(), 2);
        arena.reset();
        assert_eq!(arena.segment_count(), 1);
        assert_eq!(arena.used_bytes(), 0);
        assert_eq!(arena.memory_bytes(), 100);
        let (r, _) = arena.alloc(10).unwrap();
        assert_eq!((r.segment(), r.offset()), (0, 0));
    }

    #[test]
    fn earlier_blocks_survive_growth() {
        let mut arena = small_arena();
        let refs: Vec<_> = (0u8..50)
            .map(|i| arena.alloc_copy(&[i; 7]).unwrap())
            .collect();
        for (i, r) in refs.iter().enumerate() {
            assert_eq!(arena.bytes(*r), &[i as u8; 7]);
        }
    }

    #[test]
    fn get_rejects_unknown_segment() {
        let arena = small_arena();
        assert!(arena.get(ArenaRef::new(9, 0, 0)).is_none());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn blocks_read_back_what_was_written(
                blocks in proptest::collection::vec(
                    proptest::collection::vec(any::<u8>(), 0..300),
                    1..40,
                ),
            ) {
                let mut arena = ByteArena::new(ArenaConfig::new(64)).unwrap();
                let refs: Vec<_> = blocks
                    .iter()
                    .map(|b| arena.alloc_copy(b).unwrap())
                    .collect();
                for (r, b) in refs.iter().zip(&blocks) {
                    prop_assert_eq!(arena.bytes(*r), b.as_slice());
                }
                let total: usize = blocks.iter().map(Vec::len).sum();
                prop_assert_eq!(arena.used_bytes(), total);
                prop_assert!(arena.memory_bytes() >= total);
            }
        }
    }
}
