//! Storage configuration.

use chunkstore_arena::ArenaConfig;
use chunkstore_index::HashIndex;

use crate::error::StorageError;
use crate::node::StorageNode;

/// Construction-time sizing for a [`Storage`](crate::Storage).
///
/// Both values are hints: the arena grows past its first segment and the
/// index doubles its bucket array as entries arrive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Arena sizing and byte budget.
    pub arena: ArenaConfig,

    /// Initial bucket count of the hash index.
    ///
    /// Default: 64. Rounded up to a power of two; at most
    /// [`MAX_BUCKET_HINT`](Self::MAX_BUCKET_HINT).
    pub bucket_hint: usize,
}

impl StorageConfig {
    /// Default initial bucket count.
    pub const DEFAULT_BUCKET_HINT: usize = 64;

    /// Largest accepted initial bucket count.
    pub const MAX_BUCKET_HINT: usize = HashIndex::<StorageNode>::MAX_INITIAL_BUCKETS;

    /// Create a config from the two sizing hints.
    pub fn new(initial_arena_bytes: usize, bucket_hint: usize) -> Self {
        Self {
            arena: ArenaConfig::new(initial_arena_bytes),
            bucket_hint,
        }
    }

    /// Cap the arena's total byte budget.
    pub fn with_max_total_bytes(mut self, bytes: usize) -> Self {
        self.arena.max_total_bytes = bytes;
        self
    }

    /// Cap the capacity of doubled arena segments.
    pub fn with_max_segment_bytes(mut self, bytes: usize) -> Self {
        self.arena.max_segment_bytes = bytes;
        self
    }

    /// Check that the parameters are mutually consistent.
    pub fn validate(&self) -> Result<(), StorageError> {
        self.arena.validate()?;
        if self.bucket_hint > Self::MAX_BUCKET_HINT {
            return Err(StorageError::InvalidConfig {
                reason: format!(
                    "bucket_hint ({}) must be <= {}",
                    self.bucket_hint,
                    Self::MAX_BUCKET_HINT
                ),
            });
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(
            ArenaConfig::DEFAULT_INITIAL_SEGMENT_BYTES,
            Self::DEFAULT_BUCKET_HINT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = StorageConfig::default();
        assert_eq!(config.bucket_hint, 64);
        assert_eq!(config.arena, ArenaConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn setters_reach_the_arena() {
        let config = StorageConfig::new(256, 8)
            .with_max_segment_bytes(1024)
            .with_max_total_bytes(4096);
        assert_eq!(config.arena.initial_segment_bytes, 256);
        assert_eq!(config.arena.max_segment_bytes, 1024);
        assert_eq!(config.arena.max_total_bytes, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn bucket_hint_is_bounded() {
        let at_max = StorageConfig::new(256, StorageConfig::MAX_BUCKET_HINT);
        assert!(at_max.validate().is_ok());
        let over = StorageConfig::new(256, StorageConfig::MAX_BUCKET_HINT + 1);
        assert!(matches!(
            over.validate(),
            Err(StorageError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn arena_violations_surface_as_storage_errors() {
        let config = StorageConfig::new(256, 8).with_max_total_bytes(10);
        assert!(matches!(
            config.validate(),
            Err(StorageError::InvalidConfig { .. })
        ));
    }
}
