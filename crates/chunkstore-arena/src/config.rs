//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the byte arena.
///
/// Controls segment sizing and the overall byte budget. Validated at
/// construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Capacity of the first segment in bytes.
    ///
    /// Default: 1024. This is the "initial size hint" of the store: small
    /// stores never allocate more than this.
    pub initial_segment_bytes: usize,

    /// Upper bound for the capacity of a doubled fill segment in bytes.
    ///
    /// Default: 8MB. Blocks larger than this still succeed; they get a
    /// dedicated segment of exactly their size.
    pub max_segment_bytes: usize,

    /// Total byte budget across all segments.
    ///
    /// Default: `usize::MAX` (bounded only by the system allocator).
    pub max_total_bytes: usize,
}

impl ArenaConfig {
    /// Default first-segment capacity.
    pub const DEFAULT_INITIAL_SEGMENT_BYTES: usize = 1024;

    /// Default cap on doubled segment capacity: 8MB.
    pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 8 * 1024 * 1024;

    /// Default total budget: unbounded.
    pub const DEFAULT_MAX_TOTAL_BYTES: usize = usize::MAX;

    /// Smallest accepted segment capacity.
    pub const MIN_SEGMENT_BYTES: usize = 16;

    /// Create a config whose first segment holds `initial_segment_bytes`.
    ///
    /// Uses default values for all other parameters. The hint is clamped
    /// to `MIN_SEGMENT_BYTES..=u32::MAX` and the segment cap is raised to
    /// match it, so any hint yields a valid config.
    pub fn new(initial_segment_bytes: usize) -> Self {
        let initial_segment_bytes =
            initial_segment_bytes.clamp(Self::MIN_SEGMENT_BYTES, u32::MAX as usize);
        Self {
            initial_segment_bytes,
            max_segment_bytes: Self::DEFAULT_MAX_SEGMENT_BYTES.max(initial_segment_bytes),
            max_total_bytes: Self::DEFAULT_MAX_TOTAL_BYTES,
        }
    }

    /// Set the doubled-segment cap.
    pub fn with_max_segment_bytes(mut self, bytes: usize) -> Self {
        self.max_segment_bytes = bytes;
        self
    }

    /// Set the total byte budget.
    pub fn with_max_total_bytes(mut self, bytes: usize) -> Self {
        self.max_total_bytes = bytes;
        self
    }

    /// Check that the parameters are mutually consistent.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.initial_segment_bytes < Self::MIN_SEGMENT_BYTES {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "initial_segment_bytes {} is below the minimum of {}",
                    self.initial_segment_bytes,
                    Self::MIN_SEGMENT_BYTES
                ),
            });
        }
        if self.initial_segment_bytes > u32::MAX as usize
            || self.max_segment_bytes > u32::MAX as usize
        {
            return Err(ArenaError::InvalidConfig {
                reason: "segment capacity must fit in u32 offsets".to_string(),
            });
        }
        if self.max_segment_bytes < self.initial_segment_bytes {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "max_segment_bytes {} is smaller than initial_segment_bytes {}",
                    self.max_segment_bytes, self.initial_segment_bytes
                ),
            });
        }
        if self.max_total_bytes < self.initial_segment_bytes {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "max_total_bytes {} cannot hold the first segment of {} bytes",
                    self.max_total_bytes, self.initial_segment_bytes
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_SEGMENT_BYTES)
    }
}
