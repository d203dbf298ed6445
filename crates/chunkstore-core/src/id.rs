//! Strongly-typed identifiers.

use std::fmt;

/// Storage generation counter.
///
/// Starts at zero and is bumped each time a storage is cleared. Every
/// chunk handle records the generation it was issued in, so a handle that
/// outlived a `clear()` can be detected in O(1) without a lookup table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u32);

impl Generation {
    /// The first generation of a freshly created storage.
    pub const INITIAL: Self = Self(0);

    /// The generation that follows this one.
    ///
    /// Wraps on overflow; four billion clears of a single storage is not a
    /// realistic workload.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Generation {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
