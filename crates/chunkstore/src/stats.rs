//! Point-in-time storage statistics.

use std::fmt;

/// Counters and sizes describing a [`Storage`](crate::Storage).
///
/// Produced by [`Storage::stats`](crate::Storage::stats). Counters are
/// reset by `clear()`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of distinct chunks stored.
    pub chunks: usize,
    /// Bytes of chunk payload held in the arena.
    pub payload_bytes: usize,
    /// Bytes reserved by arena segments.
    pub arena_bytes: usize,
    /// Approximate bytes held by the hash index.
    pub index_bytes: usize,
    /// Number of arena segments.
    pub segments: usize,
    /// Number of hash buckets.
    pub buckets: usize,
    /// Entries in the most crowded bucket.
    pub longest_chain: usize,
    /// Puts answered by an existing chunk.
    pub put_hits: u64,
    /// Puts that stored a new chunk.
    pub put_misses: u64,
}

impl StorageStats {
    /// Fraction of puts that were deduplicated, or `0.0` before any put.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.put_hits + self.put_misses;
        if total == 0 {
            0.0
        } else {
            self.put_hits as f64 / total as f64
        }
    }
}

impl fmt::Display for StorageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} chunks, {} payload bytes in {} segments ({} bytes), {} buckets (longest chain {}), {} hits / {} misses",
            self.chunks,
            self.payload_bytes,
            self.segments,
            self.arena_bytes,
            self.buckets,
            self.longest_chain,
            self.put_hits,
            self.put_misses
        )
    }
}
