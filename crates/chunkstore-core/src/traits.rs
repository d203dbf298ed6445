//! Core abstraction traits.

use crate::fold::fold_bytes;

/// Computes the fold of a byte chunk.
///
/// The storage asks its folder for one value per lookup and uses it to
/// select a bucket and to fast-reject candidates. Implementations must be
/// deterministic for the lifetime of a storage; they need not be
/// collision-free, since equality is always settled by a full byte
/// comparison.
pub trait ChunkFolder {
    /// Fold `data` (its bytes and its length) into a 64-bit value.
    fn fold(&self, data: &[u8]) -> u64;
}

/// Default folder: FNV-1a over the bytes, then the length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fnv1aFolder;

impl ChunkFolder for Fnv1aFolder {
    #[inline]
    fn fold(&self, data: &[u8]) -> u64 {
        fold_bytes(data)
    }
}

impl<F: ChunkFolder + ?Sized> ChunkFolder for &F {
    fn fold(&self, data: &[u8]) -> u64 {
        (**self).fold(data)
    }
}
