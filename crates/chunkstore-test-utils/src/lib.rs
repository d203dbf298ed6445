//! Test utilities and fixture folders for chunkstore development.
//!
//! The folders here deliberately break the default fold so tests can drive
//! the storage through its collision paths:
//!
//! - [`ConstantFolder`]: every chunk folds to the same value.
//! - [`LengthBlindFolder`]: folds the bytes but ignores the length.
//! - [`CountingFolder`]: wraps another folder and counts calls.
//!
//! [`corpus`] builds deterministic byte corpora for dedup scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod corpus;

use std::cell::Cell;

use chunkstore_core::fold::{FNV_OFFSET, FNV_PRIME};
use chunkstore_core::{ChunkFolder, Fnv1aFolder};

/// Folds every chunk to the same value, forcing one long chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantFolder(pub u64);

impl ChunkFolder for ConstantFolder {
    fn fold(&self, _data: &[u8]) -> u64 {
        self.0
    }
}

/// FNV-1a over the first byte only, with no length term.
///
/// `"A"`, `"AB"` and `"ABC"` all fold alike, so only the length check of
/// the exact-match test keeps them apart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LengthBlindFolder;

impl ChunkFolder for LengthBlindFolder {
    fn fold(&self, data: &[u8]) -> u64 {
        match data.first() {
            Some(&b) => (FNV_OFFSET ^ b as u64).wrapping_mul(FNV_PRIME),
            None => FNV_OFFSET,
        }
    }
}

/// Wraps a folder and counts how often it is asked for a fold.
#[derive(Debug, Default)]
pub struct CountingFolder<F = Fnv1aFolder> {
    inner: F,
    calls: Cell<usize>,
}

impl<F> CountingFolder<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    /// Number of folds computed so far.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Zero the call counter.
    pub fn reset(&self) {
        self.calls.set(0);
    }
}

impl<F: ChunkFolder> ChunkFolder for CountingFolder<F> {
    fn fold(&self, data: &[u8]) -> u64 {
        self.calls.set(self.calls.get() + 1);
        self.inner.fold(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_folder_ignores_content() {
        let f = ConstantFolder(9);
        assert_eq!(f.fold(b"a"), f.fold(b"completely different"));
    }

    #[test]
    fn length_blind_folder_collides_on_prefix() {
        let f = LengthBlindFolder;
        assert_eq!(f.fold(b"A"), f.fold(b"AB"));
        assert_ne!(f.fold(b"A"), f.fold(b"B"));
    }

    #[test]
    fn counting_folder_counts() {
        let f = CountingFolder::new(Fnv1aFolder);
        f.fold(b"x");
        f.fold(b"y");
        assert_eq!(f.calls(), 2);
        f.reset();
        assert_eq!(f.calls(), 0);
    }
}
