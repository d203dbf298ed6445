//! Fold-keyed chaining hash index for the chunkstore.
//!
//! [`HashIndex`] maps a 64-bit fold to a chain of candidate entries. It
//! knows nothing about what the entries contain: callers supply the fold
//! on insert and an equality predicate on search. No duplicate check is
//! done here; the layer above guarantees each distinct value is inserted
//! once.
//!
//! # Layout
//!
//! ```text
//! HashIndex<T>
//! ├── entries: Vec<(fold, T)>        insertion order, EntryId = position
//! └── buckets: Vec<SmallVec<[usize; 2]>>
//!                                    entry positions, oldest first
//! ```
//!
//! Chains are index-based rather than intrusive linked lists. Short chains
//! live inline in the bucket array; only long collision chains spill to
//! the heap.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod index;

pub use index::{EntryId, HashIndex};
