//! Core types and traits for the chunkstore deduplicating byte store.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces shared by every layer of the workspace: the content fold used to
//! pick hash buckets, the [`ChunkFolder`] seam that makes the fold
//! pluggable, and the [`Generation`] counter stamped into chunk handles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fold;
pub mod id;
pub mod traits;

pub use fold::fold_bytes;
pub use id::Generation;
pub use traits::{ChunkFolder, Fnv1aFolder};
