//! chunkstore: a deduplicating, append-only byte-chunk store.
//!
//! Accepts arbitrary byte sequences, keeps at most one physical copy of
//! each distinct sequence, and hands back a stable [`ChunkHandle`] to the
//! canonical copy. Intended for interning repeated strings or blobs inside
//! a larger system, where comparing handles replaces comparing content.
//!
//! # Quick start
//!
//! ```rust
//! use chunkstore::Storage;
//!
//! let mut storage = Storage::with_capacity(1024, 64);
//!
//! let p1 = storage.put(b"hello").unwrap();
//! let p2 = storage.put(b"hello").unwrap();
//! assert_eq!(p1, p2);
//!
//! let p3 = storage.put(b"world").unwrap();
//! assert_ne!(p3, p1);
//!
//! assert_eq!(storage.get(b"hello"), Some(p1));
//! assert_eq!(storage.get(b"bye"), None);
//! assert_eq!(storage.resolve(p3).unwrap(), b"world");
//! ```
//!
//! # Architecture
//!
//! ```text
//! Storage<F: ChunkFolder>
//! ├── HashIndex<StorageNode>   fold → chain of candidate nodes
//! └── ByteArena                segments of payload bytes, freed as a whole
//! ```
//!
//! A put folds the input once, walks the selected chain comparing length
//! then bytes, and on a miss copies the input into a single arena block
//! before linking a node for it.
//!
//! # Modules
//!
//! The sub-crates are re-exported for types not in the crate root:
//!
//! - [`arena`]: the segmented byte arena
//! - [`index`]: the fold-keyed chaining hash index
//! - [`types`]: folds, folders and generations

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
mod node;
pub mod stats;
pub mod storage;

pub use config::StorageConfig;
pub use error::StorageError;
pub use handle::ChunkHandle;
pub use stats::StorageStats;
pub use storage::Storage;

pub use chunkstore_core::{ChunkFolder, Fnv1aFolder, Generation};

/// The segmented byte arena (`chunkstore-arena`).
///
/// [`arena::ByteArena`] can be used on its own as an append-only byte
/// allocator.
pub use chunkstore_arena as arena;

/// The fold-keyed chaining hash index (`chunkstore-index`).
pub use chunkstore_index as index;

/// Folds, folders and generations (`chunkstore-core`).
pub use chunkstore_core as types;
