//! Append-only segmented byte arena backing the chunkstore.
//!
//! Provides bump allocation of variable-length byte blocks with no
//! per-block free. The arena is released as a whole when dropped, or
//! rewound in one step with [`ByteArena::reset`].
//!
//! # Architecture
//!
//! ```text
//! ByteArena (budget accounting, growth policy)
//! └── Segment[] (fixed-capacity Vec<u8>, bump cursor)
//!     ├── fill segments: capacity doubles up to max_segment_bytes
//!     └── dedicated segments: one oversized block each
//! ```
//!
//! A segment's backing `Vec` is allocated to full capacity at creation
//! and never grows past it, so bytes written into the arena never move.
//! Blocks are addressed by [`ArenaRef`] (segment index, offset, length)
//! rather than by pointer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod segment;

// Public re-exports for the primary API surface.
pub use arena::ByteArena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::ArenaRef;
pub use segment::Segment;
