//! The deduplicating chunk storage.
//!
//! [`Storage`] composes a [`ByteArena`] (where payload bytes live) with a
//! [`HashIndex`] of `StorageNode`s (how they are found again). A put
//! always looks up first; only a miss touches the arena, and the index is
//! linked only after the bytes have been copied, so a failed allocation
//! leaves both halves exactly as they were.

use chunkstore_arena::{ArenaConfig, ByteArena};
use chunkstore_core::{ChunkFolder, Fnv1aFolder, Generation};
use chunkstore_index::HashIndex;
use tracing::{debug, trace, warn};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::handle::ChunkHandle;
use crate::node::StorageNode;
use crate::stats::StorageStats;

/// Append-only store holding at most one copy of each distinct byte chunk.
///
/// Chunks are equal when they have the same length and the same bytes.
/// Storing a chunk returns a [`ChunkHandle`] to the canonical copy; storing
/// equal content again returns the same handle without allocating.
///
/// # Lifetime
///
/// Nothing is ever removed individually. [`clear`](Self::clear) empties
/// the whole storage and invalidates every handle issued so far; dropping
/// the storage releases its arena in one step. Slices returned by
/// [`resolve`](Self::resolve) borrow the storage, so they cannot outlive
/// it:
///
/// ```compile_fail
/// let mut storage = chunkstore::Storage::default();
/// let handle = storage.put(b"dangling").unwrap();
/// let bytes = storage.resolve(handle).unwrap();
/// drop(storage);
/// println!("{bytes:?}");
/// ```
///
/// # Concurrency
///
/// There is no internal locking. `put` takes `&mut self`, so sharing a
/// storage between threads requires an external lock, held across the
/// whole lookup-then-insert of each put.
pub struct Storage<F = Fnv1aFolder> {
    arena: ByteArena,
    index: HashIndex<StorageNode>,
    folder: F,
    generation: Generation,
    put_hits: u64,
    put_misses: u64,
}

impl Storage {
    /// Create a storage with the default fold.
    ///
    /// Returns `Err(StorageError::InvalidConfig)` if `config` does not
    /// validate.
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        Self::with_folder(config, Fnv1aFolder)
    }

    /// Create a storage from the two sizing hints.
    ///
    /// Infallible: the arena hint is clamped to
    /// `ArenaConfig::MIN_SEGMENT_BYTES..=u32::MAX` and the bucket hint to
    /// `HashIndex::MAX_INITIAL_BUCKETS`.
    pub fn with_capacity(initial_arena_bytes: usize, bucket_hint: usize) -> Self {
        Self::assemble(
            ByteArena::with_capacity(initial_arena_bytes),
            bucket_hint,
            Fnv1aFolder,
        )
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::with_capacity(
            ArenaConfig::DEFAULT_INITIAL_SEGMENT_BYTES,
            StorageConfig::DEFAULT_BUCKET_HINT,
        )
    }
}

impl<F: ChunkFolder> Storage<F> {
    /// Create a storage that folds chunks with `folder`.
    ///
    /// Returns `Err(StorageError::InvalidConfig)` if `config` does not
    /// validate.
    pub fn with_folder(config: StorageConfig, folder: F) -> Result<Self, StorageError> {
        config.validate()?;
        let arena = ByteArena::new(config.arena)?;
        Ok(Self::assemble(arena, config.bucket_hint, folder))
    }

    fn assemble(arena: ByteArena, bucket_hint: usize, folder: F) -> Self {
        let index = HashIndex::new(bucket_hint);
        debug!(
            arena_bytes = arena.memory_bytes(),
            buckets = index.bucket_count(),
            "chunk storage created"
        );
        Self {
            arena,
            index,
            folder,
            generation: Generation::INITIAL,
            put_hits: 0,
            put_misses: 0,
        }
    }

    /// Fold `data` once and search its chain for an exact match.
    fn lookup(&self, data: &[u8]) -> (u64, Option<ChunkHandle>) {
        let fold = self.folder.fold(data);
        let hit = self
            .index
            .search(fold, |node| node.holds(&self.arena, data))
            .map(|(_, node)| ChunkHandle::new(self.generation, node.location()));
        (fold, hit)
    }

    /// Find the stored copy of `data`.
    ///
    /// Returns `None` if equal content was never stored. Never allocates.
    pub fn get(&self, data: &[u8]) -> Option<ChunkHandle> {
        self.lookup(data).1
    }

    /// Whether equal content is stored.
    pub fn contains(&self, data: &[u8]) -> bool {
        self.get(data).is_some()
    }

    /// Store `data` unless equal content is already present, and return
    /// the handle of the canonical copy.
    ///
    /// A hit returns the existing handle and leaves the storage untouched.
    /// A miss makes exactly one arena allocation. The only failure is the
    /// arena's byte budget running out, in which case nothing changes.
    pub fn put(&mut self, data: &[u8]) -> Result<ChunkHandle, StorageError> {
        let (fold, hit) = self.lookup(data);
        if let Some(handle) = hit {
            self.put_hits += 1;
            return Ok(handle);
        }
        self.insert(fold, data)
    }

    /// Like [`put`](Self::put), but refuse to store new content if doing so
    /// would push [`memory_bytes`](Self::memory_bytes) past `limit`.
    ///
    /// The check forecasts the storage's size after the insert: arena
    /// segments the chunk would add plus index growth. A chunk that fits
    /// the current segment costs nothing, however close to the limit the
    /// storage is. Content that is already stored is returned whatever
    /// the limit.
    pub fn put_within(&mut self, data: &[u8], limit: usize) -> Result<ChunkHandle, StorageError> {
        let (fold, hit) = self.lookup(data);
        if let Some(handle) = hit {
            self.put_hits += 1;
            return Ok(handle);
        }

        let projected = self.projected_memory(fold, data.len());
        if projected > limit {
            let used = self.memory_bytes();
            warn!(
                requested = data.len(),
                used,
                projected,
                limit,
                "chunk rejected by memory limit"
            );
            return Err(StorageError::MemoryLimitExceeded {
                requested: data.len(),
                used,
                projected,
                limit,
            });
        }
        self.insert(fold, data)
    }

    /// What [`memory_bytes`](Self::memory_bytes) will read after storing a
    /// new `len`-byte chunk under `fold`.
    fn projected_memory(&self, fold: u64, len: usize) -> usize {
        self.arena
            .memory_bytes()
            .saturating_add(self.arena.growth_for(len))
            .saturating_add(self.index.memory_bytes_after_insert(fold))
    }

    /// Copy `data` into the arena and link it under `fold`.
    fn insert(&mut self, fold: u64, data: &[u8]) -> Result<ChunkHandle, StorageError> {
        let location = self.arena.alloc_copy(data)?;
        let entry = self.index.insert(fold, StorageNode::new(location));
        self.put_misses += 1;
        trace!(%entry, len = data.len(), fold, "stored new chunk");
        Ok(ChunkHandle::new(self.generation, location))
    }

    /// Store a string's UTF-8 bytes.
    pub fn put_str(&mut self, s: &str) -> Result<ChunkHandle, StorageError> {
        self.put(s.as_bytes())
    }

    /// Find the stored copy of a string's UTF-8 bytes.
    pub fn get_str(&self, s: &str) -> Option<ChunkHandle> {
        self.get(s.as_bytes())
    }

    /// Read the bytes of a stored chunk.
    ///
    /// Fails with `StaleHandle` for handles issued before the last
    /// [`clear`](Self::clear), and with `UnknownChunk` for handles that do
    /// not fit this storage's arena.
    pub fn resolve(&self, handle: ChunkHandle) -> Result<&[u8], StorageError> {
        if handle.generation != self.generation {
            return Err(StorageError::StaleHandle {
                handle_generation: handle.generation,
                current: self.generation,
            });
        }
        self.arena
            .get(handle.location)
            .ok_or(StorageError::UnknownChunk { handle })
    }

    /// Read a stored chunk as a string.
    pub fn resolve_str(&self, handle: ChunkHandle) -> Result<&str, StorageError> {
        let bytes = self.resolve(handle)?;
        std::str::from_utf8(bytes).map_err(|_| StorageError::NotUtf8 { handle })
    }

    /// Iterate over every stored chunk in the order it was first stored.
    pub fn iter(&self) -> impl Iterator<Item = (ChunkHandle, &[u8])> + '_ {
        self.index.iter().map(move |(_, node)| {
            (
                ChunkHandle::new(self.generation, node.location()),
                node.data(&self.arena),
            )
        })
    }

    /// Drop every chunk at once.
    ///
    /// The arena is rewound to its first segment and the generation moves
    /// on, so every handle issued so far resolves to `StaleHandle`.
    pub fn clear(&mut self) {
        let chunks = self.index.len();
        self.index.clear();
        self.arena.reset();
        self.generation = self.generation.next();
        self.put_hits = 0;
        self.put_misses = 0;
        debug!(chunks, generation = %self.generation, "chunk storage cleared");
    }

    /// Number of distinct chunks stored.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total bytes of stored chunk payload.
    pub fn payload_bytes(&self) -> usize {
        self.arena.used_bytes()
    }

    /// Memory held by the storage: arena segments plus the hash index.
    pub fn memory_bytes(&self) -> usize {
        self.arena.memory_bytes() + self.index.memory_bytes()
    }

    /// The current generation, stamped into newly issued handles.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The folder used to pick hash buckets.
    pub fn folder(&self) -> &F {
        &self.folder
    }

    /// A snapshot of sizes and counters.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            chunks: self.index.len(),
            payload_bytes: self.arena.used_bytes(),
            arena_bytes: self.arena.memory_bytes(),
            index_bytes: self.index.memory_bytes(),
            segments: self.arena.segment_count(),
            buckets: self.index.bucket_count(),
            longest_chain: self.index.longest_chain(),
            put_hits: self.put_hits,
            put_misses: self.put_misses,
        }
    }
}
