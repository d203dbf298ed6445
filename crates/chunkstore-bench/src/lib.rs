//! Benchmark profiles for the chunkstore deduplicating byte store.
//!
//! Provides pre-built workloads and pre-filled storages for benchmarks:
//!
//! - [`reference_workload`]: 10K distinct dictionary words, each put 8 times
//! - [`filled_storage`]: a storage already holding a given word list
//! - [`collision_storage`]: every chunk in one chain, for worst-case scans

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use chunkstore::{Storage, StorageConfig};
use chunkstore_test_utils::corpus::dictionary_workload;
use chunkstore_test_utils::ConstantFolder;

/// Distinct words in the reference workload.
pub const REFERENCE_DISTINCT: usize = 10_000;

/// How often each word is put in the reference workload.
pub const REFERENCE_REPEATS: usize = 8;

/// The reference workload: 80K puts over 10K distinct words.
pub fn reference_workload() -> Vec<Vec<u8>> {
    dictionary_workload(REFERENCE_DISTINCT, REFERENCE_REPEATS)
}

/// A default-folded storage holding every chunk of `chunks`.
pub fn filled_storage(chunks: &[Vec<u8>]) -> Storage {
    let mut storage = Storage::with_capacity(64 * 1024, chunks.len());
    for chunk in chunks {
        // The default config has an unbounded budget.
        let _ = storage.put(chunk);
    }
    storage
}

/// A storage whose folder sends every chunk to the same bucket.
pub fn collision_storage(chunks: &[Vec<u8>]) -> Storage<ConstantFolder> {
    let config = StorageConfig::new(64 * 1024, 16);
    let mut storage = match Storage::with_folder(config, ConstantFolder(0)) {
        Ok(storage) => storage,
        Err(e) => panic!("benchmark config must be valid: {e}"),
    };
    for chunk in chunks {
        let _ = storage.put(chunk);
    }
    storage
}
