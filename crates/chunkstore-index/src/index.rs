//! The chaining hash index.

use std::fmt;
use std::mem::size_of;

use smallvec::SmallVec;
use tracing::debug;

/// Positions of the entries sharing one bucket, oldest first.
type Chain = SmallVec<[usize; 2]>;

/// Entries a chain holds before spilling to the heap.
const INLINE_CHAIN: usize = 2;

/// Smallest entry-vector capacity after the first insert.
const MIN_ENTRY_SLOTS: usize = 4;

/// Identifies an entry within a [`HashIndex`].
///
/// `EntryId(n)` is the n-th entry ever inserted since the last clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Entry<T> {
    fold: u64,
    value: T,
}

/// Open-hashing index keyed by a 64-bit fold.
///
/// The bucket array doubles once the average chain length passes
/// [`MAX_LOAD_FACTOR`](Self::MAX_LOAD_FACTOR). Every entry keeps its fold,
/// so growth redistributes entries without consulting their content.
pub struct HashIndex<T> {
    entries: Vec<Entry<T>>,
    buckets: Vec<Chain>,
    /// `buckets.len() - 1`; bucket count is always a power of two.
    mask: usize,
}

impl<T> HashIndex<T> {
    /// Smallest bucket count an index is created with.
    pub const MIN_BUCKETS: usize = 16;

    /// Largest bucket count an index is created with. Growth may double
    /// past it once entries arrive.
    pub const MAX_INITIAL_BUCKETS: usize = 1 << 20;

    /// Average entries per bucket that triggers doubling.
    pub const MAX_LOAD_FACTOR: usize = 2;

    /// Create an index with at least `bucket_hint` buckets.
    ///
    /// The hint is clamped to
    /// [`MIN_BUCKETS`](Self::MIN_BUCKETS)..=[`MAX_INITIAL_BUCKETS`](Self::MAX_INITIAL_BUCKETS)
    /// and rounded up to a power of two.
    pub fn new(bucket_hint: usize) -> Self {
        let count = bucket_hint
            .clamp(Self::MIN_BUCKETS, Self::MAX_INITIAL_BUCKETS)
            .next_power_of_two();
        Self {
            entries: Vec::new(),
            buckets: vec![Chain::new(); count],
            mask: count - 1,
        }
    }

    /// Bucket selected by `fold` under the current table size.
    #[inline]
    fn bucket_of(&self, fold: u64) -> usize {
        bucket_in(fold, self.mask)
    }

    /// Walk the chain selected by `fold`, newest entry first, and return
    /// the first entry with the same fold for which `found` holds.
    pub fn search<F>(&self, fold: u64, mut found: F) -> Option<(EntryId, &T)>
    where
        F: FnMut(&T) -> bool,
    {
        self.buckets[self.bucket_of(fold)]
            .iter()
            .rev()
            .map(|&pos| (pos, &self.entries[pos]))
            .find(|(_, entry)| entry.fold == fold && found(&entry.value))
            .map(|(pos, entry)| (EntryId(pos), &entry.value))
    }

    /// Link `value` at the head of the chain selected by `fold`.
    ///
    /// Performs no duplicate check.
    pub fn insert(&mut self, fold: u64, value: T) -> EntryId {
        let pos = self.entries.len();
        let slots = self.entry_slots_for(pos + 1);
        if slots > self.entries.capacity() {
            self.entries.reserve_exact(slots - pos);
        }
        self.entries.push(Entry { fold, value });
        let bucket = self.bucket_of(fold);
        self.buckets[bucket].push(pos);

        if let Some(count) = self.grown_bucket_count(self.entries.len()) {
            self.grow(count);
        }
        EntryId(pos)
    }

    /// Entry-vector capacity once it holds `len` entries. Doubles, never
    /// below [`MIN_ENTRY_SLOTS`].
    fn entry_slots_for(&self, len: usize) -> usize {
        let cap = self.entries.capacity();
        if len <= cap {
            cap
        } else {
            cap.saturating_add(cap.max(MIN_ENTRY_SLOTS)).max(len)
        }
    }

    /// New bucket count if holding `len` entries passes the load factor.
    fn grown_bucket_count(&self, len: usize) -> Option<usize> {
        if len > self.buckets.len().saturating_mul(Self::MAX_LOAD_FACTOR) {
            self.buckets.len().checked_mul(2)
        } else {
            None
        }
    }

    /// [`memory_bytes`](Self::memory_bytes) as it will read after one more
    /// entry is inserted under `fold`. Does not modify the index.
    pub fn memory_bytes_after_insert(&self, fold: u64) -> usize {
        let len = self.entries.len() + 1;
        let entries = self.entry_slots_for(len) * size_of::<Entry<T>>();

        let Some(count) = self.grown_bucket_count(len) else {
            let chain = &self.buckets[self.bucket_of(fold)];
            let spilled = if chain.len() < chain.capacity() {
                self.spilled_bytes()
            } else {
                self.spilled_bytes() - heap_bytes(chain) + spill_bytes(chain.len() + 1)
            };
            return self.buckets.capacity() * size_of::<Chain>() + entries + spilled;
        };

        // Growth rebuilds every chain from empty.
        let mask = count - 1;
        let mut lengths = vec![0usize; count];
        for entry in &self.entries {
            lengths[bucket_in(entry.fold, mask)] += 1;
        }
        lengths[bucket_in(fold, mask)] += 1;
        let spilled: usize = lengths.into_iter().map(spill_bytes).sum();
        count * size_of::<Chain>() + entries + spilled
    }

    /// Double the bucket array to `count` and redistribute every entry.
    fn grow(&mut self, count: usize) {
        let mut buckets = vec![Chain::new(); count];
        let mask = count - 1;
        // Entries are visited in insertion order, so each chain stays
        // oldest-first.
        for (pos, entry) in self.entries.iter().enumerate() {
            buckets[bucket_in(entry.fold, mask)].push(pos);
        }
        self.buckets = buckets;
        self.mask = mask;
        debug!(buckets = count, entries = self.entries.len(), "hash index grew");
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (EntryId(pos), &e.value))
    }

    /// Drop every entry. The bucket array keeps its current size.
    pub fn clear(&mut self) {
        self.entries.clear();
        for chain in &mut self.buckets {
            chain.clear();
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Length of the longest chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Approximate heap memory held by the index in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.buckets.capacity() * size_of::<Chain>()
            + self.entries.capacity() * size_of::<Entry<T>>()
            + self.spilled_bytes()
    }

    fn spilled_bytes(&self) -> usize {
        self.buckets.iter().map(heap_bytes).sum()
    }
}

/// Bucket selected by `fold` in a table of `mask + 1` buckets.
#[inline]
fn bucket_in(fold: u64, mask: usize) -> usize {
    // Mix the high half in so folds that differ only above the mask
    // still spread out.
    ((fold ^ (fold >> 32)) as usize) & mask
}

/// Heap bytes a chain holds beyond its inline slots.
fn heap_bytes(chain: &Chain) -> usize {
    if chain.spilled() {
        chain.capacity() * size_of::<usize>()
    } else {
        0
    }
}

/// Heap bytes of a chain pushed up to `len` entries from empty.
fn spill_bytes(len: usize) -> usize {
    if len > INLINE_CHAIN {
        len.next_power_of_two() * size_of::<usize>()
    } else {
        0
    }
}

impl<T> Default for HashIndex<T> {
    fn default() -> Self {
        Self::new(Self::MIN_BUCKETS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_hint_rounds_up_to_power_of_two() {
        let index: HashIndex<u8> = HashIndex::new(100);
        assert_eq!(index.bucket_count(), 128);
        let index: HashIndex<u8> = HashIndex::new(0);
        assert_eq!(index.bucket_count(), HashIndex::<u8>::MIN_BUCKETS);
    }

    #[test]
    fn search_finds_inserted_value() {
        let mut index = HashIndex::new(16);
        let id = index.insert(42, "alpha");
        let (found, value) = index.search(42, |v| *v == "alpha").unwrap();
        assert_eq!(found, id);
        assert_eq!(*value, "alpha");
    }

    #[test]
    fn search_misses_when_predicate_rejects() {
        let mut index = HashIndex::new(16);
        index.insert(42, "alpha");
        assert!(index.search(42, |v| *v == "beta").is_none());
    }

    #[test]
    fn search_skips_entries_with_other_fold() {
        let mut index = HashIndex::new(16);
        // 7 and 7 + 16 land in the same bucket of a 16-bucket table.
        index.insert(7, "a");
        assert_eq!(index.buckets[index.bucket_of(7 + 16)].len(), 1);
        let mut calls = 0;
        let hit = index.search(7 + 16, |_| {
            calls += 1;
            true
        });
        assert!(hit.is_none());
        assert_eq!(calls, 0);
    }

    #[test]
    fn chain_is_walked_newest_first() {
        let mut index = HashIndex::new(16);
        index.insert(5, 1);
        index.insert(5, 2);
        index.insert(5, 3);
        let mut seen = Vec::new();
        let hit = index.search(5, |v| {
            seen.push(*v);
            false
        });
        assert!(hit.is_none());
        assert_eq!(seen, vec![3, 2, 1]);
    }

    #[test]
    fn grows_past_load_factor_and_keeps_entries() {
        let mut index = HashIndex::new(16);
        for i in 0..100u64 {
            index.insert(i.wrapping_mul(0x9E37_79B9_7F4A_7C15), i);
        }
        assert!(index.bucket_count() >= 64);
        assert_eq!(index.len(), 100);
        for i in 0..100u64 {
            let fold = i.wrapping_mul(0x9E37_79B9_7F4A_7C15);
            let (id, v) = index.search(fold, |v| *v == i).unwrap();
            assert_eq!(*v, i);
            assert_eq!(id, EntryId(i as usize));
        }
    }

    #[test]
    fn growth_preserves_newest_first_order() {
        let mut index = HashIndex::new(16);
        for i in 0..40u64 {
            index.insert(1, i);
        }
        let mut first = None;
        index.search(1, |v| {
            first.get_or_insert(*v);
            false
        });
        assert_eq!(first, Some(39));
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut index = HashIndex::new(16);
        for i in 0..100u64 {
            index.insert(i, i);
        }
        let buckets = index.bucket_count();
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), buckets);
        assert_eq!(index.longest_chain(), 0);
        assert!(index.search(3, |_| true).is_none());
    }

    #[test]
    fn iter_is_insertion_ordered() {
        let mut index = HashIndex::new(16);
        index.insert(9, 'x');
        index.insert(1, 'y');
        index.insert(9, 'z');
        let values: Vec<char> = index.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!['x', 'y', 'z']);
        let ids: Vec<EntryId> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![EntryId(0), EntryId(1), EntryId(2)]);
    }

    #[test]
    fn longest_chain_counts_collisions() {
        let mut index = HashIndex::new(16);
        index.insert(3, ());
        index.insert(3, ());
        index.insert(4, ());
        assert_eq!(index.longest_chain(), 2);
    }

    #[test]
    fn oversized_bucket_hint_is_clamped() {
        let index: HashIndex<u8> = HashIndex::new(usize::MAX);
        assert_eq!(index.bucket_count(), HashIndex::<u8>::MAX_INITIAL_BUCKETS);
        let index: HashIndex<u8> = HashIndex::new(HashIndex::<u8>::MAX_INITIAL_BUCKETS + 1);
        assert_eq!(index.bucket_count(), HashIndex::<u8>::MAX_INITIAL_BUCKETS);
    }

    #[test]
    fn entry_slots_double_from_four() {
        let mut index = HashIndex::new(16);
        index.insert(1, 0u64);
        assert_eq!(index.entries.capacity(), 4);
        for i in 1..5u64 {
            index.insert(i + 1, i);
        }
        assert_eq!(index.entries.capacity(), 8);
    }

    #[test]
    fn memory_forecast_covers_spill_and_growth() {
        let mut index = HashIndex::new(16);
        // One chain spilling repeatedly, then a table doubling.
        for i in 0..40u64 {
            let fold = if i < 8 { 5 } else { i * 0x9E37_79B9 };
            let forecast = index.memory_bytes_after_insert(fold);
            index.insert(fold, i);
            assert_eq!(index.memory_bytes(), forecast, "insert {i}");
        }
        assert!(index.bucket_count() > 16);
    }

    #[test]
    fn memory_grows_with_entries() {
        let mut index = HashIndex::new(16);
        let before = index.memory_bytes();
        for i in 0..1000u64 {
            index.insert(i, [0u8; 16]);
        }
        assert!(index.memory_bytes() > before);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_insert_is_searchable(
                folds in proptest::collection::vec(any::<u64>(), 1..200),
            ) {
                let mut index = HashIndex::new(16);
                for (i, &fold) in folds.iter().enumerate() {
                    index.insert(fold, i);
                }
                for (i, &fold) in folds.iter().enumerate() {
                    let hit = index.search(fold, |v| *v == i);
                    prop_assert_eq!(hit.map(|(id, _)| id), Some(EntryId(i)));
                }
                prop_assert!(index.len() <= index.bucket_count() * HashIndex::<usize>::MAX_LOAD_FACTOR);
            }

            #[test]
            fn memory_forecast_is_exact(
                folds in proptest::collection::vec(0u64..64, 1..200),
            ) {
                let mut index = HashIndex::new(16);
                for (i, &fold) in folds.iter().enumerate() {
                    let forecast = index.memory_bytes_after_insert(fold);
                    index.insert(fold, i);
                    prop_assert_eq!(index.memory_bytes(), forecast);
                }
            }
        }
    }
}
