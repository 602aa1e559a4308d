//! `HierarchicalBitSet`: a sparse bitmap over `node_id` space.
//!
//! Roaring-style: only chunks that contain at least one set bit are
//! materialized, so capacities up to 10^6 cost memory proportional to the
//! number of set bits rather than the id space. Each 64-bit chunk is an
//! `AtomicU64` behind a `DashMap`, giving the thread-safety the BFS phase
//! needs (concurrent `is_set` reads while seeding via `set_batch`, serial
//! `set` writes during the walk itself).

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

const CHUNK_BITS: u32 = 64;

#[derive(Default)]
pub struct HierarchicalBitSet {
    chunks: DashMap<u32, AtomicU64>,
}

impl HierarchicalBitSet {
    /// `capacity` is advisory only — used to presize the backing map so the
    /// common case of a mostly-contiguous id range doesn't rehash.
    pub fn with_capacity(capacity: u32) -> Self {
        let estimated_chunks = (capacity / CHUNK_BITS).max(1) as usize;
        Self {
            chunks: DashMap::with_capacity(estimated_chunks.min(1 << 16)),
        }
    }

    fn split(id: u32) -> (u32, u32) {
        (id / CHUNK_BITS, id % CHUNK_BITS)
    }

    pub fn set(&self, id: u32) {
        let (chunk, bit) = Self::split(id);
        let mask = 1u64 << bit;
        match self.chunks.get(&chunk) {
            Some(word) => {
                word.fetch_or(mask, Ordering::Relaxed);
            }
            None => {
                self.chunks
                    .entry(chunk)
                    .or_insert_with(|| AtomicU64::new(0))
                    .fetch_or(mask, Ordering::Relaxed);
            }
        }
    }

    pub fn set_batch(&self, ids: impl IntoIterator<Item = u32>) {
        for id in ids {
            self.set(id);
        }
    }

    pub fn is_set(&self, id: u32) -> bool {
        let (chunk, bit) = Self::split(id);
        match self.chunks.get(&chunk) {
            Some(word) => word.load(Ordering::Relaxed) & (1u64 << bit) != 0,
            None => false,
        }
    }

    pub fn count_set(&self) -> usize {
        self.chunks
            .iter()
            .map(|entry| entry.value().load(Ordering::Relaxed).count_ones() as usize)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_and_is_set() {
        let bitset = HierarchicalBitSet::with_capacity(1000);
        assert!(!bitset.is_set(42));
        bitset.set(42);
        assert!(bitset.is_set(42));
        assert!(!bitset.is_set(43));
    }

    #[test]
    fn test_set_batch() {
        let bitset = HierarchicalBitSet::with_capacity(1000);
        bitset.set_batch([1, 2, 3, 1_000_000]);
        assert!(bitset.is_set(1));
        assert!(bitset.is_set(2));
        assert!(bitset.is_set(3));
        assert!(bitset.is_set(1_000_000));
        assert_eq!(bitset.count_set(), 4);
    }

    #[test]
    fn test_sparse_large_capacity() {
        let bitset = HierarchicalBitSet::with_capacity(1_000_000);
        bitset.set(999_999);
        assert_eq!(bitset.count_set(), 1);
        assert!(!bitset.is_set(0));
    }

    #[test]
    fn test_concurrent_reads_and_writes() {
        let bitset = Arc::new(HierarchicalBitSet::with_capacity(10_000));
        let mut handles = Vec::new();
        for t in 0..8 {
            let bitset = Arc::clone(&bitset);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    bitset.set(t * 100 + i);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(bitset.count_set(), 800);
    }

    #[test]
    fn test_idempotent_set() {
        let bitset = HierarchicalBitSet::with_capacity(100);
        bitset.set(5);
        bitset.set(5);
        bitset.set(5);
        assert_eq!(bitset.count_set(), 1);
    }
}
