//! Process-wide pool of relevance accumulator arrays.

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::query::bm25::Bm25Relevance;

/// Maximum number of arrays retained per pool.
const MAX_RETAINED: usize = 32;

/// Pool of growable [`Bm25Relevance`] arrays.
///
/// Multi-term matches rent an array per accumulation cycle and return
/// it after scoring, amortizing allocation across queries. Renting
/// transfers exclusive ownership of the array to the caller; returning
/// relinquishes it. The pool is safe for concurrent rent/return from
/// multiple query threads.
#[derive(Debug, Default)]
pub struct RelevancePool {
    buffers: Mutex<Vec<Vec<Bm25Relevance>>>,
}

impl RelevancePool {
    /// Create a new, empty pool.
    pub fn new() -> Self {
        RelevancePool {
            buffers: Mutex::new(Vec::new()),
        }
    }

    /// Rent an empty array with capacity for at least `min_capacity`
    /// accumulators.
    pub fn rent(&self, min_capacity: usize) -> Vec<Bm25Relevance> {
        let capacity = min_capacity.next_power_of_two().max(1);

        let mut buffers = self.buffers.lock();
        if let Some(idx) = buffers.iter().position(|b| b.capacity() >= capacity) {
            return buffers.swap_remove(idx);
        }
        drop(buffers);

        Vec::with_capacity(capacity)
    }

    /// Return an array to the pool.
    ///
    /// Any accumulators still held are dropped; the caller must not
    /// touch the array afterward.
    pub fn return_buffer(&self, mut buffer: Vec<Bm25Relevance>) {
        buffer.clear();

        let mut buffers = self.buffers.lock();
        if buffers.len() < MAX_RETAINED {
            buffers.push(buffer);
        }
    }

    /// Number of arrays currently held by the pool.
    pub fn retained(&self) -> usize {
        self.buffers.lock().len()
    }
}

lazy_static! {
    static ref RELEVANCE_POOL: RelevancePool = RelevancePool::new();
}

/// The process-wide relevance array pool.
pub fn relevance_pool() -> &'static RelevancePool {
    &RELEVANCE_POOL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_capacity() {
        let pool = RelevancePool::new();

        let buffer = pool.rent(64);
        assert!(buffer.capacity() >= 64);
        assert!(buffer.is_empty());

        let buffer = pool.rent(0);
        assert!(buffer.capacity() >= 1);
    }

    #[test]
    fn test_round_trip_reuses_buffer() {
        let pool = RelevancePool::new();

        let buffer = pool.rent(16);
        let capacity = buffer.capacity();
        pool.return_buffer(buffer);
        assert_eq!(pool.retained(), 1);

        let buffer = pool.rent(16);
        assert_eq!(buffer.capacity(), capacity);
        assert!(buffer.is_empty());
        assert_eq!(pool.retained(), 0);
    }

    #[test]
    fn test_undersized_buffers_are_skipped() {
        let pool = RelevancePool::new();

        pool.return_buffer(Vec::with_capacity(4));
        let buffer = pool.rent(128);
        assert!(buffer.capacity() >= 128);
        // The small buffer stays pooled for a later small rent.
        assert_eq!(pool.retained(), 1);
    }

    #[test]
    fn test_global_pool_is_shared() {
        let buffer = relevance_pool().rent(8);
        relevance_pool().return_buffer(buffer);
    }

    #[test]
    fn test_concurrent_rent_return() {
        use std::sync::Arc;

        let pool = Arc::new(RelevancePool::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pool = Arc::clone(&pool);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let buffer = pool.rent(32);
                        pool.return_buffer(buffer);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(pool.retained() <= MAX_RETAINED);
    }
}
