//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest cache line in a set, regardless of how recently
//! it was accessed. Each set keeps its ways in insertion order; hits do not
//! reorder anything, fills move the way to the back of the queue.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `update()`: O(1)
//!   - `insert()`: O(W)
//!   - `get_victim()`: O(W)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality

use std::collections::VecDeque;
use std::ops::Range;

use super::ReplacementPolicy;

/// FIFO Policy state.
#[derive(Debug)]
pub struct FifoPolicy {
    /// Insertion order per set; the front is the oldest way.
    order: Vec<VecDeque<usize>>,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            order: (0..sets).map(|_| (0..ways).collect()).collect(),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Hits leave the insertion order untouched.
    fn update(&mut self, _set: usize, _way: usize) {}

    fn insert(&mut self, set: usize, way: usize) {
        let queue = &mut self.order[set];
        if let Some(pos) = queue.iter().position(|&x| x == way) {
            let _ = queue.remove(pos);
        }
        queue.push_back(way);
    }

    /// Returns the oldest way inside `ways`.
    fn get_victim(&mut self, set: usize, ways: Range<usize>) -> usize {
        self.order[set]
            .iter()
            .copied()
            .find(|way| ways.contains(way))
            .unwrap_or(ways.start)
    }
}
