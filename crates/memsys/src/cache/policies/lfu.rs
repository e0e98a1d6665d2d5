//! Least Frequently Used (LFU) Replacement Policy.
//!
//! Every way carries a use counter. A fill starts the counter at one, each hit
//! increments it, and the victim is the way with the smallest count (lowest
//! way index on ties).

use std::ops::Range;

use super::ReplacementPolicy;

/// LFU Policy state.
#[derive(Debug)]
pub struct LfuPolicy {
    /// Use counters, `ways` consecutive entries per set.
    uses: Vec<u64>,
    ways: usize,
}

impl LfuPolicy {
    /// Creates a new LFU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity (number of ways) of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            uses: vec![0; sets * ways],
            ways,
        }
    }
}

impl ReplacementPolicy for LfuPolicy {
    fn update(&mut self, set: usize, way: usize) {
        let count = &mut self.uses[set * self.ways + way];
        *count = count.saturating_add(1);
    }

    fn insert(&mut self, set: usize, way: usize) {
        self.uses[set * self.ways + way] = 1;
    }

    /// Returns the least used way inside `ways`.
    fn get_victim(&mut self, set: usize, ways: Range<usize>) -> usize {
        let base = set * self.ways;
        let start = ways.start;
        ways.min_by_key(|&way| (self.uses[base + way], way))
            .unwrap_or(start)
    }
}
