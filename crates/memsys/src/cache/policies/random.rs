//! Random Replacement Policy.
//!
//! This policy evicts a random cache line from the allowed ways. It uses a
//! xorshift generator with a fixed seed, so two runs over the same access
//! stream evict the same lines.

use std::ops::Range;

use super::ReplacementPolicy;

/// Random Policy state.
#[derive(Debug)]
pub struct RandomPolicy {
    /// Internal state for the pseudo-random number generator.
    state: u64,
}

impl RandomPolicy {
    /// Creates a new Random policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets (unused in this policy but required by interface).
    /// * `ways` - The associativity (unused; the range is supplied per victim).
    pub const fn new(_sets: usize, _ways: usize) -> Self {
        Self { state: 123456789 }
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Access patterns do not affect the state.
    fn update(&mut self, _set: usize, _way: usize) {}

    /// Generates a pseudo-random number and maps it into `ways`.
    fn get_victim(&mut self, _set: usize, ways: Range<usize>) -> usize {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        let span = ways.len().max(1);
        ways.start + (x as usize) % span
    }
}
