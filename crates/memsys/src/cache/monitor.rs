//! Utility Monitors (UMON).
//!
//! A utility monitor estimates how many misses one core would suffer for
//! every possible number of ways it could own in a shared cache. It keeps a
//! shadow tag directory with the full associativity of the monitored cache,
//! private to the core, for every sampled set. Because a fully-owned LRU stack
//! of depth `w` hits exactly when the shadow hit position is below `w`, a
//! single stack yields the whole miss curve:
//!
//! - shadow hit at stack position `p`: the access would have missed with any
//!   allocation of `0..=p` ways;
//! - shadow miss: it would have missed with every allocation.
//!
//! The two mutation triggers are kept apart: [`UtilityMonitor::observe`] runs
//! on every access to a sampled set, [`UtilityMonitor::decay`] runs once per
//! repartition epoch.

use serde::Serialize;

/// Per-core miss-curve estimator for a shared cache.
#[derive(Debug, Clone)]
pub struct UtilityMonitor {
    ways: usize,
    sample_stride: usize,
    /// Shadow LRU stacks per sampled set, most recently used tag first.
    shadow: Vec<Vec<u64>>,
    /// `misses[w]` counts sampled accesses that would miss with `w` ways.
    misses: Vec<u64>,
    /// Real misses of the monitored core.
    miss_count: u64,
}

/// Serializable view of a monitor's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    /// Projected misses per hypothetical way count.
    pub misses: Vec<u64>,
    /// Real misses of the monitored core.
    pub miss_count: u64,
}

impl UtilityMonitor {
    /// Creates a monitor for a cache with `sets` sets of `ways` ways, sampling
    /// every `sample_stride`-th set.
    pub fn new(sets: usize, ways: usize, sample_stride: usize) -> Self {
        let sample_stride = sample_stride.max(1);
        let sampled = sets.div_ceil(sample_stride);
        Self {
            ways,
            sample_stride,
            shadow: vec![Vec::with_capacity(ways); sampled],
            misses: vec![0; ways + 1],
            miss_count: 0,
        }
    }

    /// Associativity of the monitored cache.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Returns `true` if accesses to `set` feed this monitor.
    #[inline]
    pub const fn samples(&self, set: usize) -> bool {
        set % self.sample_stride == 0
    }

    /// Records an access by the monitored core to `tag` in `set`.
    ///
    /// Accesses to sets that are not sampled are ignored.
    pub fn observe(&mut self, set: usize, tag: u64) {
        if !self.samples(set) {
            return;
        }
        let Some(stack) = self.shadow.get_mut(set / self.sample_stride) else {
            return;
        };
        let depth = match stack.iter().position(|&t| t == tag) {
            Some(pos) => {
                let _ = stack.remove(pos);
                pos + 1
            }
            None => {
                stack.truncate(self.ways.saturating_sub(1));
                self.ways + 1
            }
        };
        stack.insert(0, tag);
        for counter in &mut self.misses[..depth] {
            *counter += 1;
        }
    }

    /// Counts one real miss of the monitored core.
    pub const fn record_miss(&mut self) {
        self.miss_count += 1;
    }

    /// Projected misses if the core owned `ways` ways.
    ///
    /// Allocations beyond the monitored associativity are clamped.
    pub fn misses_at(&self, ways: usize) -> u64 {
        self.misses[ways.min(self.ways)]
    }

    /// The full projected miss curve, indexed by way count.
    pub fn miss_curve(&self) -> &[u64] {
        &self.misses
    }

    /// Real misses recorded since construction, decayed per epoch.
    pub const fn miss_count(&self) -> u64 {
        self.miss_count
    }

    /// Halves every counter, keeping the shadow tags.
    ///
    /// Older phases keep half their weight per epoch.
    pub fn decay(&mut self) {
        for counter in &mut self.misses {
            *counter /= 2;
        }
        self.miss_count /= 2;
    }

    /// Copies the counters out for reporting.
    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            misses: self.misses.clone(),
            miss_count: self.miss_count,
        }
    }
}
