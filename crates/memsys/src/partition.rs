//! Utility-based way partitioning of the shared L2.
//!
//! Every epoch the split of L2 ways between the two cores is recomputed from
//! the cores' sampled miss curves (see [`UtilityMonitor`]): the chosen split
//! `k` gives core 0 `k` ways and core 1 the rest, minimizing the total
//! projected misses. After each decision the monitors are decayed so that the
//! next epoch is dominated by recent behavior.

use crate::cache::Cache;
use crate::cache::monitor::UtilityMonitor;

/// Chooses the number of ways for core 0.
///
/// Every split `k` in `0..=total_ways` is scored as
/// `misses_0(k) + misses_1(total_ways - k)`. The lowest score wins; ties go
/// to the split closest to an even division, then to the smaller `k`.
/// Without exactly two monitors the even split is returned.
///
/// # Examples
///
/// ```
/// use memsys_core::cache::monitor::UtilityMonitor;
/// use memsys_core::partition::partition;
///
/// let monitors = [UtilityMonitor::new(4, 16, 1), UtilityMonitor::new(4, 16, 1)];
/// assert_eq!(partition(&monitors, 16), 8);
/// ```
pub fn partition(monitors: &[UtilityMonitor], total_ways: usize) -> usize {
    let [core0, core1] = monitors else {
        return total_ways / 2;
    };
    (0..=total_ways)
        .min_by_key(|&k| {
            let cost = core0.misses_at(k) + core1.misses_at(total_ways - k);
            (cost, (2 * k).abs_diff(total_ways), k)
        })
        .unwrap_or(total_ways / 2)
}

/// Epoch schedule for dynamic partitioning.
///
/// A repartition is due at cycle 1 and at every multiple of the epoch. The
/// cycle-1 decision ignores the monitors and splits evenly. A boundary cycle
/// triggers at most one repartition however many accesses it serves.
#[derive(Debug, Clone)]
pub struct Partitioner {
    epoch: u64,
    last_cycle: Option<u64>,
    repartitions: u64,
}

impl Partitioner {
    /// Creates a schedule repartitioning every `epoch` cycles.
    pub const fn new(epoch: u64) -> Self {
        Self {
            epoch: if epoch == 0 { 1 } else { epoch },
            last_cycle: None,
            repartitions: 0,
        }
    }

    /// Cycles between repartitions.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of repartitions performed.
    pub const fn repartitions(&self) -> u64 {
        self.repartitions
    }

    /// Returns `true` if a repartition must run before serving `cycle`.
    pub fn is_due(&self, cycle: u64) -> bool {
        (cycle == 1 || cycle % self.epoch == 0) && self.last_cycle != Some(cycle)
    }

    /// Repartitions `l2` if one is due at `cycle`.
    ///
    /// # Returns
    ///
    /// The new core-0 allocation, or `None` if nothing was due.
    pub fn tick(&mut self, cycle: u64, l2: &mut Cache) -> Option<usize> {
        if !self.is_due(cycle) {
            return None;
        }
        self.last_cycle = Some(cycle);

        let ways = l2.ways();
        let core0_ways = if cycle == 1 {
            ways / 2
        } else {
            partition(l2.monitors(), ways)
        };
        l2.set_partition(core0_ways);
        for monitor in l2.monitors_mut() {
            monitor.decay();
        }
        self.repartitions += 1;

        tracing::debug!(
            cycle,
            core0_ways,
            core1_ways = ways - core0_ways,
            "repartitioned shared cache"
        );
        Some(core0_ways)
    }

    /// Ticks every epoch boundary in the open interval `(from, to)`.
    ///
    /// # Returns
    ///
    /// The number of repartitions performed.
    pub fn catch_up(&mut self, from: u64, to: u64, l2: &mut Cache) -> u64 {
        let mut fired = 0;
        let mut boundary = (from / self.epoch).saturating_add(1).saturating_mul(self.epoch);
        while boundary < to {
            if self.tick(boundary, l2).is_some() {
                fired += 1;
            }
            boundary = boundary.saturating_add(self.epoch);
        }
        fired
    }
}
