//! Utility Partitioning Unit Tests.
//!
//! Verifies the split decision from miss curves, its tie-breaking, and the
//! epoch schedule that applies decisions to a shared cache.

use memsys_core::cache::Cache;
use memsys_core::cache::monitor::UtilityMonitor;
use memsys_core::partition::{Partitioner, partition};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::cache_config;

/// Monitor over one set whose curve is shaped by repeated reuse of `tags`.
fn monitor_with(ways: usize, tags: &[u64], rounds: usize) -> UtilityMonitor {
    let mut monitor = UtilityMonitor::new(1, ways, 1);
    for _ in 0..rounds {
        for &tag in tags {
            monitor.observe(0, tag);
        }
    }
    monitor
}

/// 16 KiB, 16-way cache: 16 sets.
fn shared_cache() -> Cache {
    let mut cache = Cache::new(&cache_config(16 * 1024, 16, 10));
    cache.enable_monitoring(2, 1);
    cache
}

// ══════════════════════════════════════════════════════════
// 1. Split decision
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(16, 8)]
#[case(8, 4)]
#[case(3, 1)]
#[case(1, 0)]
fn zero_utility_splits_evenly(#[case] ways: usize, #[case] core0: usize) {
    let monitors = [UtilityMonitor::new(4, ways, 1), UtilityMonitor::new(4, ways, 1)];
    assert_eq!(partition(&monitors, ways), core0);
}

#[test]
fn wrong_monitor_count_splits_evenly() {
    assert_eq!(partition(&[], 16), 8);
    assert_eq!(partition(&[UtilityMonitor::new(1, 16, 1)], 16), 8);
}

#[test]
fn working_set_sizes_drive_the_split() {
    // Core 0 loops over 6 lines, core 1 over 2: only a 6 + 2 split removes
    // every reuse miss.
    let core0 = monitor_with(8, &[1, 2, 3, 4, 5, 6], 4);
    let core1 = monitor_with(8, &[1, 2], 4);
    assert_eq!(partition(&[core0, core1], 8), 6);
}

#[test]
fn streaming_core_gets_nothing_it_cannot_use() {
    // Core 1 never reuses anything; core 0 needs 4 ways.
    let core0 = monitor_with(4, &[1, 2, 3, 4], 8);
    let core1 = monitor_with(4, &(100..132).collect::<Vec<_>>(), 1);
    assert_eq!(partition(&[core0, core1], 4), 4);
}

#[test]
fn ties_prefer_even_split() {
    // Both cores need one way; any k in 1..=3 of 4 is optimal.
    let core0 = monitor_with(4, &[7], 10);
    let core1 = monitor_with(4, &[9], 10);
    assert_eq!(partition(&[core0, core1], 4), 2);
}

#[test]
fn equidistant_ties_prefer_smaller_core0() {
    // 5 ways, neither core benefits: k = 2 and k = 3 are equally even.
    let monitors = [UtilityMonitor::new(1, 5, 1), UtilityMonitor::new(1, 5, 1)];
    assert_eq!(partition(&monitors, 5), 2);
}

proptest! {
    #[test]
    fn split_is_within_bounds(
        tags0 in prop::collection::vec(0u64..24, 0..96),
        tags1 in prop::collection::vec(0u64..24, 0..96),
        ways in 1usize..17,
    ) {
        let core0 = monitor_with(ways, &tags0, 1);
        let core1 = monitor_with(ways, &tags1, 1);
        let k = partition(&[core0.clone(), core1.clone()], ways);
        prop_assert!(k <= ways);

        // The chosen split is never worse than any other.
        let cost = |k: usize| core0.misses_at(k) + core1.misses_at(ways - k);
        for other in 0..=ways {
            prop_assert!(cost(k) <= cost(other));
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. Epoch schedule
// ══════════════════════════════════════════════════════════

#[test]
fn zero_epoch_is_clamped() {
    assert_eq!(Partitioner::new(0).epoch(), 1);
}

#[rstest]
#[case(1, true)]
#[case(2, false)]
#[case(99, false)]
#[case(100, true)]
#[case(250, false)]
#[case(300, true)]
fn due_at_first_cycle_and_epoch_multiples(#[case] cycle: u64, #[case] due: bool) {
    assert_eq!(Partitioner::new(100).is_due(cycle), due);
}

#[test]
fn first_cycle_splits_evenly_without_data() {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    assert_eq!(partitioner.tick(1, &mut l2), Some(8));
    assert_eq!(l2.partition(), Some(8));
    assert_eq!(l2.allowed_ways(0), 0..8);
    assert_eq!(l2.allowed_ways(1), 8..16);
    assert_eq!(partitioner.repartitions(), 1);
}

#[test]
fn first_cycle_ignores_collected_data() {
    let mut l2 = shared_cache();
    for line in 0..64 {
        let _ = l2.access(line, false, 0);
    }
    let mut partitioner = Partitioner::new(1000);
    assert_eq!(partitioner.tick(1, &mut l2), Some(8));
}

#[test]
fn off_boundary_cycles_do_nothing() {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    assert_eq!(partitioner.tick(2, &mut l2), None);
    assert_eq!(partitioner.tick(999, &mut l2), None);
    assert_eq!(l2.partition(), None);
    assert_eq!(partitioner.repartitions(), 0);
}

#[test]
fn repartition_runs_once_per_boundary_cycle() {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    assert!(partitioner.tick(1000, &mut l2).is_some());
    assert_eq!(partitioner.tick(1000, &mut l2), None);
    assert!(!partitioner.is_due(1000));
    assert!(partitioner.tick(2000, &mut l2).is_some());
    assert_eq!(partitioner.repartitions(), 2);
}

#[test]
fn catch_up_runs_skipped_boundaries() {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    // Boundaries 1000, 2000 and 3000 lie strictly inside (999, 3001).
    assert_eq!(partitioner.catch_up(999, 3001, &mut l2), 3);
    assert_eq!(partitioner.repartitions(), 3);
    assert_eq!(l2.partition(), Some(8));
}

#[rstest]
#[case::end_is_exclusive(1000, 2000, 0)]
#[case::start_is_exclusive(2000, 2500, 0)]
#[case::within_one_epoch(1001, 1999, 0)]
#[case::one_boundary(1999, 2001, 1)]
fn catch_up_interval_bounds(#[case] from: u64, #[case] to: u64, #[case] fired: u64) {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    assert_eq!(partitioner.catch_up(from, to, &mut l2), fired);
}

#[test]
fn catch_up_skips_boundary_already_ticked() {
    let mut l2 = shared_cache();
    let mut partitioner = Partitioner::new(1000);
    assert!(partitioner.tick(2000, &mut l2).is_some());
    assert_eq!(partitioner.catch_up(1500, 2500, &mut l2), 0);
    assert_eq!(partitioner.repartitions(), 1);
}

#[test]
fn tick_decays_monitors() {
    let mut l2 = shared_cache();
    // Core 1 misses on 8 distinct lines of set 0.
    for i in 0..8 {
        let _ = l2.access(i * 16, false, 1);
    }
    assert_eq!(l2.monitors()[1].misses_at(16), 8);
    assert_eq!(l2.monitors()[1].miss_count(), 8);

    let mut partitioner = Partitioner::new(1000);
    let _ = partitioner.tick(1000, &mut l2);
    assert_eq!(l2.monitors()[1].misses_at(16), 4);
    assert_eq!(l2.monitors()[1].miss_count(), 4);
}

#[test]
fn boundary_decision_uses_monitors() {
    let mut l2 = shared_cache();
    // Core 0 cycles through 12 lines of set 0; core 1 reuses a single line.
    for _ in 0..6 {
        for i in 0..12 {
            let _ = l2.access(i * 16, false, 0);
        }
        let _ = l2.access(1, false, 1);
    }
    let mut partitioner = Partitioner::new(1000);
    let core0 = partitioner.tick(1000, &mut l2).unwrap();
    assert!(core0 >= 12, "core 0 received only {core0} ways");
    assert!(core0 <= 15, "core 1 must keep the way it reuses");
}
