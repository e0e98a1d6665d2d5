//! Memory Controller Unit Tests.
//!
//! Verifies SimpleController (fixed latency) and DramController
//! (row-buffer-aware latency with CAS/RAS/precharge).

use memsys_core::dram::controller::{
    DramController, MemoryController, RowAccess, RowBufferStats, SimpleController,
};
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. SimpleController
// ══════════════════════════════════════════════════════════

#[test]
fn simple_controller_fixed_latency() {
    let mut ctrl = SimpleController::new(100);
    assert_eq!(ctrl.access_latency(0x1000), 100);
    assert_eq!(ctrl.access_latency(0x2000), 100);
    assert_eq!(ctrl.access_latency(u64::MAX), 100);
}

#[test]
fn simple_controller_zero_latency() {
    let mut ctrl = SimpleController::new(0);
    assert_eq!(ctrl.access_latency(0), 0);
}

// ══════════════════════════════════════════════════════════
// 2. DramController: row buffer
// ══════════════════════════════════════════════════════════

#[test]
fn dram_cold_start_latency() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    assert_eq!(ctrl.open_row(), None);
    // No row open: t_ras + t_cas.
    assert_eq!(ctrl.access_latency(0x1000), 15);
    assert_eq!(ctrl.open_row(), Some(0x1000 & !0x7FF));
}

#[test]
fn dram_row_buffer_hit() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    let _ = ctrl.access_latency(0x2000);
    // Same 2 KiB row: t_cas only.
    assert_eq!(ctrl.access_latency(0x2100), 5);
    assert_eq!(ctrl.access_latency(0x27FF), 5);
}

#[test]
fn dram_row_buffer_miss() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    let _ = ctrl.access_latency(0x1000);
    // Different row: t_pre + t_ras + t_cas.
    assert_eq!(ctrl.access_latency(0x2800), 23);
    assert_eq!(ctrl.open_row(), Some(0x2800));
}

#[test]
fn dram_row_miss_then_hit_in_new_row() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    let _ = ctrl.access_latency(0x0);
    assert_eq!(ctrl.access_latency(0x800), 23);
    assert_eq!(ctrl.access_latency(0x840), 5);
    assert_eq!(ctrl.access_latency(0x0), 23);
}

#[rstest]
#[case(1024, 0x3FF, 0x400)]
#[case(4096, 0xFFF, 0x1000)]
fn dram_row_size_sets_boundary(#[case] row_bytes: u64, #[case] last_in_row: u64, #[case] next_row: u64) {
    let mut ctrl = DramController::new(1, 2, 3, row_bytes);
    let _ = ctrl.access_latency(0);
    assert_eq!(ctrl.access_latency(last_in_row), 1);
    assert_eq!(ctrl.access_latency(next_row), 6);
}

#[test]
fn controllers_behind_trait_object() {
    let mut ctrls: Vec<Box<dyn MemoryController>> = vec![
        Box::new(SimpleController::new(7)),
        Box::new(DramController::new(1, 2, 3, 2048)),
    ];
    let latencies: Vec<_> = ctrls.iter_mut().map(|c| c.access_latency(0)).collect();
    assert_eq!(latencies, vec![7, 3]);
}

// ══════════════════════════════════════════════════════════
// 3. Row-buffer classification and counters
// ══════════════════════════════════════════════════════════

#[test]
fn classify_opens_row() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    assert_eq!(ctrl.classify(0x0), RowAccess::Empty);
    assert_eq!(ctrl.classify(0x10), RowAccess::Hit);
    assert_eq!(ctrl.classify(0x800), RowAccess::Conflict);
    assert_eq!(ctrl.latency(RowAccess::Conflict), 23);
}

#[test]
fn row_size_rounds_up_to_power_of_two() {
    let mut ctrl = DramController::new(1, 2, 3, 3000);
    let _ = ctrl.access_latency(0);
    // 3000 rounds to 4096.
    assert_eq!(ctrl.access_latency(4095), 1);
    assert_eq!(ctrl.access_latency(4096), 6);
}

#[test]
fn row_buffer_counters() {
    let mut ctrl = DramController::new(5, 10, 8, 2048);
    for addr in [0x0, 0x40, 0x80, 0x1000, 0x1040] {
        let _ = ctrl.access_latency(addr);
    }
    assert_eq!(
        ctrl.row_buffer_stats(),
        Some(RowBufferStats {
            hits: 3,
            empty: 1,
            conflicts: 1
        })
    );
    assert_eq!(SimpleController::new(1).row_buffer_stats(), None);
}
