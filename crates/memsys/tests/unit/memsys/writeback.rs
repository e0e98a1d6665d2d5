//! Writeback Propagation Tests.
//!
//! Dirty victims travel one level down as writes: an L1 victim becomes an L2
//! write, an L2 victim becomes a DRAM write. Neither adds to the delay of the
//! access that displaced it.
//!
//! The hierarchy used here has a direct-mapped 1 KiB L1 (16 sets) and a
//! direct-mapped 2 KiB L2 (32 sets), with no translation:
//!
//! - line `L` lives in L1 set `L % 16` and L2 set `L % 32`;
//! - byte addresses 0, 1024 and 2048 are lines 0, 16 and 32.

use memsys_core::config::{Config, Hierarchy};
use pretty_assertions::assert_eq;

use crate::common::harness::{
    FULL_MISS, L1_LATENCY, L2_LATENCY, TestContext, cache_config, small_config,
};

fn tiny_l2_config() -> Config {
    let mut config = small_config(Hierarchy::TwoLevel);
    config.l2 = cache_config(2048, 1, L2_LATENCY);
    config
}

#[test]
fn dirty_l1_victim_becomes_l2_write() {
    let mut ctx = TestContext::new(&tiny_l2_config());
    assert_eq!(ctx.store(0, 0), FULL_MISS);

    // Displaces dirty line 0 from L1 set 0.
    assert_eq!(ctx.load(0, 1024), FULL_MISS);

    let l2 = ctx.memsys.l2().unwrap();
    assert_eq!(l2.is_dirty(0), Some(true));
    assert_eq!(l2.stats().write_accesses, 1);
    assert_eq!(l2.stats().write_misses, 0);
    assert_eq!(ctx.memsys.dcache(0).unwrap().stats().dirty_evictions, 1);

    let dram = ctx.memsys.dram().unwrap().stats();
    assert_eq!(dram.reads, 2);
    assert_eq!(dram.writes, 0);
}

#[test]
fn dirty_l2_victim_becomes_dram_write() {
    let mut ctx = TestContext::new(&tiny_l2_config());
    let _ = ctx.store(0, 0);
    let _ = ctx.load(0, 1024);

    // Line 32 maps to L2 set 0 and displaces the dirty line 0.
    let delay = ctx.load(0, 2048);
    assert_eq!(delay, FULL_MISS, "the DRAM write must stay off the critical path");

    let l2 = ctx.memsys.l2().unwrap();
    assert_eq!(l2.is_dirty(0), None);
    assert_eq!(l2.stats().dirty_evictions, 1);

    let dram = ctx.memsys.dram().unwrap().stats();
    assert_eq!(dram.writes, 1);
    assert_eq!(dram.reads, 3);
    assert_eq!(dram.write_delay, 100);
}

#[test]
fn writeback_missing_in_l2_is_fetched_and_installed_dirty() {
    let mut ctx = TestContext::new(&tiny_l2_config());
    let _ = ctx.store(0, 0);
    // The instruction side pushes line 0 out of L2 while the data cache
    // still holds it dirty.
    assert_eq!(ctx.ifetch(0, 2048), FULL_MISS);
    assert!(!ctx.memsys.l2().unwrap().probe(0));

    // The writeback misses in L2: one extra DRAM read, no extra delay.
    assert_eq!(ctx.load(0, 1024), FULL_MISS);

    let l2 = ctx.memsys.l2().unwrap();
    assert_eq!(l2.is_dirty(0), Some(true));
    assert_eq!(l2.stats().write_misses, 1);

    let dram = ctx.memsys.dram().unwrap().stats();
    assert_eq!(dram.reads, 4);
    assert_eq!(dram.writes, 0);
}

#[test]
fn clean_victims_are_dropped() {
    let mut ctx = TestContext::new(&tiny_l2_config());
    let _ = ctx.load(0, 0);
    let _ = ctx.load(0, 1024);
    let _ = ctx.load(0, 2048);

    assert_eq!(ctx.memsys.l2().unwrap().stats().write_accesses, 0);
    assert_eq!(ctx.memsys.dram().unwrap().stats().writes, 0);
}

#[test]
fn per_core_writeback_stays_in_core_region() {
    let mut config = small_config(Hierarchy::PerCore);
    config.l2 = cache_config(2048, 1, L2_LATENCY);
    let mut ctx = TestContext::new(&config);

    let _ = ctx.store(1, 0);
    assert_eq!(ctx.load(1, 1024), FULL_MISS);
    assert_eq!(ctx.memsys.l2().unwrap().stats().write_accesses, 1);
    assert_eq!(ctx.memsys.l2().unwrap().stats().write_misses, 0);
    assert_eq!(ctx.load(1, 0), L1_LATENCY + L2_LATENCY);
    // Core 0's view of address 0 is a different line.
    assert_eq!(ctx.load(0, 0), FULL_MISS);
}
