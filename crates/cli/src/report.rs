//! Statistics report printing.
//!
//! Formats a [`MemsysStats`] snapshot as text sections on stdout. Sections can
//! be selected individually; an empty selection prints all of them.

use std::time::Duration;

use memsys_core::AccessType;
use memsys_core::stats::MemsysStats;

/// Valid section identifiers for `--sections`.
pub const REPORT_SECTIONS: &[&str] = &["summary", "accesses", "caches", "dram", "partition"];

const RULE: &str = "==========================================================";
const THIN_RULE: &str = "----------------------------------------------------------";

/// Prints the requested sections of `stats`.
///
/// # Arguments
///
/// * `stats` - Snapshot taken after the trace was replayed.
/// * `cycles` - Final value of the driving clock.
/// * `elapsed` - Host time spent replaying.
/// * `sections` - Section names to print, or empty for all.
pub fn print_sections(stats: &MemsysStats, cycles: u64, elapsed: Duration, sections: &[String]) {
    let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

    println!("\n{RULE}");
    println!("MEMORY SYSTEM STATISTICS");
    println!("{RULE}");

    if want("summary") {
        let seconds = elapsed.as_secs_f64().max(f64::EPSILON);
        let total = stats.accesses.total_count();
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {cycles}");
        println!("sim_accesses             {total}");
        println!(
            "sim_access_rate          {:.2} k/s",
            total as f64 / seconds / 1000.0
        );
        println!("{THIN_RULE}");
    }

    if want("accesses") {
        println!("ACCESSES");
        for access in AccessType::ALL {
            let entry = stats.accesses.get(access);
            println!(
                "  {:<8} count: {:<12} | delay: {:<14} | avg_delay: {:.3}",
                access.name(),
                entry.count,
                entry.delay,
                entry.avg_delay()
            );
        }
        println!("{THIN_RULE}");
    }

    if want("caches") {
        println!("CACHES");
        for level in &stats.caches {
            let cache = &level.stats;
            println!(
                "  {:<9} reads: {:<10} writes: {:<10} read_miss: {:<10} write_miss: {:<10} dirty_evicts: {:<8} miss_rate: {:.2}%",
                level.label,
                cache.read_accesses,
                cache.write_accesses,
                cache.read_misses,
                cache.write_misses,
                cache.dirty_evictions,
                cache.miss_rate() * 100.0
            );
        }
        println!("{THIN_RULE}");
    }

    if want("dram") {
        if let Some(dram) = &stats.dram {
            println!("DRAM");
            println!("  reads                  {}", dram.reads);
            println!("  writes                 {}", dram.writes);
            println!("  read_delay             {}", dram.read_delay);
            println!("  write_delay            {}", dram.write_delay);
            if let Some(rows) = &dram.row_buffer {
                let total = (rows.hits + rows.empty + rows.conflicts).max(1);
                println!(
                    "  row_buffer             hits: {} | empty: {} | conflicts: {} | hit_rate: {:.2}%",
                    rows.hits,
                    rows.empty,
                    rows.conflicts,
                    rows.hits as f64 / total as f64 * 100.0
                );
            }
            println!("{THIN_RULE}");
        }
    }

    if want("partition") {
        if let Some(partition) = &stats.partition {
            println!("L2 PARTITION");
            println!("  core0_ways             {}", partition.core0_ways);
            println!("  core1_ways             {}", partition.core1_ways);
            println!("  repartitions           {}", partition.repartitions);
            for (core_id, monitor) in partition.monitors.iter().enumerate() {
                println!(
                    "  umon_{core_id}.misses          {} (curve: {:?})",
                    monitor.miss_count, monitor.misses
                );
            }
            println!("{THIN_RULE}");
        }
    }

    println!("{RULE}");
}
