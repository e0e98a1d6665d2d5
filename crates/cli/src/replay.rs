//! Trace replay clock.
//!
//! The clock starts at cycle 1. Each access is issued at the current cycle
//! and the clock then moves forward by the access's delay, at least one
//! cycle. Epoch boundaries stepped over by a long delay are handed to the
//! memory system before the next access, so dynamic partitioning sees every
//! boundary the clock passes.

use anyhow::{Result, bail};
use memsys_core::MemorySystem;

use crate::trace::TraceRecord;

/// Replays `records` through `memsys` and returns the final clock value.
///
/// # Errors
///
/// Fails on the first trace error or on a record naming a core the system
/// does not have.
pub fn replay<I>(memsys: &mut MemorySystem, records: I) -> Result<u64>
where
    I: IntoIterator<Item = Result<TraceRecord>>,
{
    let mut cycle: u64 = 1;
    for record in records {
        let record = record?;
        if record.core_id >= memsys.num_cores() {
            bail!(
                "line {}: core {} out of range for a {}-core configuration",
                record.line,
                record.core_id,
                memsys.num_cores()
            );
        }
        let delay = memsys.access(record.addr, record.access, record.core_id, cycle);
        let next = cycle + delay.max(1);
        memsys.advance(cycle, next);
        cycle = next;
    }
    Ok(cycle)
}
