//! DRAM latency controllers.
//!
//! A controller turns a physical byte address into a latency. Two are
//! provided:
//! 1. **SimpleController:** Every access costs the same number of cycles.
//! 2. **DramController:** A single open-row buffer; the latency depends on
//!    whether the row is already open, no row is open, or another row must be
//!    closed first.
//!
//! The [`DramModel`](super::DramModel) converts line addresses to byte
//! addresses before consulting its controller.

use std::fmt::Debug;

use serde::Serialize;

/// Latency source for the DRAM backend.
pub trait MemoryController: Debug + Send + Sync {
    /// Cycles taken by an access to byte address `addr`.
    fn access_latency(&mut self, addr: u64) -> u64;

    /// Row-buffer counters, for controllers that model a row buffer.
    fn row_buffer_stats(&self) -> Option<RowBufferStats> {
        None
    }
}

/// Fixed-latency controller.
#[derive(Debug, Clone)]
pub struct SimpleController {
    latency: u64,
}

impl SimpleController {
    /// Creates a controller charging `latency` cycles per access.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

/// How an access found the row buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowAccess {
    /// The addressed row was open: column access only.
    Hit,
    /// No row was open: activate, then column access.
    Empty,
    /// Another row was open: precharge, activate, then column access.
    Conflict,
}

/// Row-buffer outcome counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RowBufferStats {
    /// Accesses to the open row.
    pub hits: u64,
    /// Accesses with no row open.
    pub empty: u64,
    /// Accesses that closed another row.
    pub conflicts: u64,
}

/// Open-row DRAM timing.
///
/// # Examples
///
/// ```
/// use memsys_core::dram::controller::{DramController, MemoryController};
///
/// let mut dram = DramController::new(14, 14, 14, 2048);
/// assert_eq!(dram.access_latency(0x0), 28);
/// assert_eq!(dram.access_latency(0x40), 14);
/// assert_eq!(dram.access_latency(0x800), 42);
/// ```
#[derive(Debug, Clone)]
pub struct DramController {
    t_cas: u64,
    t_ras: u64,
    t_pre: u64,
    row_shift: u32,
    open_row: Option<u64>,
    stats: RowBufferStats,
}

impl DramController {
    /// Creates a controller with all rows closed.
    ///
    /// # Arguments
    ///
    /// * `t_cas` - Column access latency.
    /// * `t_ras` - Row activation latency.
    /// * `t_pre` - Precharge latency.
    /// * `row_bytes` - Row size in bytes; rounded up to a power of two.
    pub const fn new(t_cas: u64, t_ras: u64, t_pre: u64, row_bytes: u64) -> Self {
        let row_bytes = if row_bytes == 0 {
            1
        } else {
            row_bytes.next_power_of_two()
        };
        Self {
            t_cas,
            t_ras,
            t_pre,
            row_shift: row_bytes.trailing_zeros(),
            open_row: None,
            stats: RowBufferStats {
                hits: 0,
                empty: 0,
                conflicts: 0,
            },
        }
    }

    /// Base byte address of the open row, if any.
    pub const fn open_row(&self) -> Option<u64> {
        match self.open_row {
            Some(row) => Some(row << self.row_shift),
            None => None,
        }
    }

    /// Classifies an access to `addr` and opens its row.
    pub fn classify(&mut self, addr: u64) -> RowAccess {
        let row = addr >> self.row_shift;
        let outcome = match self.open_row {
            Some(open) if open == row => RowAccess::Hit,
            Some(_) => RowAccess::Conflict,
            None => RowAccess::Empty,
        };
        self.open_row = Some(row);
        outcome
    }

    /// Cycles charged for `outcome`.
    pub const fn latency(&self, outcome: RowAccess) -> u64 {
        match outcome {
            RowAccess::Hit => self.t_cas,
            RowAccess::Empty => self.t_ras + self.t_cas,
            RowAccess::Conflict => self.t_pre + self.t_ras + self.t_cas,
        }
    }
}

impl MemoryController for DramController {
    fn access_latency(&mut self, addr: u64) -> u64 {
        let outcome = self.classify(addr);
        match outcome {
            RowAccess::Hit => self.stats.hits += 1,
            RowAccess::Empty => self.stats.empty += 1,
            RowAccess::Conflict => self.stats.conflicts += 1,
        }
        self.latency(outcome)
    }

    fn row_buffer_stats(&self) -> Option<RowBufferStats> {
        Some(self.stats)
    }
}
