//! Main memory backend.
//!
//! The [`DramModel`] sits below the last cache level. It accepts line reads
//! (fills) and line writes (writebacks), asks its controller for a latency and
//! keeps read/write counters. Whether a latency lands on the critical path is
//! decided by the caller: fills are charged, writebacks are not.

/// Memory controller implementations for access latency modeling.
pub mod controller;

use serde::Serialize;

use self::controller::{DramController, MemoryController, RowBufferStats, SimpleController};
use crate::config::{DramConfig, MemoryController as ControllerType};

/// Read/write counters of the DRAM backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DramStats {
    /// Line reads (cache fills).
    pub reads: u64,
    /// Line writes (dirty evictions).
    pub writes: u64,
    /// Cycles reported for all reads.
    pub read_delay: u64,
    /// Cycles reported for all writes.
    pub write_delay: u64,
    /// Row-buffer outcomes, when the controller models a row buffer.
    pub row_buffer: Option<RowBufferStats>,
}

/// DRAM backend: a latency controller plus counters.
#[derive(Debug)]
pub struct DramModel {
    controller: Box<dyn MemoryController>,
    line_bytes: u64,
    stats: DramStats,
}

impl DramModel {
    /// Builds the backend described by `config` for lines of `line_bytes`.
    pub fn new(config: &DramConfig, line_bytes: usize) -> Self {
        let controller: Box<dyn MemoryController> = match config.controller {
            ControllerType::Simple => Box::new(SimpleController::new(config.latency)),
            ControllerType::Dram => Box::new(DramController::new(
                config.t_cas,
                config.t_ras,
                config.t_pre,
                config.row_bytes,
            )),
        };
        Self::with_controller(controller, line_bytes)
    }

    /// Builds a backend around an explicit controller.
    pub fn with_controller(controller: Box<dyn MemoryController>, line_bytes: usize) -> Self {
        Self {
            controller,
            line_bytes: line_bytes.max(1) as u64,
            stats: DramStats::default(),
        }
    }

    /// Performs a line read or write and returns its latency.
    pub fn access(&mut self, line_addr: u64, is_write: bool) -> u64 {
        let delay = self.controller.access_latency(line_addr * self.line_bytes);
        if is_write {
            self.stats.writes += 1;
            self.stats.write_delay += delay;
        } else {
            self.stats.reads += 1;
            self.stats.read_delay += delay;
        }
        delay
    }

    /// Counters accumulated so far, including the controller's row-buffer
    /// outcomes.
    pub fn stats(&self) -> DramStats {
        DramStats {
            row_buffer: self.controller.row_buffer_stats(),
            ..self.stats
        }
    }
}
