//! Memory system statistics.
//!
//! Counters are accumulated while accesses are served and exposed as plain,
//! serializable values. Nothing here formats output; reporting belongs to
//! whoever drives the model.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::cache::monitor::MonitorSnapshot;
use crate::common::AccessType;
use crate::dram::DramStats;

/// Count and cumulative delay for one access type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TypeStats {
    /// Completed accesses.
    pub count: u64,
    /// Sum of the delays returned for them.
    pub delay: u64,
}

impl TypeStats {
    /// Mean delay per access, zero when there were none.
    pub fn avg_delay(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.delay as f64 / self.count as f64
        }
    }
}

/// Per-type access statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccessStats {
    /// Instruction fetches.
    pub ifetch: TypeStats,
    /// Loads.
    pub load: TypeStats,
    /// Stores.
    pub store: TypeStats,
}

impl AccessStats {
    /// Accounts one completed access.
    pub const fn record(&mut self, access: AccessType, delay: u64) {
        let entry = match access {
            AccessType::Ifetch => &mut self.ifetch,
            AccessType::Load => &mut self.load,
            AccessType::Store => &mut self.store,
        };
        entry.count += 1;
        entry.delay += delay;
    }

    /// Counters for one access type.
    pub const fn get(&self, access: AccessType) -> &TypeStats {
        match access {
            AccessType::Ifetch => &self.ifetch,
            AccessType::Load => &self.load,
            AccessType::Store => &self.store,
        }
    }

    /// Accesses of every type.
    pub const fn total_count(&self) -> u64 {
        self.ifetch.count + self.load.count + self.store.count
    }
}

/// Counters of one cache, labelled with its position in the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Cache label, e.g. `dcache_0` or `l2cache`.
    pub label: String,
    /// The cache's counters.
    #[serde(flatten)]
    pub stats: CacheStats,
}

/// State of the shared-cache way partition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Ways currently owned by core 0.
    pub core0_ways: usize,
    /// Ways currently owned by core 1.
    pub core1_ways: usize,
    /// Repartitions performed (always zero for a static split).
    pub repartitions: u64,
    /// Utility monitor counters per core (empty for a static split).
    pub monitors: Vec<MonitorSnapshot>,
}

/// Snapshot of every counter in a memory system.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MemsysStats {
    /// Per-type access counts and delays.
    pub accesses: AccessStats,
    /// Per-cache counters in hierarchy order.
    pub caches: Vec<LevelStats>,
    /// DRAM counters, if the hierarchy has a DRAM backend.
    pub dram: Option<DramStats>,
    /// Partition state, if the shared cache is partitioned.
    pub partition: Option<PartitionStats>,
}

impl MemsysStats {
    /// Counters of the cache labelled `label`.
    pub fn cache(&self, label: &str) -> Option<&CacheStats> {
        self.caches
            .iter()
            .find(|level| level.label == label)
            .map(|level| &level.stats)
    }
}
