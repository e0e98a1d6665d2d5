//! The memory system: hierarchy composition and the access chain.
//!
//! A [`MemorySystem`] is built once from a [`Config`]. The hierarchy variant
//! is resolved at construction into a concrete set of levels, so serving an
//! access is a single dispatch followed by the miss chain:
//!
//! 1. **Repartition:** for dynamically partitioned hierarchies, the shared
//!    cache split is recomputed when the supplied cycle is an epoch boundary.
//! 2. **Translate:** per-core hierarchies map the virtual address into the
//!    core's physical region.
//! 3. **Private level:** hit costs the L1 latency; a miss adds the shared
//!    level's delay, installs the line and pushes a dirty victim down as a
//!    writeback.
//! 4. **Shared level:** hit costs the L2 latency; a miss adds a DRAM read,
//!    installs within the core's partition and writes a dirty victim back to
//!    DRAM.
//!
//! Writebacks happen alongside execution: their latency never reaches the
//! returned delay.

use crate::cache::monitor::UtilityMonitor;
use crate::cache::{Cache, Outcome};
use crate::common::constants::MAX_CORES;
use crate::common::{AccessType, ConfigError, VirtAddr};
use crate::config::{Config, Hierarchy, PartitionPolicy};
use crate::dram::DramModel;
use crate::partition::Partitioner;
use crate::stats::{AccessStats, LevelStats, MemsysStats, PartitionStats};
use crate::translate::translate;

/// An instruction/data cache pair.
#[derive(Debug)]
struct PrivateCaches {
    icache: Cache,
    dcache: Cache,
}

impl PrivateCaches {
    fn new(config: &Config) -> Self {
        Self {
            icache: Cache::new(&config.l1_i),
            dcache: Cache::new(&config.l1_d),
        }
    }

    /// Cache serving `access`.
    fn select(&mut self, access: AccessType) -> &mut Cache {
        match access {
            AccessType::Ifetch => &mut self.icache,
            AccessType::Load | AccessType::Store => &mut self.dcache,
        }
    }
}

/// The shared L2 and the DRAM behind it.
#[derive(Debug)]
pub struct SharedLevel {
    l2: Cache,
    dram: DramModel,
}

impl SharedLevel {
    /// Combines an L2 cache with its DRAM backend.
    pub const fn new(l2: Cache, dram: DramModel) -> Self {
        Self { l2, dram }
    }

    /// The L2 cache.
    pub const fn l2(&self) -> &Cache {
        &self.l2
    }

    /// The DRAM backend.
    pub const fn dram(&self) -> &DramModel {
        &self.dram
    }

    /// Serves a fill request (`is_writeback == false`) or a writeback from
    /// the level above and returns its delay.
    ///
    /// A writeback is an ordinary write: on a hit it dirties the resident
    /// line, on a miss the line is fetched and installed dirty. When the core
    /// owns no L2 ways nothing is installed: a fill is served straight from
    /// DRAM and a writeback is written through to DRAM.
    pub fn access(&mut self, line_addr: u64, is_writeback: bool, core_id: usize) -> u64 {
        if self.l2.access(line_addr, is_writeback, core_id) == Outcome::Hit {
            return self.l2.latency;
        }

        if self.l2.bypasses(core_id) {
            if is_writeback {
                tracing::trace!(line_addr, core_id, "L2 bypassed, writeback sent to DRAM");
                let _ = self.dram.access(line_addr, true);
                return self.l2.latency;
            }
            return self.l2.latency + self.dram.access(line_addr, false);
        }

        let delay = self.l2.latency + self.dram.access(line_addr, false);
        if let Some(victim) = self.l2.install(line_addr, is_writeback, core_id) {
            if victim.dirty {
                tracing::trace!(
                    line_addr = victim.line_addr,
                    owner = victim.core_id,
                    "L2 dirty eviction written back to DRAM"
                );
                let _ = self.dram.access(victim.line_addr, true);
            }
        }
        delay
    }
}

/// Serves an access through a private cache backed by `shared`.
fn private_access(
    l1: &mut Cache,
    shared: &mut SharedLevel,
    line_addr: u64,
    is_write: bool,
    core_id: usize,
) -> u64 {
    if l1.access(line_addr, is_write, core_id) == Outcome::Hit {
        return l1.latency;
    }

    let delay = l1.latency + shared.access(line_addr, false, core_id);
    if let Some(victim) = l1.install(line_addr, is_write, core_id) {
        if victim.dirty {
            tracing::trace!(
                line_addr = victim.line_addr,
                core_id,
                "private dirty eviction written back to L2"
            );
            let _ = shared.access(victim.line_addr, true, core_id);
        }
    }
    delay
}

/// Levels instantiated for each hierarchy variant.
#[derive(Debug)]
enum Levels {
    DataCacheOnly {
        dcache: Cache,
    },
    TwoLevel {
        l1: PrivateCaches,
        shared: SharedLevel,
    },
    PerCore {
        cores: [PrivateCaches; MAX_CORES],
        shared: SharedLevel,
        partitioner: Option<Partitioner>,
    },
}

/// A complete memory hierarchy serving one access at a time.
#[derive(Debug)]
pub struct MemorySystem {
    levels: Levels,
    num_cores: usize,
    line_bytes: u64,
    stats: AccessStats,
}

impl MemorySystem {
    /// Validates `config` and builds the hierarchy it describes.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let shared = || {
            SharedLevel::new(
                Cache::new(&config.l2),
                DramModel::new(&config.dram, config.line_bytes()),
            )
        };

        let levels = match config.hierarchy {
            Hierarchy::DataCacheOnly => Levels::DataCacheOnly {
                dcache: Cache::new(&config.l1_d),
            },
            Hierarchy::TwoLevel => Levels::TwoLevel {
                l1: PrivateCaches::new(config),
                shared: shared(),
            },
            Hierarchy::PerCore => {
                let mut shared = shared();
                let partitioner = match config.partition {
                    PartitionPolicy::None => None,
                    PartitionPolicy::Static { core0_ways } => {
                        shared.l2.set_partition(core0_ways);
                        None
                    }
                    PartitionPolicy::Dynamic {
                        epoch,
                        sample_stride,
                    } => {
                        let ways = shared.l2.ways();
                        shared.l2.enable_monitoring(MAX_CORES, sample_stride);
                        shared.l2.set_partition(ways / 2);
                        Some(Partitioner::new(epoch))
                    }
                };
                Levels::PerCore {
                    cores: [PrivateCaches::new(config), PrivateCaches::new(config)],
                    shared,
                    partitioner,
                }
            }
        };

        tracing::debug!(
            hierarchy = ?config.hierarchy,
            cores = config.num_cores,
            partition = ?config.partition,
            "memory system constructed"
        );

        Ok(Self {
            levels,
            num_cores: config.num_cores,
            line_bytes: config.line_bytes() as u64,
            stats: AccessStats::default(),
        })
    }

    /// Serves one access issued by `core_id` at `cycle` and returns its
    /// delay in cycles.
    ///
    /// # Panics
    ///
    /// Panics if `core_id` is not below the configured core count.
    pub fn access(&mut self, addr: u64, access: AccessType, core_id: usize, cycle: u64) -> u64 {
        assert!(
            core_id < self.num_cores,
            "core {core_id} out of range for a {}-core memory system",
            self.num_cores
        );
        let vaddr = VirtAddr::new(addr);
        let is_write = access.is_write();

        let delay = match &mut self.levels {
            Levels::DataCacheOnly { dcache } => match access {
                AccessType::Ifetch => 0,
                AccessType::Load | AccessType::Store => {
                    let line_addr = vaddr.line(self.line_bytes);
                    if dcache.access(line_addr, is_write, core_id) == Outcome::Miss {
                        let _ = dcache.install(line_addr, is_write, core_id);
                    }
                    dcache.latency
                }
            },
            Levels::TwoLevel { l1, shared } => private_access(
                l1.select(access),
                shared,
                vaddr.line(self.line_bytes),
                is_write,
                core_id,
            ),
            Levels::PerCore {
                cores,
                shared,
                partitioner,
            } => {
                if let Some(partitioner) = partitioner {
                    let _ = partitioner.tick(cycle, &mut shared.l2);
                }
                let line_addr = translate(vaddr, core_id).line(self.line_bytes);
                private_access(
                    cores[core_id].select(access),
                    shared,
                    line_addr,
                    is_write,
                    core_id,
                )
            }
        };

        self.stats.record(access, delay);
        delay
    }

    /// Runs every repartition due strictly between cycles `from` and `to`.
    ///
    /// A driver that advances its clock by whole access delays calls this
    /// before issuing the access at `to`, so that no epoch boundary is
    /// skipped. Hierarchies without dynamic partitioning ignore it.
    pub fn advance(&mut self, from: u64, to: u64) {
        if let Levels::PerCore {
            shared,
            partitioner: Some(partitioner),
            ..
        } = &mut self.levels
        {
            let _ = partitioner.catch_up(from, to, &mut shared.l2);
        }
    }

    /// Number of cores the system serves.
    pub const fn num_cores(&self) -> usize {
        self.num_cores
    }

    /// Per-type access counters.
    pub const fn access_stats(&self) -> &AccessStats {
        &self.stats
    }

    /// Instruction cache serving `core_id`, if the hierarchy has one.
    pub fn icache(&self, core_id: usize) -> Option<&Cache> {
        match &self.levels {
            Levels::DataCacheOnly { .. } => None,
            Levels::TwoLevel { l1, .. } => Some(&l1.icache),
            Levels::PerCore { cores, .. } => cores.get(core_id).map(|pair| &pair.icache),
        }
    }

    /// Data cache serving `core_id`.
    pub fn dcache(&self, core_id: usize) -> Option<&Cache> {
        match &self.levels {
            Levels::DataCacheOnly { dcache } => Some(dcache),
            Levels::TwoLevel { l1, .. } => Some(&l1.dcache),
            Levels::PerCore { cores, .. } => cores.get(core_id).map(|pair| &pair.dcache),
        }
    }

    /// The shared level, if the hierarchy has one.
    pub const fn shared(&self) -> Option<&SharedLevel> {
        match &self.levels {
            Levels::DataCacheOnly { .. } => None,
            Levels::TwoLevel { shared, .. } | Levels::PerCore { shared, .. } => Some(shared),
        }
    }

    /// The L2 cache, if the hierarchy has one.
    pub fn l2(&self) -> Option<&Cache> {
        self.shared().map(SharedLevel::l2)
    }

    /// The DRAM backend, if the hierarchy has one.
    pub fn dram(&self) -> Option<&DramModel> {
        self.shared().map(SharedLevel::dram)
    }

    /// Copies every counter out of the hierarchy.
    pub fn stats(&self) -> MemsysStats {
        let level = |label: String, cache: &Cache| LevelStats {
            label,
            stats: *cache.stats(),
        };

        let (caches, partition) = match &self.levels {
            Levels::DataCacheOnly { dcache } => (vec![level("dcache".into(), dcache)], None),
            Levels::TwoLevel { l1, shared } => (
                vec![
                    level("icache".into(), &l1.icache),
                    level("dcache".into(), &l1.dcache),
                    level("l2cache".into(), &shared.l2),
                ],
                None,
            ),
            Levels::PerCore {
                cores,
                shared,
                partitioner,
            } => {
                let mut caches = Vec::with_capacity(2 * MAX_CORES + 1);
                for (core_id, pair) in cores.iter().enumerate() {
                    caches.push(level(format!("icache_{core_id}"), &pair.icache));
                    caches.push(level(format!("dcache_{core_id}"), &pair.dcache));
                }
                caches.push(level("l2cache".into(), &shared.l2));

                let partition = shared.l2.partition().map(|core0_ways| PartitionStats {
                    core0_ways,
                    core1_ways: shared.l2.ways() - core0_ways,
                    repartitions: partitioner.as_ref().map_or(0, Partitioner::repartitions),
                    monitors: shared
                        .l2
                        .monitors()
                        .iter()
                        .map(UtilityMonitor::snapshot)
                        .collect(),
                });
                (caches, partition)
            }
        };

        MemsysStats {
            accesses: self.stats,
            caches,
            dram: self.dram().map(DramModel::stats),
            partition,
        }
    }
}
