//! Set-Associative Cache Model.
//!
//! This module implements the cache primitive every level of the hierarchy is
//! built from. It supports several replacement policies, optional way
//! partitioning between two cores, and optional per-core utility monitors.
//!
//! All addresses handled here are *line* addresses (`byte address / line
//! size`). For a cache with `S` sets, line `L` lives in set `L % S` with tag
//! `L / S`, so an evicted line's address is recovered as `tag * S + set`.

/// Per-core utility monitors (shadow tags and miss curves).
pub mod monitor;

/// Cache replacement policy implementations (LRU, MRU, FIFO, LFU, Random).
pub mod policies;

use std::ops::Range;

use serde::Serialize;

use self::monitor::UtilityMonitor;
use self::policies::ReplacementPolicy;
use crate::config::CacheConfig;

/// Result of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The line was resident.
    Hit,
    /// The line was not resident; nothing was installed.
    Miss,
}

impl Outcome {
    /// Returns `true` for [`Outcome::Hit`].
    #[inline]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// A valid line displaced by [`Cache::install`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictedLine {
    /// Line address reconstructed from the victim's tag and set.
    pub line_addr: u64,
    /// Whether the victim must be written back.
    pub dirty: bool,
    /// Core that installed the victim.
    pub core_id: usize,
}

/// Cache line entry containing tag, validity, dirty bit and owner.
#[derive(Clone, Copy, Default, Debug)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
    core_id: usize,
}

/// Access and eviction counters for one cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Read lookups (including instruction fetches).
    pub read_accesses: u64,
    /// Write lookups (stores and writebacks from the level above).
    pub write_accesses: u64,
    /// Read lookups that missed.
    pub read_misses: u64,
    /// Write lookups that missed.
    pub write_misses: u64,
    /// Installs that displaced a dirty line.
    pub dirty_evictions: u64,
}

impl CacheStats {
    /// Total lookups.
    pub const fn accesses(&self) -> u64 {
        self.read_accesses + self.write_accesses
    }

    /// Total misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// Miss ratio in `[0, 1]`, zero when the cache was never accessed.
    pub fn miss_rate(&self) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            self.misses() as f64 / accesses as f64
        }
    }
}

/// Set-associative cache with configurable replacement and optional
/// two-core way partitioning.
#[derive(Debug)]
pub struct Cache {
    /// Hit latency in cycles.
    pub latency: u64,
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    policy: Box<dyn ReplacementPolicy>,
    /// Ways owned by core 0; core 1 owns the remainder.
    core0_ways: Option<usize>,
    monitors: Vec<UtilityMonitor>,
    stats: CacheStats,
}

impl Cache {
    /// Creates a new cache with the specified configuration.
    ///
    /// A zero line size, associativity or capacity falls back to the
    /// reference values so that the set arithmetic is always defined;
    /// [`CacheConfig::validate`] rejects such configurations up front.
    pub fn new(config: &CacheConfig) -> Self {
        let ways = if config.ways == 0 { 1 } else { config.ways };
        let line_bytes = if config.line_bytes == 0 {
            64
        } else {
            config.line_bytes
        };
        let size_bytes = if config.size_bytes == 0 {
            4096
        } else {
            config.size_bytes
        };
        let num_sets = (size_bytes / line_bytes / ways).max(1);

        Self {
            latency: config.latency,
            lines: vec![CacheLine::default(); num_sets * ways],
            num_sets,
            ways,
            policy: policies::build(config.policy, num_sets, ways),
            core0_ways: None,
            monitors: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Counters accumulated so far.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    #[inline]
    const fn locate(&self, line_addr: u64) -> (usize, u64) {
        let sets = self.num_sets as u64;
        ((line_addr % sets) as usize, line_addr / sets)
    }

    fn find(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Restricts installs to per-core way ranges.
    ///
    /// Core 0 owns ways `[0, core0_ways)`, core 1 owns `[core0_ways, ways)`.
    /// Resident lines are not moved; a line left in the other core's range
    /// becomes a candidate victim for that core.
    pub fn set_partition(&mut self, core0_ways: usize) {
        self.core0_ways = Some(core0_ways.min(self.ways));
    }

    /// Current core-0 allocation, if the cache is partitioned.
    pub const fn partition(&self) -> Option<usize> {
        self.core0_ways
    }

    /// Ways `core_id` may install into and evict from.
    pub fn allowed_ways(&self, core_id: usize) -> Range<usize> {
        match self.core0_ways {
            None => 0..self.ways,
            Some(split) if core_id == 0 => 0..split,
            Some(split) => split..self.ways,
        }
    }

    /// Returns `true` if `core_id` owns no ways, so installs on its behalf
    /// are skipped.
    pub fn bypasses(&self, core_id: usize) -> bool {
        self.allowed_ways(core_id).is_empty()
    }

    /// Attaches one utility monitor per core, sampling every
    /// `sample_stride`-th set.
    pub fn enable_monitoring(&mut self, cores: usize, sample_stride: usize) {
        self.monitors = (0..cores)
            .map(|_| UtilityMonitor::new(self.num_sets, self.ways, sample_stride))
            .collect();
    }

    /// Utility monitors, indexed by core id (empty when monitoring is off).
    pub fn monitors(&self) -> &[UtilityMonitor] {
        &self.monitors
    }

    /// Mutable access to the utility monitors.
    pub fn monitors_mut(&mut self) -> &mut [UtilityMonitor] {
        &mut self.monitors
    }

    /// Checks if the cache holds `line_addr` without touching any state.
    pub fn probe(&self, line_addr: u64) -> bool {
        let (set, tag) = self.locate(line_addr);
        self.find(set, tag).is_some()
    }

    /// Returns the dirty bit of a resident line, `None` if it is absent.
    pub fn is_dirty(&self, line_addr: u64) -> Option<bool> {
        let (set, tag) = self.locate(line_addr);
        self.find(set, tag)
            .map(|way| self.lines[set * self.ways + way].dirty)
    }

    /// Looks up `line_addr` on behalf of `core_id`.
    ///
    /// On a hit the replacement state is refreshed and a write sets the
    /// dirty bit. A miss installs nothing; call [`Cache::install`] once the
    /// line has been fetched.
    pub fn access(&mut self, line_addr: u64, is_write: bool, core_id: usize) -> Outcome {
        let (set, tag) = self.locate(line_addr);
        if let Some(monitor) = self.monitors.get_mut(core_id) {
            monitor.observe(set, tag);
        }

        if is_write {
            self.stats.write_accesses += 1;
        } else {
            self.stats.read_accesses += 1;
        }

        if let Some(way) = self.find(set, tag) {
            self.policy.update(set, way);
            if is_write {
                self.lines[set * self.ways + way].dirty = true;
            }
            return Outcome::Hit;
        }

        if is_write {
            self.stats.write_misses += 1;
        } else {
            self.stats.read_misses += 1;
        }
        if let Some(monitor) = self.monitors.get_mut(core_id) {
            monitor.record_miss();
        }
        Outcome::Miss
    }

    /// Installs `line_addr` for `core_id` with `dirty = is_write`.
    ///
    /// The line goes to the lowest invalid way of the core's range, or
    /// replaces the policy's victim within that range.
    ///
    /// # Returns
    ///
    /// The displaced line when a valid line was overwritten, `None` when a
    /// free way was used or the core owns no ways. Callers that must keep a
    /// dirty line alive check [`Cache::bypasses`] first.
    pub fn install(&mut self, line_addr: u64, is_write: bool, core_id: usize) -> Option<EvictedLine> {
        let (set, tag) = self.locate(line_addr);
        let range = self.allowed_ways(core_id);
        if range.is_empty() {
            tracing::trace!(line_addr, core_id, "no ways allocated, install bypassed");
            return None;
        }

        let base = set * self.ways;
        let way = range
            .clone()
            .find(|&way| !self.lines[base + way].valid)
            .unwrap_or_else(|| self.policy.get_victim(set, range));

        let victim = self.lines[base + way];
        self.lines[base + way] = CacheLine {
            tag,
            valid: true,
            dirty: is_write,
            core_id,
        };
        self.policy.insert(set, way);

        if !victim.valid {
            return None;
        }
        if victim.dirty {
            self.stats.dirty_evictions += 1;
        }
        Some(EvictedLine {
            line_addr: victim.tag * self.num_sets as u64 + set as u64,
            dirty: victim.dirty,
            core_id: victim.core_id,
        })
    }
}
