//! Configuration system for the memory hierarchy model.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a [`MemorySystem`](crate::memsys::MemorySystem). It provides:
//! 1. **Defaults:** Baseline geometry and latencies of the reference hierarchy.
//! 2. **Structures:** Hierarchy variant, per-cache geometry, L2 partitioning and DRAM timing.
//! 3. **Validation:** Structural checks run once, before any cache is built.
//!
//! Configuration is usually supplied as JSON (see [`Config::from_json`]);
//! `Config::default()` describes the two-core hierarchy without partitioning.

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::ConfigError;
use crate::common::constants::MAX_CORES;

/// Default configuration constants.
///
/// These values define the baseline hierarchy when a field is not
/// explicitly present in the configuration file.
mod defaults {
    /// Number of cores driving the hierarchy.
    pub const NUM_CORES: usize = 2;

    /// Cache line size in bytes, shared by every level.
    pub const LINE_BYTES: usize = 64;

    /// Private L1 capacity (32 KiB).
    pub const L1_SIZE: usize = 32 * 1024;

    /// Private L1 associativity.
    pub const L1_WAYS: usize = 8;

    /// Private L1 hit latency in cycles.
    pub const L1_LATENCY: u64 = 1;

    /// Shared L2 capacity (1 MiB).
    pub const L2_SIZE: usize = 1024 * 1024;

    /// Shared L2 associativity.
    pub const L2_WAYS: usize = 16;

    /// Shared L2 hit latency in cycles.
    pub const L2_LATENCY: u64 = 10;

    /// Fixed DRAM access latency in cycles.
    pub const DRAM_LATENCY: u64 = 100;

    /// CAS latency in DRAM cycles (row-buffer controller).
    pub const T_CAS: u64 = 14;

    /// RAS latency in DRAM cycles (row-buffer controller).
    pub const T_RAS: u64 = 14;

    /// Precharge latency in DRAM cycles (row-buffer controller).
    pub const T_PRE: u64 = 14;

    /// DRAM row size in bytes (row-buffer controller).
    pub const ROW_BYTES: u64 = 2048;

    /// Cycles between two utility-based repartitions.
    pub const PARTITION_EPOCH: u64 = 5_000_000;

    /// Every n-th L2 set feeds the utility monitors.
    pub const SAMPLE_STRIDE: usize = 1;
}

/// Which levels exist and how they are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Hierarchy {
    /// A lone data cache; misses are not charged to any backing level.
    DataCacheOnly,
    /// One instruction/data cache pair in front of an L2 and DRAM.
    TwoLevel,
    /// Private instruction/data caches per core, a shared L2 and DRAM.
    ///
    /// Requires exactly two cores; addresses are translated per core.
    #[default]
    PerCore,
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which cache line to evict
/// when a new line must be installed in a full set (or a full partition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Most Recently Used replacement policy.
    #[serde(alias = "Mru")]
    Mru,
    /// First In First Out replacement policy (insertion order).
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Frequently Used replacement policy.
    #[serde(alias = "Lfu")]
    Lfu,
    /// Pseudo-random replacement with a fixed seed.
    #[serde(alias = "Random")]
    Random,
}

/// Memory controller implementation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MemoryController {
    /// Every access takes `latency` cycles.
    #[default]
    Simple,
    /// Row-buffer timing with CAS, RAS and precharge latencies.
    #[serde(alias = "DRAM")]
    Dram,
}

/// How the shared L2 ways are divided between the two cores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PartitionPolicy {
    /// Both cores share every way.
    #[default]
    None,
    /// A fixed split: core 0 owns the first `core0_ways` ways, core 1 the rest.
    Static {
        /// Ways owned by core 0.
        core0_ways: usize,
    },
    /// Utility-based partitioning recomputed every `epoch` cycles.
    Dynamic {
        /// Cycles between repartitions.
        #[serde(default = "PartitionPolicy::default_epoch")]
        epoch: u64,
        /// Every n-th set feeds the utility monitors.
        #[serde(default = "PartitionPolicy::default_sample_stride")]
        sample_stride: usize,
    },
}

impl PartitionPolicy {
    /// Returns the default repartition epoch in cycles.
    fn default_epoch() -> u64 {
        defaults::PARTITION_EPOCH
    }

    /// Returns the default monitor sampling stride.
    fn default_sample_stride() -> usize {
        defaults::SAMPLE_STRIDE
    }

    /// Dynamic partitioning with the default epoch and sampling stride.
    pub const fn dynamic() -> Self {
        Self::Dynamic {
            epoch: defaults::PARTITION_EPOCH,
            sample_stride: defaults::SAMPLE_STRIDE,
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use memsys_core::config::{Config, Hierarchy, PartitionPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.hierarchy, Hierarchy::PerCore);
/// assert_eq!(config.l2.ways, 16);
/// assert_eq!(config.partition, PartitionPolicy::None);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use memsys_core::config::{Config, PartitionPolicy, ReplacementPolicy};
///
/// let json = r#"{
///     "hierarchy": "PerCore",
///     "num_cores": 2,
///     "l1_d": { "size_bytes": 1024, "ways": 1 },
///     "l2": { "size_bytes": 65536, "ways": 16, "latency": 10, "policy": "Lru" },
///     "partition": { "Dynamic": { "epoch": 100000 } },
///     "dram": { "controller": "Simple", "latency": 100 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.l1_d.ways, 1);
/// assert_eq!(config.l2.policy, ReplacementPolicy::Lru);
/// assert_eq!(
///     config.partition,
///     PartitionPolicy::Dynamic { epoch: 100_000, sample_stride: 1 }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Hierarchy variant
    #[serde(default)]
    pub hierarchy: Hierarchy,

    /// Number of cores issuing accesses
    #[serde(default = "Config::default_num_cores")]
    pub num_cores: usize,

    /// Private instruction cache
    #[serde(default = "CacheConfig::l1")]
    pub l1_i: CacheConfig,

    /// Private data cache
    #[serde(default = "CacheConfig::l1")]
    pub l1_d: CacheConfig,

    /// Shared second-level cache; omitted fields take the L2 defaults
    #[serde(
        default = "CacheConfig::l2",
        deserialize_with = "SharedCacheFields::deserialize_into"
    )]
    pub l2: CacheConfig,

    /// L2 way partitioning between the two cores
    #[serde(default)]
    pub partition: PartitionPolicy,

    /// Main memory timing
    #[serde(default)]
    pub dram: DramConfig,
}

impl Config {
    /// Returns the default number of cores.
    fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }

    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error reported by [`Config::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Line size shared by every instantiated cache.
    pub const fn line_bytes(&self) -> usize {
        self.l1_d.line_bytes
    }

    /// Caches instantiated by the selected hierarchy, with their labels.
    pub fn instantiated_caches(&self) -> Vec<(&'static str, &CacheConfig)> {
        match self.hierarchy {
            Hierarchy::DataCacheOnly => vec![("l1_d", &self.l1_d)],
            Hierarchy::TwoLevel | Hierarchy::PerCore => {
                vec![("l1_i", &self.l1_i), ("l1_d", &self.l1_d), ("l2", &self.l2)]
            }
        }
    }

    /// Checks the configuration for structural errors.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: core count, cache geometry,
    /// line-size consistency, then partitioning parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_cores == 0 {
            return Err(ConfigError::NoCores);
        }
        if self.hierarchy == Hierarchy::PerCore && self.num_cores != MAX_CORES {
            return Err(ConfigError::CoreCount {
                expected: MAX_CORES,
                found: self.num_cores,
            });
        }

        let line_bytes = self.line_bytes();
        for (label, cache) in self.instantiated_caches() {
            cache.validate(label)?;
            if cache.line_bytes != line_bytes {
                return Err(ConfigError::LineSizeMismatch {
                    cache: label,
                    expected: line_bytes,
                    found: cache.line_bytes,
                });
            }
        }

        if self.dram.controller == MemoryController::Dram && !self.dram.row_bytes.is_power_of_two()
        {
            return Err(ConfigError::Geometry {
                cache: "dram",
                reason: format!("row size {} is not a power of two", self.dram.row_bytes),
            });
        }

        match self.partition {
            PartitionPolicy::None => {}
            PartitionPolicy::Static { core0_ways } => {
                if self.hierarchy != Hierarchy::PerCore {
                    return Err(ConfigError::PartitionWithoutSharedL2);
                }
                if core0_ways > self.l2.ways {
                    return Err(ConfigError::PartitionWays {
                        core0_ways,
                        ways: self.l2.ways,
                    });
                }
            }
            PartitionPolicy::Dynamic {
                epoch,
                sample_stride,
            } => {
                if self.hierarchy != Hierarchy::PerCore {
                    return Err(ConfigError::PartitionWithoutSharedL2);
                }
                if epoch == 0 {
                    return Err(ConfigError::ZeroPartitionParameter("epoch"));
                }
                if sample_stride == 0 {
                    return Err(ConfigError::ZeroPartitionParameter("sample_stride"));
                }
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hierarchy: Hierarchy::default(),
            num_cores: defaults::NUM_CORES,
            l1_i: CacheConfig::l1(),
            l1_d: CacheConfig::l1(),
            l2: CacheConfig::l2(),
            partition: PartitionPolicy::default(),
            dram: DramConfig::default(),
        }
    }
}

/// Individual cache level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_l1_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_l1_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Hit latency in cycles
    #[serde(default = "CacheConfig::default_l1_latency")]
    pub latency: u64,
}

impl CacheConfig {
    /// Returns the default L1 size in bytes.
    fn default_l1_size() -> usize {
        defaults::L1_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::LINE_BYTES
    }

    /// Returns the default L1 associativity.
    fn default_l1_ways() -> usize {
        defaults::L1_WAYS
    }

    /// Returns the default L1 hit latency in cycles.
    fn default_l1_latency() -> u64 {
        defaults::L1_LATENCY
    }

    /// The reference private cache: 32 KiB, 8-way, 1 cycle.
    pub fn l1() -> Self {
        Self {
            size_bytes: defaults::L1_SIZE,
            line_bytes: defaults::LINE_BYTES,
            ways: defaults::L1_WAYS,
            policy: ReplacementPolicy::default(),
            latency: defaults::L1_LATENCY,
        }
    }

    /// The reference shared cache: 1 MiB, 16-way, 10 cycles.
    pub fn l2() -> Self {
        Self {
            size_bytes: defaults::L2_SIZE,
            line_bytes: defaults::LINE_BYTES,
            ways: defaults::L2_WAYS,
            policy: ReplacementPolicy::default(),
            latency: defaults::L2_LATENCY,
        }
    }

    /// Number of sets described by this geometry.
    ///
    /// Only meaningful once [`CacheConfig::validate`] has passed.
    pub const fn num_sets(&self) -> usize {
        if self.line_bytes == 0 || self.ways == 0 {
            return 0;
        }
        self.size_bytes / self.line_bytes / self.ways
    }

    /// Checks that the geometry describes at least one whole set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Geometry`] naming `label` when the line size is
    /// zero or not a power of two, the associativity is zero, or the
    /// capacity is not a non-zero multiple of `line_bytes * ways`.
    pub fn validate(&self, label: &'static str) -> Result<(), ConfigError> {
        let fail = |reason: String| ConfigError::Geometry {
            cache: label,
            reason,
        };
        if self.line_bytes == 0 || !self.line_bytes.is_power_of_two() {
            return Err(fail(format!(
                "line size {} is not a power of two",
                self.line_bytes
            )));
        }
        if self.ways == 0 {
            return Err(fail("associativity must be at least 1".to_string()));
        }
        let set_bytes = self.line_bytes * self.ways;
        if self.size_bytes < set_bytes || self.size_bytes % set_bytes != 0 {
            return Err(fail(format!(
                "size {} is not a multiple of {} bytes per set",
                self.size_bytes, set_bytes
            )));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// Creates the reference private cache configuration.
    fn default() -> Self {
        Self::l1()
    }
}

/// Shared cache geometry as written in a configuration file.
///
/// Same fields as [`CacheConfig`], but omitted ones fall back to the shared
/// cache defaults instead of the private cache ones.
#[derive(Deserialize)]
struct SharedCacheFields {
    #[serde(default = "SharedCacheFields::default_size")]
    size_bytes: usize,
    #[serde(default = "CacheConfig::default_line")]
    line_bytes: usize,
    #[serde(default = "SharedCacheFields::default_ways")]
    ways: usize,
    #[serde(default)]
    policy: ReplacementPolicy,
    #[serde(default = "SharedCacheFields::default_latency")]
    latency: u64,
}

impl SharedCacheFields {
    fn default_size() -> usize {
        defaults::L2_SIZE
    }

    fn default_ways() -> usize {
        defaults::L2_WAYS
    }

    fn default_latency() -> u64 {
        defaults::L2_LATENCY
    }

    /// Deserializes an L2 [`CacheConfig`] with shared cache defaults.
    fn deserialize_into<'de, D>(deserializer: D) -> Result<CacheConfig, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Self::deserialize(deserializer)?;
        Ok(CacheConfig {
            size_bytes: fields.size_bytes,
            line_bytes: fields.line_bytes,
            ways: fields.ways,
            policy: fields.policy,
            latency: fields.latency,
        })
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DramConfig {
    /// Memory controller type
    #[serde(default)]
    pub controller: MemoryController,

    /// Fixed access latency (simple controller)
    #[serde(default = "DramConfig::default_latency")]
    pub latency: u64,

    /// CAS latency (column access strobe)
    #[serde(default = "DramConfig::default_t_cas")]
    pub t_cas: u64,

    /// RAS latency (row access strobe)
    #[serde(default = "DramConfig::default_t_ras")]
    pub t_ras: u64,

    /// Precharge latency
    #[serde(default = "DramConfig::default_t_pre")]
    pub t_pre: u64,

    /// Row size in bytes; must be a power of two
    #[serde(default = "DramConfig::default_row_bytes")]
    pub row_bytes: u64,
}

impl DramConfig {
    /// Returns the default fixed DRAM latency.
    fn default_latency() -> u64 {
        defaults::DRAM_LATENCY
    }

    /// Returns the default CAS latency in DRAM cycles.
    fn default_t_cas() -> u64 {
        defaults::T_CAS
    }

    /// Returns the default RAS latency in DRAM cycles.
    fn default_t_ras() -> u64 {
        defaults::T_RAS
    }

    /// Returns the default precharge latency in DRAM cycles.
    fn default_t_pre() -> u64 {
        defaults::T_PRE
    }

    /// Returns the default DRAM row size in bytes.
    fn default_row_bytes() -> u64 {
        defaults::ROW_BYTES
    }
}

impl Default for DramConfig {
    /// Creates a fixed-latency DRAM configuration.
    fn default() -> Self {
        Self {
            controller: MemoryController::default(),
            latency: defaults::DRAM_LATENCY,
            t_cas: defaults::T_CAS,
            t_ras: defaults::T_RAS,
            t_pre: defaults::T_PRE,
            row_bytes: defaults::ROW_BYTES,
        }
    }
}
