use memsys_core::config::{
    CacheConfig, Config, DramConfig, Hierarchy, PartitionPolicy, ReplacementPolicy,
};
use memsys_core::{AccessType, MemorySystem};
use tracing_subscriber::EnvFilter;

/// Line size used by every test hierarchy.
pub const LINE: u64 = 64;

/// L1 hit latency of the test hierarchies.
pub const L1_LATENCY: u64 = 1;

/// L2 hit latency of the test hierarchies.
pub const L2_LATENCY: u64 = 10;

/// Fixed DRAM latency of the test hierarchies.
pub const DRAM_LATENCY: u64 = 100;

/// Delay of a load that misses every level.
pub const FULL_MISS: u64 = L1_LATENCY + L2_LATENCY + DRAM_LATENCY;

/// Installs a test subscriber once; `RUST_LOG` selects what is shown.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds an LRU cache geometry with 64-byte lines.
pub fn cache_config(size_bytes: usize, ways: usize, latency: u64) -> CacheConfig {
    CacheConfig {
        size_bytes,
        line_bytes: LINE as usize,
        ways,
        policy: ReplacementPolicy::Lru,
        latency,
    }
}

/// Small deterministic hierarchy.
///
/// - L1 (I and D): 1 KiB, direct-mapped, 16 sets, 1 cycle.
/// - L2: 16 KiB, 16-way, 16 sets, 10 cycles.
/// - DRAM: fixed 100 cycles.
pub fn small_config(hierarchy: Hierarchy) -> Config {
    Config {
        hierarchy,
        num_cores: if hierarchy == Hierarchy::PerCore { 2 } else { 1 },
        l1_i: cache_config(1024, 1, L1_LATENCY),
        l1_d: cache_config(1024, 1, L1_LATENCY),
        l2: cache_config(16 * 1024, 16, L2_LATENCY),
        partition: PartitionPolicy::None,
        dram: DramConfig {
            latency: DRAM_LATENCY,
            ..DramConfig::default()
        },
    }
}

/// Drives a [`MemorySystem`] with a clock that advances by each delay,
/// running the epoch boundaries it steps over.
#[derive(Debug)]
pub struct TestContext {
    pub memsys: MemorySystem,
    pub cycle: u64,
}

impl TestContext {
    /// Builds the system for `config`; panics on an invalid configuration.
    pub fn new(config: &Config) -> Self {
        init_tracing();
        Self {
            memsys: MemorySystem::new(config).expect("test configuration must be valid"),
            cycle: 1,
        }
    }

    /// Issues one access at the current cycle and returns its delay.
    pub fn access(&mut self, core_id: usize, access: AccessType, addr: u64) -> u64 {
        let delay = self.memsys.access(addr, access, core_id, self.cycle);
        let next = self.cycle + delay.max(1);
        self.memsys.advance(self.cycle, next);
        self.cycle = next;
        delay
    }

    pub fn load(&mut self, core_id: usize, addr: u64) -> u64 {
        self.access(core_id, AccessType::Load, addr)
    }

    pub fn store(&mut self, core_id: usize, addr: u64) -> u64 {
        self.access(core_id, AccessType::Store, addr)
    }

    pub fn ifetch(&mut self, core_id: usize, addr: u64) -> u64 {
        self.access(core_id, AccessType::Ifetch, addr)
    }
}
