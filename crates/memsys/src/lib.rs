//! Memory hierarchy timing model.
//!
//! This crate models the latency and data movement of a cache hierarchy fed
//! by a cycle-driven simulator, one access at a time:
//! 1. **Caches:** Set-associative caches with pluggable replacement, way partitioning and utility monitors.
//! 2. **Translation:** Per-core remapping of virtual pages into disjoint physical regions.
//! 3. **DRAM:** A backend with fixed-latency or row-buffer timing.
//! 4. **Partitioning:** Epoch-based utility partitioning of the shared L2 between two cores.
//! 5. **Memory system:** Composition of the levels, the miss/writeback chain and statistics.
//!
//! ```
//! use memsys_core::{AccessType, Config, MemorySystem};
//!
//! let mut memsys = MemorySystem::new(&Config::default()).unwrap();
//! let miss = memsys.access(0x1000, AccessType::Load, 0, 1);
//! let hit = memsys.access(0x1000, AccessType::Load, 0, 2);
//! assert_eq!(miss, 1 + 10 + 100);
//! assert_eq!(hit, 1);
//! ```

/// Common types and constants (addresses, access types, errors).
pub mod common;
/// Model configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Set-associative cache, replacement policies and utility monitors.
pub mod cache;
/// DRAM backend and memory controllers.
pub mod dram;
/// Hierarchy composition and the access chain.
pub mod memsys;
/// Utility-based way partitioning of the shared cache.
pub mod partition;
/// Statistics snapshots.
pub mod stats;
/// Virtual-to-physical address translation.
pub mod translate;

/// Access classification.
pub use crate::common::AccessType;
/// Root configuration type; use `Config::default()` or [`Config::from_json`].
pub use crate::config::Config;
/// The memory system; construct with [`MemorySystem::new`].
pub use crate::memsys::MemorySystem;
