//! Configuration errors.
//!
//! Every structural problem with a [`Config`](crate::config::Config) is
//! detected before any cache is built and reported as a [`ConfigError`]; a
//! memory system that exists is always well formed.

use thiserror::Error;

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The per-core hierarchy requires exactly two cores.
    #[error("per-core hierarchy requires exactly {expected} cores, found {found}")]
    CoreCount {
        /// Required core count.
        expected: usize,
        /// Configured core count.
        found: usize,
    },

    /// A hierarchy must serve at least one core.
    #[error("at least one core is required")]
    NoCores,

    /// A cache's size, line size and associativity do not describe whole sets.
    #[error("{cache}: invalid geometry ({reason})")]
    Geometry {
        /// Cache label (`l1_i`, `l1_d`, `l2`).
        cache: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// All instantiated caches must use the same line size.
    #[error("{cache}: line size {found} differs from the hierarchy line size {expected}")]
    LineSizeMismatch {
        /// Cache label.
        cache: &'static str,
        /// Line size of the first level.
        expected: usize,
        /// Line size of the offending cache.
        found: usize,
    },

    /// A static partition cannot give core 0 more ways than the L2 has.
    #[error("static partition assigns {core0_ways} ways to core 0 but the L2 has {ways}")]
    PartitionWays {
        /// Requested core-0 ways.
        core0_ways: usize,
        /// L2 associativity.
        ways: usize,
    },

    /// Dynamic partitioning needs a non-zero epoch and sampling stride.
    #[error("dynamic partitioning requires a non-zero {0}")]
    ZeroPartitionParameter(&'static str),

    /// Way partitioning only exists for the shared L2 of the per-core hierarchy.
    #[error("L2 way partitioning requires the per-core hierarchy")]
    PartitionWithoutSharedL2,
}
