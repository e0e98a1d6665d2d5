//! Memory Access Types.
//!
//! The classification decides which private cache serves a request and
//! whether the access dirties the line. It is also the key for the per-type
//! delay statistics.

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Instruction fetch; served by the instruction cache, never writes.
    Ifetch,

    /// Data read; served by the data cache.
    Load,

    /// Data write; served by the data cache and marks the line dirty.
    Store,
}

impl AccessType {
    /// All access types, in reporting order.
    pub const ALL: [Self; 3] = [Self::Ifetch, Self::Load, Self::Store];

    /// Returns `true` if the access writes the line.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Store)
    }

    /// Short lowercase name used as a statistics label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ifetch => "ifetch",
            Self::Load => "load",
            Self::Store => "store",
        }
    }
}
