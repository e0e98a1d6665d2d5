//! Common types shared by every level of the hierarchy.
//!
//! This module provides:
//! 1. **Address Types:** Strong types for virtual and physical byte addresses.
//! 2. **Constants:** Page geometry, translation field widths and the core count.
//! 3. **Access Types:** Classification of requests (instruction fetch, load, store).
//! 4. **Error Handling:** Configuration errors reported at construction time.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Configuration error types.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{PAGE_SHIFT, PAGE_SIZE};
pub use data::AccessType;
pub use error::ConfigError;
