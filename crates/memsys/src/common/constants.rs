//! Global Model Constants.
//!
//! Page geometry used by address translation and the fixed parameters of the
//! reference hierarchy.

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u64 = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u64 = 12;

/// Mask for extracting the page offset from an address.
pub const PAGE_OFFSET_MASK: u64 = PAGE_SIZE - 1;

/// Width of the virtual page number field kept verbatim by translation.
pub const VPN_LOW_BITS: u64 = 20;

/// Mask selecting the low field of a virtual page number.
pub const VPN_LOW_MASK: u64 = (1 << VPN_LOW_BITS) - 1;

/// Shift applied to the core id and to the high VPN field (2 MiB frame regions).
pub const REGION_SHIFT: u64 = 21;

/// Number of cores supported by the per-core hierarchy.
pub const MAX_CORES: usize = 2;
