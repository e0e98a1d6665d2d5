//! Virtual-to-physical address translation.
//!
//! There is no page table: each core's virtual pages are remapped
//! arithmetically into their own 2 MiB-aligned physical regions, so the same
//! virtual page issued by core 0 and core 1 always lands in different frames.
//!
//! The virtual page number is split into a 20-bit low field and the remaining
//! high field:
//!
//! ```text
//! pfn = low + (core_id << 21) + (high << 21)
//! ```
//!
//! Only two regions are carved out, so the scheme is defined for cores 0 and 1.

use crate::common::constants::{MAX_CORES, REGION_SHIFT, VPN_LOW_BITS, VPN_LOW_MASK};
use crate::common::{PhysAddr, VirtAddr};

/// Maps a virtual page number of `core_id` to a physical frame number.
///
/// # Panics
///
/// Panics if `core_id` is not 0 or 1.
///
/// # Examples
///
/// ```
/// use memsys_core::translate::vpn_to_pfn;
///
/// assert_eq!(vpn_to_pfn(5, 0), 5);
/// assert_eq!(vpn_to_pfn(5, 1), 5 + (1 << 21));
/// ```
pub fn vpn_to_pfn(vpn: u64, core_id: usize) -> u64 {
    assert!(
        core_id < MAX_CORES,
        "address translation supports {MAX_CORES} cores, got core {core_id}"
    );
    let low = vpn & VPN_LOW_MASK;
    let high = vpn >> VPN_LOW_BITS;
    low + ((core_id as u64) << REGION_SHIFT) + (high << REGION_SHIFT)
}

/// Translates a virtual byte address of `core_id`, keeping the page offset.
///
/// # Panics
///
/// Panics if `core_id` is not 0 or 1.
pub fn translate(vaddr: VirtAddr, core_id: usize) -> PhysAddr {
    let pfn = vpn_to_pfn(vaddr.page_number(), core_id);
    PhysAddr::from_frame(pfn, vaddr.page_offset())
}
