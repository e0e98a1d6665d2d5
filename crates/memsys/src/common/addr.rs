//! Physical and Virtual Address types.
//!
//! Strong types for the two address spaces so a virtual address can never be
//! handed to a cache by accident. Caches themselves work on line addresses
//! (`byte address / line size`), which are plain `u64` values derived from a
//! [`PhysAddr`] with [`PhysAddr::line`].

use super::constants::{PAGE_OFFSET_MASK, PAGE_SHIFT};

/// A virtual byte address as issued by a core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

/// A physical byte address, produced by address translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Virtual page number (4 KiB pages).
    #[inline(always)]
    pub const fn page_number(&self) -> u64 {
        self.0 >> PAGE_SHIFT
    }

    /// Byte offset within the 4 KiB page.
    #[inline(always)]
    pub const fn page_offset(&self) -> u64 {
        self.0 & PAGE_OFFSET_MASK
    }

    /// Line address of this virtual address for the given line size.
    ///
    /// Used by hierarchies that do not translate addresses.
    #[inline(always)]
    pub const fn line(&self, line_bytes: u64) -> u64 {
        self.0 / line_bytes
    }
}

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Builds a physical address from a frame number and an in-page offset.
    #[inline(always)]
    pub const fn from_frame(frame: u64, offset: u64) -> Self {
        Self((frame << PAGE_SHIFT) + (offset & PAGE_OFFSET_MASK))
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Physical line address for the given line size.
    #[inline(always)]
    pub const fn line(&self, line_bytes: u64) -> u64 {
        self.0 / line_bytes
    }
}
