//! # Page Geometry Constants
//!
//! This module centralizes the compile-time page geometry shared by the
//! slotted-page layer and the tree layer. Constants are interdependent and
//! the relationships are enforced through compile-time assertions.
//!
//! ## Dependency Graph
//!
//! ```text
//! PAGE_SIZE (1024 bytes)
//!   │
//!   ├─> PAGE_CAPACITY (derived: PAGE_SIZE - PAGE_HEADER_SIZE)
//!   ├─> slot directory bounds (slot_begin may equal PAGE_SIZE)
//!   └─> in-page offsets (must fit in u16, so PAGE_SIZE <= 32 KiB)
//! ```
//!
//! ## Modifying Constants
//!
//! `PAGE_SIZE` may be raised to 4096 for larger fan-out. It must stay a
//! power of two (page buffers are allocated aligned to it) and at most
//! 32 KiB because every in-page offset is stored as a `u16`.

/// Size of each page in bytes.
/// This is the fundamental allocation and split/merge unit of the tree.
pub const PAGE_SIZE: usize = 1024;

/// Size of the page header in bytes.
/// Every page begins with this header containing the record-region end,
/// slot-directory start, level, live-data accounting and parent reference.
pub const PAGE_HEADER_SIZE: usize = 12;

/// Size of one slot-directory entry in bytes.
pub const SLOT_SIZE: usize = 6;

/// Usable space in a page after the header.
pub const PAGE_CAPACITY: usize = PAGE_SIZE - PAGE_HEADER_SIZE;

/// Size of a child page reference stored as a branch-page value.
pub const CHILD_REF_SIZE: usize = 4;

/// Sentinel page id meaning "no page". Used as the parent of the root.
pub const NO_PAGE: u32 = u32::MAX;

/// Page id of the root. The root page is created with the tree and is
/// never released; its contents are swapped during lift-up instead.
pub const ROOT_PAGE: u32 = 0;

/// Poison value for the level field of a freshly cleared page.
/// The tree assigns the real level before the page is linked in.
pub const LEVEL_UNSET: u16 = u16::MAX;

const _: () = assert!(PAGE_SIZE.is_power_of_two(), "page buffers are aligned to PAGE_SIZE");

const _: () = assert!(PAGE_SIZE <= 32 * 1024, "in-page offsets are u16");

const _: () = assert!(
    PAGE_CAPACITY == PAGE_SIZE - PAGE_HEADER_SIZE,
    "PAGE_CAPACITY derivation mismatch"
);
