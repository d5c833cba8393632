//! # Slotted-Page B+Tree
//!
//! This module implements the crate's core: a slotted page holding sorted
//! records behind a slot directory, and a B+tree composing those pages
//! into an ordered map.
//!
//! ## Layers
//!
//! - **Page** ([`SlottedPage`]): a fixed-size byte buffer with a header,
//!   an append-only record region and a sorted slot directory growing
//!   down from the page end. In-page operations: insert, erase, value and
//!   key update, lower-bound and branch-descent search, split, merge and
//!   garbage collection.
//!
//! - **Tree** ([`BtreeMap`]): a root page plus an arena of child pages.
//!   Leaves store `(key, value)`; branch pages store `(min key of
//!   subtree, child page id)`. Structural maintenance is recursive in
//!   both directions: splits propagate up on insert, and empty-page
//!   deletion, left-sibling merges, minimum-key propagation and root
//!   lift-up run bottom-up on erase.
//!
//! ## Ordering
//!
//! A single comparator type ([`KeyCmp`]) fixes the key order for a whole
//! tree. Pages never interpret key bytes themselves beyond handing them
//! to the comparator, so the same page code serves the typed map and
//! byte-string keys alike.
//!
//! ## Failure Semantics
//!
//! Ordinary outcomes surface as [`BtreeError`] values carried in
//! `eyre::Report`; an operation that fails leaves the structure exactly
//! as it was. Invariant violations are programmer errors and are checked
//! with debug assertions only.
//!
//! ## Concurrency
//!
//! Single-threaded per operation, no internal locking. The per-page
//! [`LockModes`] counters are a reserved hook for a multi-granularity
//! lock manager and are not consulted by any algorithm here.

mod arena;
mod compare;
mod error;
mod iter;
mod lock;
mod page;
mod tree;

pub use compare::{FixedRecord, KeyCmp, Lexical, NativeOrder};
pub use error::BtreeError;
pub use iter::{ItemIter, Items, PageIter};
pub use lock::{LockMode, LockModes};
pub use page::{Slot, SlotCursor, SlotSearch, SlottedPage};
pub use tree::{BtreeMap, ItemPos};
