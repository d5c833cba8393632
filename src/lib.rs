//! # pagemap - In-Memory Slotted-Page B+Tree
//!
//! pagemap is an ordered associative map organized as a forest of
//! fixed-size slotted pages, so the data structure can later be paired
//! with a lock manager, a persistence layer or a pooled allocator
//! without reshaping its memory layout. It behaves like a standard
//! ordered map: insertion, point deletion, lower-bound lookup, ordered
//! iteration in both directions, bulk clear.
//!
//! ## Quick Start
//!
//! ```
//! use pagemap::BtreeMap;
//!
//! let mut map: BtreeMap<u32, u64> = BtreeMap::new();
//! map.insert(3, 30)?;
//! map.insert(1, 10)?;
//! map.insert(2, 20)?;
//!
//! let keys: Vec<u32> = map.iter().map(|(k, _)| k).collect();
//! assert_eq!(keys, vec![1, 2, 3]);
//!
//! assert_eq!(map.lower_bound(2).key(), 2);
//! assert!(map.erase(2));
//! assert_eq!(map.len(), 2);
//! # Ok::<(), eyre::Report>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Typed map (BtreeMap<K, V>)     │  fixed-width zerocopy records
//! ├─────────────────────────────────────┤
//! │   Tree algorithms (split / merge /  │  recursive structural
//! │   min-key propagation / lift-up)    │  maintenance over page ids
//! ├─────────────────────────────────────┤
//! │   Slotted pages (slot directory,    │  byte-level records, binary
//! │   record region, gc)                │  search, in-page mutation
//! ├─────────────────────────────────────┤
//! │   Page arena + aligned page buffers │  id-keyed ownership
//! └─────────────────────────────────────┘
//! ```
//!
//! Keys and values are fixed-width [`zerocopy`] records (`u32`, `u64`,
//! byte arrays, packed structs); the page layer underneath works on
//! arbitrary byte strings and is exposed for callers that bring their
//! own encoding.
//!
//! ## What pagemap is not
//!
//! There is no persistence, write-ahead logging, recovery or concurrency
//! control. Operations never block; callers running concurrent
//! operations serialize them with an external lock. The per-page
//! lock-mode counters exist for a future lock manager and are not used
//! by the tree itself.
//!
//! ## Module Overview
//!
//! - [`btree`]: slotted pages, tree algorithms, iterators, comparators
//! - [`config`]: page geometry constants

pub mod btree;
pub mod config;
mod memory;

pub use btree::{
    BtreeError, BtreeMap, FixedRecord, ItemIter, ItemPos, Items, KeyCmp, Lexical, LockMode,
    LockModes, NativeOrder, PageIter, Slot, SlotCursor, SlotSearch, SlottedPage,
};
