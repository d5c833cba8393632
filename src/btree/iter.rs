//! # Tree Iterators
//!
//! Two cursor layers over a [`BtreeMap`]:
//!
//! - [`PageIter`] steps across leaf pages left to right by climbing to
//!   the lowest ancestor with a sibling edge and descending the far
//!   spine.
//! - [`ItemIter`] composes a leaf position with an in-page slot index
//!   and steps record by record, crossing pages at page ends.
//!
//! Both treat the end position cyclically: advancing from the end lands
//! on the first leaf/record and retreating from the end on the last.
//! Callers comparing against a stored end iterator after removals rely
//! on this.
//!
//! Iterators borrow the tree, so mutation invalidates them by
//! construction. Erase-while-iterating goes through
//! [`BtreeMap::erase_at`], which takes a plain [`ItemPos`] and returns
//! the position of the following record; [`BtreeMap::seek`] turns that
//! back into an iterator.
//!
//! [`Items`] is the plain `Iterator` adapter used by `for` loops and
//! `collect`; it stops at the end instead of wrapping.

use crate::btree::compare::{FixedRecord, KeyCmp, NativeOrder};
use crate::btree::page::SlottedPage;
use crate::btree::tree::{BtreeMap, ItemPos};
use crate::config::NO_PAGE;

/// Cursor over the leaf pages of a tree, in key order.
pub struct PageIter<'a, K, V, C = NativeOrder<K>> {
    tree: &'a BtreeMap<K, V, C>,
    page: u32,
}

impl<'a, K, V, C> PageIter<'a, K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    pub(crate) fn new(tree: &'a BtreeMap<K, V, C>, page: u32) -> Self {
        Self { tree, page }
    }

    pub fn is_end(&self) -> bool {
        self.page == NO_PAGE
    }

    /// The current leaf page.
    pub fn leaf(&self) -> &'a SlottedPage<C> {
        debug_assert!(!self.is_end());
        self.tree.page_ref(self.page)
    }

    pub fn num_records(&self) -> u16 {
        self.leaf().num_records()
    }

    /// Step right; from the end this wraps to the left-most leaf.
    pub fn advance(&mut self) {
        if self.is_end() {
            self.page = self.tree.leftmost_leaf();
        } else {
            self.page = self.tree.next_leaf(self.page).unwrap_or(NO_PAGE);
        }
    }

    /// Step left; from the end this wraps to the right-most leaf.
    pub fn retreat(&mut self) {
        if self.is_end() {
            self.page = self.tree.rightmost_leaf();
        } else {
            self.page = self.tree.prev_leaf(self.page).unwrap_or(NO_PAGE);
        }
    }
}

/// Cursor over the records of a tree, in key order.
pub struct ItemIter<'a, K, V, C = NativeOrder<K>> {
    tree: &'a BtreeMap<K, V, C>,
    pos: ItemPos,
}

impl<'a, K, V, C> ItemIter<'a, K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    pub(crate) fn new(tree: &'a BtreeMap<K, V, C>, pos: ItemPos) -> Self {
        Self { tree, pos }
    }

    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// The position, for [`BtreeMap::erase_at`] / [`BtreeMap::seek`].
    pub fn pos(&self) -> ItemPos {
        self.pos
    }

    pub fn key(&self) -> K {
        debug_assert!(!self.is_end());
        self.tree.decode_key(self.pos)
    }

    pub fn value(&self) -> V {
        debug_assert!(!self.is_end());
        self.tree.decode_value(self.pos)
    }

    /// Step to the next record, crossing leaves at page ends; from the
    /// end this wraps to the first record.
    pub fn advance(&mut self) {
        if self.is_end() {
            self.pos = self.tree.first_pos();
            return;
        }
        let page = self.tree.page_ref(self.pos.page);
        if self.pos.slot + 1 < page.num_records() {
            self.pos.slot += 1;
        } else {
            self.pos = match self.tree.next_leaf(self.pos.page) {
                Some(id) => ItemPos { page: id, slot: 0 },
                None => ItemPos::END,
            };
        }
    }

    /// Step to the previous record; from the end this wraps to the last
    /// record.
    pub fn retreat(&mut self) {
        if self.is_end() {
            self.pos = self.tree.last_pos();
            return;
        }
        if self.pos.slot > 0 {
            self.pos.slot -= 1;
            return;
        }
        self.pos = match self.tree.prev_leaf(self.pos.page) {
            Some(id) => {
                let n = self.tree.page_ref(id).num_records();
                ItemPos {
                    page: id,
                    slot: n - 1,
                }
            }
            None => ItemPos::END,
        };
    }
}

/// Forward `Iterator` over `(key, value)` pairs, stopping at the end.
pub struct Items<'a, K, V, C = NativeOrder<K>> {
    it: ItemIter<'a, K, V, C>,
}

impl<'a, K, V, C> Items<'a, K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    pub(crate) fn new(it: ItemIter<'a, K, V, C>) -> Self {
        Self { it }
    }
}

impl<'a, K, V, C> Iterator for Items<'a, K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        if self.it.is_end() {
            return None;
        }
        let item = (self.it.key(), self.it.value());
        self.it.advance();
        Some(item)
    }
}
