//! # B+Tree Map
//!
//! An ordered map from fixed-width keys to fixed-width values, composed
//! from slotted pages. Leaves hold application values; branch pages hold
//! child page ids keyed by the minimum key of the child's subtree. The
//! tree starts as a single leaf root and grows by leaf splits that
//! recursively split ancestors.
//!
//! ## Structure
//!
//! Pages live in a [`PageArena`] under stable ids; page id 0 is the root
//! and never moves. Every page records its parent id, so the bottom-up
//! operations (minimum-key propagation, merge cascades, empty-page
//! deletion) climb in O(1) per level without a search from the root.
//!
//! ```text
//!                  root (level 2)
//!                 /               \
//!        branch (level 1)     branch (level 1)
//!        /      |      \          /    \
//!    leaf     leaf     leaf    leaf    leaf      (level 0)
//! ```
//!
//! ## Insert
//!
//! ```text
//! 1. Descend to the leaf covering the key
//! 2. If the record does not fit and the page is mostly garbage: gc
//! 3. If it still does not fit: split the leaf, updating the parent's
//!    entry for the old page and inserting one for the new half; when
//!    the parent is full this splits recursively, and a root split
//!    refills the root as a branch one level up
//! 4. Insert into whichever half covers the key
//! ```
//!
//! ## Erase
//!
//! Erasing the last record of a leaf deletes the page bottom-up
//! (ancestors that become empty follow). Erasing the left-most record
//! propagates the new subtree minimum into ancestor keys. A leaf left
//! mostly empty merges its left sibling in, cascading the merge up the
//! tree. Finally, while the root is a branch with a single child, the
//! child's contents lift into the root so the depth shrinks.
//!
//! ## Concurrency
//!
//! No operation blocks, yields or synchronizes. Concurrent callers must
//! serialize whole operations externally; the per-page lock-mode
//! counters are a reserved hook and are not consulted here.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem::size_of;

use eyre::Result;
use smallvec::SmallVec;
use zerocopy::{FromBytes, IntoBytes};

use crate::btree::arena::PageArena;
use crate::btree::compare::{FixedRecord, KeyCmp, NativeOrder};
use crate::btree::iter::{ItemIter, Items, PageIter};
use crate::btree::page::SlottedPage;
use crate::config::{CHILD_REF_SIZE, NO_PAGE, PAGE_CAPACITY, ROOT_PAGE, SLOT_SIZE};

/// Scratch copy of a key, kept inline for the usual small fixed widths.
type KeyBuf = SmallVec<[u8; 16]>;

fn child_bytes(id: u32) -> [u8; CHILD_REF_SIZE] {
    id.to_le_bytes()
}

fn child_id(bytes: &[u8]) -> u32 {
    // INVARIANT: branch values are exactly CHILD_REF_SIZE bytes.
    u32::from_le_bytes(bytes.try_into().unwrap())
}

/// Position of one record: a leaf page id plus a slot index.
///
/// `END` marks the past-the-end position. A position is only meaningful
/// until the next mutating tree operation; mutation entry points return
/// the updated position explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemPos {
    pub(crate) page: u32,
    pub(crate) slot: u16,
}

impl ItemPos {
    pub(crate) const END: ItemPos = ItemPos {
        page: NO_PAGE,
        slot: 0,
    };

    pub fn is_end(&self) -> bool {
        self.page == NO_PAGE
    }
}

/// Ordered map over slotted pages.
///
/// `K` and `V` are fixed-width zerocopy records; `C` is the comparator
/// type for the whole tree, defaulting to the native order of `K`.
pub struct BtreeMap<K, V, C = NativeOrder<K>> {
    arena: PageArena<C>,
    _marker: PhantomData<(K, V)>,
}

impl<K, V, C> BtreeMap<K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    pub fn new() -> Self {
        let leaf_record = size_of::<K>() + size_of::<V>();
        let branch_record = size_of::<K>() + CHILD_REF_SIZE;
        let largest = leaf_record.max(branch_record) + SLOT_SIZE;
        assert!(
            largest * 2 <= PAGE_CAPACITY,
            "a page must hold at least two records (record takes {largest} of {PAGE_CAPACITY} bytes)"
        );
        Self {
            arena: PageArena::new(),
            _marker: PhantomData,
        }
    }

    /// Insert a record. Fails with `KeyExists` when the key is present.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let key_bytes = key.as_bytes();
        let value_bytes = value.as_bytes();
        let record = key_bytes.len() + value_bytes.len();

        let mut leaf = self.search_leaf(key_bytes);
        {
            let page = self.arena.page_mut(leaf);
            if !page.can_insert(record) && page.should_gc() {
                page.gc();
            }
        }
        if !self.arena.page(leaf).can_insert(record) {
            leaf = self.split_leaf(leaf, key_bytes);
        }

        debug_assert!(self.arena.page(leaf).can_insert(record));
        self.arena.page_mut(leaf).insert(key_bytes, value_bytes)
    }

    /// Remove `key`. Returns true iff it was present.
    pub fn erase(&mut self, key: K) -> bool {
        let pos = self.lower_bound_pos(key.as_bytes());
        if pos.is_end() {
            return false;
        }
        let hit = C::compare(self.arena.page(pos.page).key_at(pos.slot), key.as_bytes())
            == Ordering::Equal;
        if !hit {
            return false;
        }
        self.erase_at(pos);
        true
    }

    /// Remove the record at `pos` and return the position of the record
    /// that followed it (or the end position).
    pub fn erase_at(&mut self, pos: ItemPos) -> ItemPos {
        debug_assert!(!pos.is_end());
        let page_id = pos.page;
        let last_key: KeyBuf = SmallVec::from_slice(self.arena.page(page_id).key_at(pos.slot));

        if self.arena.page(page_id).num_records() == 1 {
            // Step to the next page before this one goes away.
            let mut next = match self.next_leaf(page_id) {
                Some(id) => ItemPos { page: id, slot: 0 },
                None => ItemPos::END,
            };
            self.arena.page_mut(page_id).erase_at(0);
            self.delete_empty_page(page_id, &last_key);
            self.lift_up(&mut next);
            return next;
        }

        let was_begin = pos.slot == 0;
        self.arena.page_mut(page_id).erase_at(pos.slot);
        if was_begin {
            self.update_min_key(page_id);
        }
        let mut pos = self.try_merge(pos);
        self.lift_up(&mut pos);
        self.normalize(pos)
    }

    /// Iterator at the first record whose key is >= `key`.
    pub fn lower_bound(&self, key: K) -> ItemIter<'_, K, V, C> {
        ItemIter::new(self, self.lower_bound_pos(key.as_bytes()))
    }

    /// Iterator at `pos`, typically one returned by [`Self::erase_at`].
    pub fn seek(&self, pos: ItemPos) -> ItemIter<'_, K, V, C> {
        ItemIter::new(self, pos)
    }

    /// Records in ascending key order.
    pub fn iter(&self) -> Items<'_, K, V, C> {
        Items::new(ItemIter::new(self, self.first_pos()))
    }

    /// Leaf pages left to right.
    pub fn pages(&self) -> PageIter<'_, K, V, C> {
        PageIter::new(self, self.leftmost_leaf())
    }

    /// Number of records, summed over the leaves.
    pub fn len(&self) -> usize {
        let mut total = 0usize;
        let mut leaf = Some(self.leftmost_leaf());
        while let Some(id) = leaf {
            total += self.arena.page(id).num_records() as usize;
            leaf = self.next_leaf(id);
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        let root = self.arena.page(ROOT_PAGE);
        root.is_leaf() && root.is_empty()
    }

    /// Number of page levels; 1 while the root is still a leaf.
    pub fn depth(&self) -> u16 {
        self.arena.page(ROOT_PAGE).level() + 1
    }

    /// Drop every record and every non-root page.
    pub fn clear(&mut self) {
        self.arena.reset();
    }

    /// Structural audit: per-page invariants, parent back references,
    /// level stepping, no empty children, branch keys at or below the
    /// child minimum.
    pub fn is_valid(&self) -> bool {
        self.subtree_valid(ROOT_PAGE)
    }

    fn subtree_valid(&self, page_id: u32) -> bool {
        let page = self.arena.page(page_id);
        if !page.is_valid() {
            return false;
        }
        if page.is_leaf() {
            return true;
        }
        for i in 0..page.num_records() {
            let child = child_id(page.value_at(i));
            let child_page = self.arena.page(child);
            if child_page.level() + 1 != page.level() {
                return false;
            }
            if child_page.parent() != page_id {
                return false;
            }
            if child_page.is_empty() {
                return false;
            }
            if C::compare(page.key_at(i), child_page.min_key()) == Ordering::Greater {
                return false;
            }
            if !self.subtree_valid(child) {
                return false;
            }
        }
        true
    }

    pub(crate) fn page_ref(&self, id: u32) -> &SlottedPage<C> {
        self.arena.page(id)
    }

    pub(crate) fn decode_key(&self, pos: ItemPos) -> K {
        // INVARIANT: leaf keys are exactly size_of::<K>() bytes.
        K::read_from_bytes(self.arena.page(pos.page).key_at(pos.slot)).unwrap()
    }

    pub(crate) fn decode_value(&self, pos: ItemPos) -> V {
        // INVARIANT: leaf values are exactly size_of::<V>() bytes.
        V::read_from_bytes(self.arena.page(pos.page).value_at(pos.slot)).unwrap()
    }

    /// Leaf page whose key range covers `key`.
    fn search_leaf(&self, key: &[u8]) -> u32 {
        let mut id = ROOT_PAGE;
        loop {
            let page = self.arena.page(id);
            if page.is_leaf() {
                return id;
            }
            let idx = page.search(key, false, false);
            id = child_id(page.value_at(idx));
        }
    }

    fn lower_bound_pos(&self, key: &[u8]) -> ItemPos {
        let leaf = self.search_leaf(key);
        let page = self.arena.page(leaf);
        let idx = page.lower_bound(key);
        if idx < page.num_records() {
            return ItemPos { page: leaf, slot: idx };
        }
        // The hit can only be the first record of the next page.
        match self.next_leaf(leaf) {
            Some(next) => {
                let page = self.arena.page(next);
                let idx = page.lower_bound(key);
                if idx < page.num_records() {
                    ItemPos { page: next, slot: idx }
                } else {
                    ItemPos::END
                }
            }
            None => ItemPos::END,
        }
    }

    pub(crate) fn first_pos(&self) -> ItemPos {
        let leaf = self.leftmost_leaf();
        if self.arena.page(leaf).is_empty() {
            ItemPos::END
        } else {
            ItemPos { page: leaf, slot: 0 }
        }
    }

    pub(crate) fn last_pos(&self) -> ItemPos {
        let leaf = self.rightmost_leaf();
        let n = self.arena.page(leaf).num_records();
        if n == 0 {
            ItemPos::END
        } else {
            ItemPos {
                page: leaf,
                slot: n - 1,
            }
        }
    }

    pub(crate) fn leftmost_leaf(&self) -> u32 {
        let mut id = ROOT_PAGE;
        while !self.arena.page(id).is_leaf() {
            id = child_id(self.arena.page(id).value_at(0));
        }
        id
    }

    pub(crate) fn rightmost_leaf(&self) -> u32 {
        let mut id = ROOT_PAGE;
        loop {
            let page = self.arena.page(id);
            if page.is_leaf() {
                return id;
            }
            id = child_id(page.value_at(page.num_records() - 1));
        }
    }

    /// Parent page and the index of its entry for `page_id`.
    fn parent_slot(&self, page_id: u32) -> (u32, u16) {
        let page = self.arena.page(page_id);
        debug_assert!(!page.is_empty());
        let parent_id = page.parent();
        debug_assert_ne!(parent_id, NO_PAGE);

        let parent = self.arena.page(parent_id);
        let mut idx = parent.search(page.min_key(), false, false);
        if child_id(parent.value_at(idx)) != page_id {
            // The stored key can sit below the subtree minimum after
            // left-edge deletions; the entry is then one slot further.
            idx += 1;
        }
        debug_assert_eq!(child_id(parent.value_at(idx)), page_id);
        (parent_id, idx)
    }

    /// Leaf to the right of `page_id`: climb to the lowest ancestor with
    /// a right sibling edge, then descend its left-most spine.
    pub(crate) fn next_leaf(&self, page_id: u32) -> Option<u32> {
        debug_assert!(self.arena.page(page_id).is_leaf());
        let mut id = page_id;
        loop {
            if self.arena.page(id).parent() == NO_PAGE {
                return None;
            }
            let (parent_id, idx) = self.parent_slot(id);
            let parent = self.arena.page(parent_id);
            if idx + 1 < parent.num_records() {
                let mut down = child_id(parent.value_at(idx + 1));
                while !self.arena.page(down).is_leaf() {
                    down = child_id(self.arena.page(down).value_at(0));
                }
                return Some(down);
            }
            id = parent_id;
        }
    }

    pub(crate) fn prev_leaf(&self, page_id: u32) -> Option<u32> {
        debug_assert!(self.arena.page(page_id).is_leaf());
        let mut id = page_id;
        loop {
            if self.arena.page(id).parent() == NO_PAGE {
                return None;
            }
            let (parent_id, idx) = self.parent_slot(id);
            if idx > 0 {
                let mut down = child_id(self.arena.page(parent_id).value_at(idx - 1));
                loop {
                    let page = self.arena.page(down);
                    if page.is_leaf() {
                        return Some(down);
                    }
                    down = child_id(page.value_at(page.num_records() - 1));
                }
            }
            id = parent_id;
        }
    }

    /// Split a full leaf and return the half covering `key`.
    fn split_leaf(&mut self, leaf_id: u32, key: &[u8]) -> u32 {
        debug_assert!(self.arena.page(leaf_id).is_leaf());
        let parent_id = self.arena.page(leaf_id).parent();

        let (p0, p1) = self.arena.page_mut(leaf_id).split(true);
        debug_assert!(!p0.is_empty() && !p1.is_empty());
        let k0: KeyBuf = SmallVec::from_slice(p0.min_key());
        let k1: KeyBuf = SmallVec::from_slice(p1.min_key());
        let id0 = self.arena.insert(p0);
        let id1 = self.arena.insert(p1);

        if parent_id == NO_PAGE {
            // Root split: the emptied root becomes a level-1 branch over
            // the two halves.
            debug_assert_eq!(leaf_id, ROOT_PAGE);
            let root = self.arena.page_mut(ROOT_PAGE);
            root.set_level(1);
            root.set_parent(NO_PAGE);
            let inserted = root.insert(&k0, &child_bytes(id0));
            debug_assert!(inserted.is_ok());
            let inserted = root.insert(&k1, &child_bytes(id1));
            debug_assert!(inserted.is_ok());
            self.arena.page_mut(id0).set_parent(ROOT_PAGE);
            self.arena.page_mut(id1).set_parent(ROOT_PAGE);
        } else {
            let (par0, par1) = self.make_room_in_parent(parent_id, &k0, &k1);
            self.replace_child_entry(par0, leaf_id, &k0, id0);
            self.insert_child_entry(par1, &k1, id1);
            self.arena.page_mut(id0).set_parent(par0);
            self.arena.page_mut(id1).set_parent(par1);
            self.arena.release(leaf_id);
        }

        if C::compare(key, &k1) == Ordering::Less {
            id0
        } else {
            id1
        }
    }

    /// Split a full branch page. Returns the halves covering `key0` and
    /// `key1` respectively.
    fn split_branch(&mut self, page_id: u32, key0: &[u8], key1: &[u8]) -> (u32, u32) {
        debug_assert!(!self.arena.page(page_id).is_leaf());
        let level = self.arena.page(page_id).level();
        let parent_id = self.arena.page(page_id).parent();

        let (p0, p1) = self.arena.page_mut(page_id).split(true);
        debug_assert!(!p0.is_empty() && !p1.is_empty());
        let k0: KeyBuf = SmallVec::from_slice(p0.min_key());
        let k1: KeyBuf = SmallVec::from_slice(p1.min_key());
        let id0 = self.arena.insert(p0);
        let id1 = self.arena.insert(p1);

        if parent_id == NO_PAGE {
            debug_assert_eq!(page_id, ROOT_PAGE);
            let root = self.arena.page_mut(ROOT_PAGE);
            root.set_level(level + 1);
            root.set_parent(NO_PAGE);
            let inserted = root.insert(&k0, &child_bytes(id0));
            debug_assert!(inserted.is_ok());
            let inserted = root.insert(&k1, &child_bytes(id1));
            debug_assert!(inserted.is_ok());
            self.arena.page_mut(id0).set_parent(ROOT_PAGE);
            self.arena.page_mut(id1).set_parent(ROOT_PAGE);
        } else {
            let (par0, par1) = self.make_room_in_parent(parent_id, &k0, &k1);
            self.replace_child_entry(par0, page_id, &k0, id0);
            self.insert_child_entry(par1, &k1, id1);
            self.arena.page_mut(id0).set_parent(par0);
            self.arena.page_mut(id1).set_parent(par1);
            self.arena.release(page_id);
        }

        // The children changed owner; update their back references.
        self.reparent_children(id0, id0);
        self.reparent_children(id1, id1);

        let ret0 = if C::compare(key0, &k1) == Ordering::Less {
            id0
        } else {
            id1
        };
        let ret1 = if C::compare(key1, &k1) == Ordering::Less {
            id0
        } else {
            id1
        };
        (ret0, ret1)
    }

    /// Make the parent able to take one more child entry, splitting it
    /// when gc is not enough. Returns the pages routing `k0` and `k1`.
    fn make_room_in_parent(&mut self, parent_id: u32, k0: &[u8], k1: &[u8]) -> (u32, u32) {
        let entry = k0.len() + CHILD_REF_SIZE;
        {
            let parent = self.arena.page_mut(parent_id);
            if !parent.can_insert(entry) {
                parent.gc();
            }
        }
        if !self.arena.page(parent_id).can_insert(entry) {
            self.split_branch(parent_id, k0, k1)
        } else {
            (parent_id, parent_id)
        }
    }

    /// Redirect the parent entry that pointed at `old_child` to
    /// `new_child` under `new_key` (the new half's minimum).
    fn replace_child_entry(
        &mut self,
        parent_id: u32,
        old_child: u32,
        new_key: &[u8],
        new_child: u32,
    ) {
        let parent = self.arena.page_mut(parent_id);
        let idx = parent.search(new_key, false, false);
        debug_assert_eq!(child_id(parent.value_at(idx)), old_child);

        if C::compare(parent.key_at(idx), new_key) == Ordering::Equal {
            let updated = parent.update_value(new_key, &child_bytes(new_child));
            debug_assert!(updated.is_ok());
        } else {
            // The stored key lags the subtree minimum; rewrite the entry.
            parent.erase_at(idx);
            let inserted = parent.insert(new_key, &child_bytes(new_child));
            debug_assert!(inserted.is_ok());
        }
    }

    /// Insert the right-half entry, gc'ing first so it cannot fail (the
    /// room made earlier may have been consumed when both halves route
    /// into the same parent).
    fn insert_child_entry(&mut self, parent_id: u32, key: &[u8], child: u32) {
        let parent = self.arena.page_mut(parent_id);
        if !parent.can_insert(key.len() + CHILD_REF_SIZE) {
            parent.gc();
        }
        let inserted = parent.insert(key, &child_bytes(child));
        debug_assert!(inserted.is_ok());
    }

    /// Point the children listed in branch page `of` at page `to`.
    fn reparent_children(&mut self, of: u32, to: u32) {
        let children: SmallVec<[u32; 16]> = {
            let page = self.arena.page(of);
            (0..page.num_records())
                .map(|i| child_id(page.value_at(i)))
                .collect()
        };
        for child in children {
            self.arena.page_mut(child).set_parent(to);
        }
    }

    /// Remove an emptied page bottom-up. `last_key` is the key of the
    /// record whose removal emptied the page; it still routes to the
    /// page's entry in every ancestor.
    fn delete_empty_page(&mut self, page_id: u32, last_key: &[u8]) {
        debug_assert!(self.arena.page(page_id).is_empty());
        let parent_id = self.arena.page(page_id).parent();
        if parent_id == NO_PAGE {
            // The root survives empty.
            return;
        }

        let (was_begin, parent_empty) = {
            let parent = self.arena.page_mut(parent_id);
            let idx = parent.search(last_key, false, false);
            debug_assert_eq!(child_id(parent.value_at(idx)), page_id);
            parent.erase_at(idx);
            (idx == 0, parent.is_empty())
        };
        self.arena.release(page_id);

        if parent_empty {
            self.delete_empty_page(parent_id, last_key);
        } else if was_begin {
            self.update_min_key(parent_id);
        }
    }

    /// Rewrite the parent entry for `page_id` with the page's minimum
    /// key, cascading while the entry is the left-most of its parent.
    fn update_min_key(&mut self, page_id: u32) {
        debug_assert!(!self.arena.page(page_id).is_empty());
        if self.arena.page(page_id).parent() == NO_PAGE {
            return;
        }
        let (parent_id, idx) = self.parent_slot(page_id);
        let min_key: KeyBuf = SmallVec::from_slice(self.arena.page(page_id).min_key());
        let updated = self.arena.page_mut(parent_id).update_key_at(idx, &min_key);
        debug_assert!(updated.is_ok());

        if idx == 0 {
            self.update_min_key(parent_id);
        }
    }

    /// Merge the left sibling into the page at `pos` when the page is
    /// mostly empty and the combined contents fit, cascading the merge
    /// into ancestors. Returns `pos` shifted by the merged-in records.
    fn try_merge(&mut self, pos: ItemPos) -> ItemPos {
        let page_id = pos.page;
        {
            let page = self.arena.page(page_id);
            debug_assert!(!page.is_empty());
            if page.parent() == NO_PAGE {
                return pos;
            }
            if PAGE_CAPACITY < page.total_data_size() * 3 {
                // Still mostly full.
                return pos;
            }
        }

        let (parent_id, idx) = self.parent_slot(page_id);
        if idx == 0 {
            return pos;
        }
        let left_id = child_id(self.arena.page(parent_id).value_at(idx - 1));
        let left_total = self.arena.page(left_id).total_data_size();
        if PAGE_CAPACITY < left_total + self.arena.page(page_id).total_data_size() {
            // Combined contents would not fit in one page.
            return pos;
        }
        if self.arena.page(page_id).free_space() < left_total {
            self.arena.page_mut(page_id).gc();
        }
        if !self.arena.page(left_id).is_leaf() {
            self.reparent_children(left_id, page_id);
        }

        let left = self.arena.remove(left_id);
        let shifted = left.num_records();
        let merged = self.arena.page_mut(page_id).merge_from(&left);
        debug_assert!(merged);
        drop(left);

        let new_pos = ItemPos {
            page: page_id,
            slot: pos.slot + shifted,
        };

        // Collapse the parent's two entries into one carrying the left
        // page's key.
        let left_key: KeyBuf = {
            let parent = self.arena.page_mut(parent_id);
            let key = SmallVec::from_slice(parent.key_at(idx - 1));
            parent.erase_at(idx - 1);
            debug_assert_eq!(child_id(parent.value_at(idx - 1)), page_id);
            key
        };
        let updated = self
            .arena
            .page_mut(parent_id)
            .update_key_at(idx - 1, &left_key);
        debug_assert!(updated.is_ok());

        self.try_merge(ItemPos {
            page: parent_id,
            slot: idx - 1,
        });
        new_pos
    }

    /// While the root is a branch with a single child, pull the child's
    /// contents into the root. `pos` is remapped when it referenced a
    /// lifted page.
    fn lift_up(&mut self, pos: &mut ItemPos) {
        let mut lifted = false;
        loop {
            let root = self.arena.page(ROOT_PAGE);
            if root.is_leaf() || root.num_records() != 1 {
                break;
            }
            let child = child_id(root.value_at(0));
            debug_assert_eq!(self.arena.page(child).level() + 1, root.level());

            let mut page = self.arena.remove(child);
            let root = self.arena.page_mut(ROOT_PAGE);
            root.swap_contents(&mut page);
            root.set_parent(NO_PAGE);
            drop(page);

            if pos.page == child {
                pos.page = ROOT_PAGE;
            }
            lifted = true;
        }
        if lifted && !self.arena.page(ROOT_PAGE).is_leaf() {
            self.reparent_children(ROOT_PAGE, ROOT_PAGE);
        }
    }

    /// Roll an in-page end position over to the next leaf.
    fn normalize(&self, pos: ItemPos) -> ItemPos {
        if pos.is_end() || pos.slot < self.arena.page(pos.page).num_records() {
            return pos;
        }
        match self.next_leaf(pos.page) {
            Some(id) => ItemPos { page: id, slot: 0 },
            None => ItemPos::END,
        }
    }

    #[cfg(test)]
    pub(crate) fn live_pages(&self) -> usize {
        self.arena.live_pages()
    }
}

impl<K, V, C> Default for BtreeMap<K, V, C>
where
    K: FixedRecord,
    V: FixedRecord,
    C: KeyCmp,
{
    fn default() -> Self {
        Self::new()
    }
}
