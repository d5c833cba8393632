//! # Slotted Page Implementation
//!
//! A page is a fixed `PAGE_SIZE` byte buffer holding sorted key-value
//! records behind a slot directory. It is the unit the tree splits,
//! merges and garbage-collects; leaf pages store application values and
//! branch pages store child page references.
//!
//! ## Page Layout
//!
//! ```text
//! +----------------------+ 0
//! | PageHeader (12B)     |  rec_end, slot_begin, level, total, parent
//! +----------------------+ 12
//! | Record region        |  key || value blobs, appended in insertion
//! | (grows up)           |  order, NOT key order
//! +----------------------+ rec_end
//! | Free space           |  free_space = slot_begin - rec_end
//! +----------------------+ slot_begin
//! | Slot directory       |  Slot = (off, key_size, value_size), 6B each,
//! | (grows down)         |  slot 0 at slot_begin, sorted by key
//! +----------------------+ PAGE_SIZE
//! ```
//!
//! The slot directory is the sorted view: slot index order is key order
//! under the tree comparator, while record bytes stay wherever insertion
//! appended them. Erase only removes the slot; the orphaned record bytes
//! are reclaimed by [`SlottedPage::gc`], which rebuilds the page into a
//! scratch buffer and swaps.
//!
//! ## Search
//!
//! Two binary searches over the directory:
//!
//! - `lower_bound_slot`: smallest index whose key >= the query, with
//!   `Empty` / `Upper` sentinels fast-pathed before the bisection.
//! - `search_slot`: branch descent form, `key(i) <= query < key(i+1)`,
//!   with a `Lower` sentinel for queries below every key. The stored key
//!   of a tree's left edge may lag behind the true subtree minimum, so
//!   callers clamp `Lower` to the left-most child.
//!
//! ## Insertion
//!
//! ```text
//! 1. lower_bound_slot; an equality hit is KeyExists
//! 2. need key + value + SLOT_SIZE bytes of free space, else NoSpace
//! 3. append key || value at rec_end
//! 4. grow the directory one slot downward and shift the slots below the
//!    insertion point, an in-place insertion sort of the new slot
//! 5. update total_data_size
//! ```
//!
//! ## Invariants
//!
//! - `PAGE_HEADER_SIZE <= rec_end <= slot_begin <= PAGE_SIZE`
//! - `(PAGE_SIZE - slot_begin) % SLOT_SIZE == 0`; the quotient is the
//!   record count
//! - slot keys strictly increase under the comparator
//! - `total_data_size` = sum of `key_size + value_size + SLOT_SIZE`
//!
//! `is_valid` audits all of these; structural operations check them with
//! debug assertions.
//!
//! ## Thread Safety
//!
//! No internal synchronization. The embedded [`LockModes`] record is a
//! reserved hook for a future lock manager and is not consulted by any
//! operation here; callers serialize access externally.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem;

use eyre::{bail, Result};
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::btree::compare::KeyCmp;
use crate::btree::error::BtreeError;
use crate::btree::lock::LockModes;
use crate::config::{
    LEVEL_UNSET, NO_PAGE, PAGE_CAPACITY, PAGE_HEADER_SIZE, PAGE_SIZE, SLOT_SIZE,
};
use crate::memory::PageBuf;

/// Page header. All fields little-endian, packed, no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct PageHeader {
    /// End of the record region; grows up.
    rec_end: U16,
    /// Start of the slot directory; grows down.
    slot_begin: U16,
    /// 0 for leaves, >0 for branch pages.
    level: U16,
    /// Sum of slot + key + value bytes over all live slots.
    total_data_size: U16,
    /// Parent page id; NO_PAGE at the root.
    parent: U32,
}

const _: () = assert!(std::mem::size_of::<PageHeader>() == PAGE_HEADER_SIZE);

/// Slot directory entry addressing one record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct Slot {
    off: U16,
    key_size: U16,
    value_size: U16,
}

const _: () = assert!(std::mem::size_of::<Slot>() == SLOT_SIZE);

impl Slot {
    fn new(off: usize, key_size: usize, value_size: usize) -> Self {
        Self {
            off: U16::new(off as u16),
            key_size: U16::new(key_size as u16),
            value_size: U16::new(value_size as u16),
        }
    }

    pub fn off(&self) -> usize {
        self.off.get() as usize
    }

    pub fn key_size(&self) -> usize {
        self.key_size.get() as usize
    }

    pub fn value_size(&self) -> usize {
        self.value_size.get() as usize
    }
}

/// Result of a directory binary search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotSearch {
    /// The page has no slots.
    Empty,
    /// The query is below every key in the page.
    Lower,
    /// The query is above every key in the page.
    Upper,
    /// A concrete slot index.
    At(u16),
}

/// A fixed-size slotted page, sorted under the comparator `C`.
pub struct SlottedPage<C> {
    buf: PageBuf,
    locks: LockModes,
    _cmp: PhantomData<C>,
}

impl<C: KeyCmp> SlottedPage<C> {
    /// A fresh empty page. The level is poisoned with `LEVEL_UNSET`; the
    /// caller links the page in and assigns the real level.
    pub fn new() -> Self {
        let mut page = Self {
            buf: PageBuf::zeroed(),
            locks: LockModes::new(),
            _cmp: PhantomData,
        };
        page.clear();
        page
    }

    /// Drop every record and reset the header. Level and parent are
    /// poisoned; structural code reassigns them.
    pub fn clear(&mut self) {
        let header = self.header_mut();
        header.rec_end = U16::new(PAGE_HEADER_SIZE as u16);
        header.slot_begin = U16::new(PAGE_SIZE as u16);
        header.level = U16::new(LEVEL_UNSET);
        header.total_data_size = U16::new(0);
        header.parent = U32::new(NO_PAGE);
    }

    fn header(&self) -> &PageHeader {
        // INVARIANT: the buffer always holds at least PAGE_HEADER_SIZE bytes.
        PageHeader::ref_from_bytes(&self.buf.as_slice()[..PAGE_HEADER_SIZE]).unwrap()
    }

    fn header_mut(&mut self) -> &mut PageHeader {
        // INVARIANT: the buffer always holds at least PAGE_HEADER_SIZE bytes.
        PageHeader::mut_from_bytes(&mut self.buf.as_mut_slice()[..PAGE_HEADER_SIZE]).unwrap()
    }

    fn rec_end(&self) -> usize {
        self.header().rec_end.get() as usize
    }

    fn slot_begin(&self) -> usize {
        self.header().slot_begin.get() as usize
    }

    pub fn level(&self) -> u16 {
        self.header().level.get()
    }

    pub fn set_level(&mut self, level: u16) {
        self.header_mut().level = U16::new(level);
    }

    pub fn is_leaf(&self) -> bool {
        self.level() == 0
    }

    pub fn parent(&self) -> u32 {
        self.header().parent.get()
    }

    pub fn set_parent(&mut self, parent: u32) {
        self.header_mut().parent = U32::new(parent);
    }

    pub fn total_data_size(&self) -> usize {
        self.header().total_data_size.get() as usize
    }

    pub fn num_records(&self) -> u16 {
        ((PAGE_SIZE - self.slot_begin()) / SLOT_SIZE) as u16
    }

    pub fn is_empty(&self) -> bool {
        self.slot_begin() == PAGE_SIZE
    }

    pub fn free_space(&self) -> usize {
        self.slot_begin() - self.rec_end()
    }

    /// Whether a record of `record_size` key+value bytes fits.
    pub fn can_insert(&self, record_size: usize) -> bool {
        record_size + SLOT_SIZE <= self.free_space()
    }

    /// Heuristic: compaction is likely profitable when live data fills
    /// less than half the page.
    pub fn should_gc(&self) -> bool {
        self.total_data_size() * 2 < PAGE_CAPACITY
    }

    fn slot_pos(&self, idx: u16) -> usize {
        self.slot_begin() + idx as usize * SLOT_SIZE
    }

    pub fn slot(&self, idx: u16) -> Slot {
        debug_assert!(idx < self.num_records());
        let pos = self.slot_pos(idx);
        // INVARIANT: the slot directory lies inside the buffer.
        Slot::read_from_bytes(&self.buf.as_slice()[pos..pos + SLOT_SIZE]).unwrap()
    }

    fn set_slot(&mut self, idx: u16, slot: Slot) {
        debug_assert!(idx < self.num_records());
        let pos = self.slot_pos(idx);
        self.buf.as_mut_slice()[pos..pos + SLOT_SIZE].copy_from_slice(slot.as_bytes());
    }

    pub fn key_at(&self, idx: u16) -> &[u8] {
        let slot = self.slot(idx);
        &self.buf.as_slice()[slot.off()..slot.off() + slot.key_size()]
    }

    pub fn value_at(&self, idx: u16) -> &[u8] {
        let slot = self.slot(idx);
        let start = slot.off() + slot.key_size();
        &self.buf.as_slice()[start..start + slot.value_size()]
    }

    pub fn min_key(&self) -> &[u8] {
        debug_assert!(!self.is_empty());
        self.key_at(0)
    }

    pub fn max_key(&self) -> &[u8] {
        debug_assert!(!self.is_empty());
        self.key_at(self.num_records() - 1)
    }

    /// Whether `key` is below every key in the page.
    pub fn is_lower(&self, key: &[u8]) -> bool {
        debug_assert!(!self.is_empty());
        C::compare(key, self.min_key()) == Ordering::Less
    }

    /// Whether `key` is above every key in the page.
    pub fn is_upper(&self, key: &[u8]) -> bool {
        debug_assert!(!self.is_empty());
        C::compare(self.max_key(), key) == Ordering::Less
    }

    /// Smallest slot index whose key >= `key`.
    ///
    /// The below-every-key case resolves to index 0; `Upper` means the
    /// query is above every key, `Empty` that there are no slots.
    pub fn lower_bound_slot(&self, key: &[u8]) -> SlotSearch {
        if self.is_empty() {
            return SlotSearch::Empty;
        }
        if self.is_upper(key) {
            return SlotSearch::Upper;
        }
        if self.is_lower(key) {
            return SlotSearch::At(0);
        }

        let mut i0 = 0u16;
        let mut i1 = self.num_records() - 1;
        while i0 + 1 < i1 {
            let i = (i0 + i1) / 2;
            match C::compare(key, self.key_at(i)) {
                Ordering::Equal => return SlotSearch::At(i),
                Ordering::Less => i1 = i,
                Ordering::Greater => i0 = i,
            }
        }
        if C::compare(self.key_at(i0), key) == Ordering::Less {
            SlotSearch::At(i1)
        } else {
            SlotSearch::At(i0)
        }
    }

    /// Branch-descent search: the slot index with
    /// `key(i) <= query < key(i+1)`.
    ///
    /// `Lower` / `Upper` report a query outside the stored key range; the
    /// left edge of a tree may store a lagging minimum, so `Lower` is a
    /// normal outcome there.
    pub fn search_slot(&self, key: &[u8]) -> SlotSearch {
        if self.is_empty() {
            return SlotSearch::Empty;
        }
        if self.is_upper(key) {
            return SlotSearch::Upper;
        }
        if self.is_lower(key) {
            return SlotSearch::Lower;
        }

        let mut i0 = 0u16;
        let mut i1 = self.num_records() - 1;
        while i0 + 1 < i1 {
            let i = (i0 + i1) / 2;
            match C::compare(key, self.key_at(i)) {
                Ordering::Equal => return SlotSearch::At(i),
                Ordering::Less => i1 = i,
                Ordering::Greater => i0 = i,
            }
        }
        if C::compare(self.key_at(i1), key) == Ordering::Equal {
            SlotSearch::At(i1)
        } else {
            SlotSearch::At(i0)
        }
    }

    /// `lower_bound_slot` as a directory index, with `num_records()` as
    /// the end position.
    pub fn lower_bound(&self, key: &[u8]) -> u16 {
        match self.lower_bound_slot(key) {
            SlotSearch::At(i) => i,
            SlotSearch::Lower => 0,
            SlotSearch::Empty | SlotSearch::Upper => self.num_records(),
        }
    }

    /// `search_slot` with the sentinels clamped the way child selection
    /// needs them: without `allow_lower` a below-range query resolves to
    /// the first slot, without `allow_upper` an above-range query to the
    /// last. Allowed sentinels (and an empty page) resolve to the end
    /// position.
    pub fn search(&self, key: &[u8], allow_lower: bool, allow_upper: bool) -> u16 {
        match self.search_slot(key) {
            SlotSearch::At(i) => i,
            SlotSearch::Upper if !allow_upper => self.num_records() - 1,
            SlotSearch::Lower if !allow_lower => 0,
            SlotSearch::Empty | SlotSearch::Lower | SlotSearch::Upper => self.num_records(),
        }
    }

    /// Insert a record, keeping the directory sorted.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let pos = match self.lower_bound_slot(key) {
            SlotSearch::At(i) => {
                if C::compare(key, self.key_at(i)) == Ordering::Equal {
                    bail!(BtreeError::KeyExists);
                }
                i
            }
            SlotSearch::Empty | SlotSearch::Lower => 0,
            SlotSearch::Upper => self.num_records(),
        };

        if !self.can_insert(key.len() + value.len()) {
            bail!(BtreeError::NoSpace);
        }

        let rec_off = self.rec_end();
        let data = self.buf.as_mut_slice();
        data[rec_off..rec_off + key.len()].copy_from_slice(key);
        data[rec_off + key.len()..rec_off + key.len() + value.len()].copy_from_slice(value);

        // Grow the directory one slot downward; the slots below the
        // insertion point follow it.
        let old_begin = self.slot_begin();
        let new_begin = old_begin - SLOT_SIZE;
        let shifted = pos as usize * SLOT_SIZE;
        self.buf
            .as_mut_slice()
            .copy_within(old_begin..old_begin + shifted, new_begin);

        let record = key.len() + value.len();
        let header = self.header_mut();
        header.rec_end = U16::new((rec_off + record) as u16);
        header.slot_begin = U16::new(new_begin as u16);
        header.total_data_size =
            U16::new((header.total_data_size.get() as usize + record + SLOT_SIZE) as u16);

        self.set_slot(pos, Slot::new(rec_off, key.len(), value.len()));
        Ok(())
    }

    /// Remove the record with exactly `key`. Returns true iff it existed.
    pub fn erase_key(&mut self, key: &[u8]) -> bool {
        match self.lower_bound_slot(key) {
            SlotSearch::At(i) if C::compare(key, self.key_at(i)) == Ordering::Equal => {
                self.erase_at(i);
                true
            }
            _ => false,
        }
    }

    /// Remove the slot at `idx`. The record bytes stay orphaned until
    /// `gc`. Afterwards `idx` addresses the record that followed.
    pub fn erase_at(&mut self, idx: u16) {
        debug_assert!(idx < self.num_records());
        let slot = self.slot(idx);

        let old_begin = self.slot_begin();
        let new_begin = old_begin + SLOT_SIZE;
        let shifted = idx as usize * SLOT_SIZE;
        self.buf
            .as_mut_slice()
            .copy_within(old_begin..old_begin + shifted, new_begin);

        let freed = slot.key_size() + slot.value_size() + SLOT_SIZE;
        let header = self.header_mut();
        header.slot_begin = U16::new(new_begin as u16);
        header.total_data_size = U16::new((header.total_data_size.get() as usize - freed) as u16);
    }

    /// Overwrite the value of `key` in place. The new value must not be
    /// larger than the stored one; records are never relocated here.
    pub fn update_value(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let idx = match self.lower_bound_slot(key) {
            SlotSearch::At(i) if C::compare(key, self.key_at(i)) == Ordering::Equal => i,
            _ => bail!(BtreeError::KeyNotExists),
        };

        let slot = self.slot(idx);
        if slot.value_size() < value.len() {
            bail!(BtreeError::NoSpace);
        }

        let start = slot.off() + slot.key_size();
        self.buf.as_mut_slice()[start..start + value.len()].copy_from_slice(value);

        let shrunk = slot.value_size() - value.len();
        self.set_slot(idx, Slot::new(slot.off(), slot.key_size(), value.len()));
        let header = self.header_mut();
        header.total_data_size = U16::new((header.total_data_size.get() as usize - shrunk) as u16);
        Ok(())
    }

    /// Overwrite the key of slot `idx` in place, used when a subtree's
    /// minimum moved below the stored key. The new key must fit in the
    /// stored key's bytes and keep the slot strictly ordered against its
    /// neighbors.
    pub fn update_key_at(&mut self, idx: u16, key: &[u8]) -> Result<()> {
        debug_assert!(idx < self.num_records());
        let slot = self.slot(idx);
        if slot.key_size() < key.len() {
            bail!(BtreeError::NoSpace);
        }
        if idx > 0 && C::compare(self.key_at(idx - 1), key) != Ordering::Less {
            bail!(BtreeError::InvalidKey);
        }
        if idx + 1 < self.num_records() && C::compare(key, self.key_at(idx + 1)) != Ordering::Less
        {
            bail!(BtreeError::InvalidKey);
        }

        let data = self.buf.as_mut_slice();
        data[slot.off()..slot.off() + key.len()].copy_from_slice(key);
        if key.len() != slot.key_size() {
            // Keep the value contiguous with the shrunken key.
            let old_value_start = slot.off() + slot.key_size();
            data.copy_within(
                old_value_start..old_value_start + slot.value_size(),
                slot.off() + key.len(),
            );
        }

        let shrunk = slot.key_size() - key.len();
        self.set_slot(idx, Slot::new(slot.off(), key.len(), slot.value_size()));
        let header = self.header_mut();
        header.total_data_size = U16::new((header.total_data_size.get() as usize - shrunk) as u16);
        Ok(())
    }

    /// Split into two fresh pages of the same level and clear this one.
    ///
    /// With `half_and_half` the lower half of the slots goes to the first
    /// page and the upper half to the second; otherwise everything moves
    /// to the first. Records are reinserted, so both pages come out
    /// compact. The caller wires up parents.
    pub fn split(&mut self, half_and_half: bool) -> (Self, Self) {
        let mut p0 = Self::new();
        let mut p1 = Self::new();
        p0.set_level(self.level());
        p1.set_level(self.level());

        if !half_and_half {
            self.swap_contents(&mut p0);
            self.clear();
            return (p0, p1);
        }

        // Reverse order: every reinsert lands at slot 0 and shifts nothing.
        let n = self.num_records();
        for i in (n / 2..n).rev() {
            let inserted = p1.insert(self.key_at(i), self.value_at(i));
            debug_assert!(inserted.is_ok());
        }
        for i in (0..n / 2).rev() {
            let inserted = p0.insert(self.key_at(i), self.value_at(i));
            debug_assert!(inserted.is_ok());
        }
        self.clear();
        (p0, p1)
    }

    /// Pull every record of `left` into this page. All of `left`'s keys
    /// must sort below this page's. Returns false (touching nothing) when
    /// contiguous free space is short; callers gc first in that case.
    pub fn merge_from(&mut self, left: &Self) -> bool {
        if self.free_space() < left.total_data_size() {
            return false;
        }
        debug_assert_eq!(self.level(), left.level());

        for i in (0..left.num_records()).rev() {
            let inserted = self.insert(left.key_at(i), left.value_at(i));
            debug_assert!(inserted.is_ok());
        }
        true
    }

    /// Compact the page: rebuild into a scratch page, dropping orphaned
    /// record bytes, then swap buffers. Level and parent survive.
    pub fn gc(&mut self) {
        let mut scratch = Self::new();
        for i in 0..self.num_records() {
            let inserted = scratch.insert(self.key_at(i), self.value_at(i));
            debug_assert!(inserted.is_ok());
        }
        scratch.set_level(self.level());
        scratch.set_parent(self.parent());
        self.swap_contents(&mut scratch);
    }

    /// Swap page contents (bytes only; the lock record stays put).
    pub fn swap_contents(&mut self, other: &mut Self) {
        mem::swap(&mut self.buf, &mut other.buf);
    }

    /// Recompute `total_data_size` from the directory.
    pub fn calc_total_data_size(&self) -> usize {
        (0..self.num_records())
            .map(|i| {
                let slot = self.slot(i);
                slot.key_size() + slot.value_size() + SLOT_SIZE
            })
            .sum()
    }

    /// Audit the page invariants.
    pub fn is_valid(&self) -> bool {
        let rec_end = self.rec_end();
        let slot_begin = self.slot_begin();
        if rec_end < PAGE_HEADER_SIZE || rec_end > slot_begin || slot_begin > PAGE_SIZE {
            return false;
        }
        if (PAGE_SIZE - slot_begin) % SLOT_SIZE != 0 {
            return false;
        }
        if self.total_data_size() != self.calc_total_data_size() {
            return false;
        }
        for i in 0..self.num_records() {
            let slot = self.slot(i);
            if slot.off() < PAGE_HEADER_SIZE || slot.off() + slot.key_size() + slot.value_size() > rec_end {
                return false;
            }
            if i > 0 && C::compare(self.key_at(i - 1), self.key_at(i)) != Ordering::Less {
                return false;
            }
        }
        true
    }

    /// Reserved lock-mode counters; no page or tree algorithm reads them.
    pub fn locks(&self) -> &LockModes {
        &self.locks
    }

    pub fn locks_mut(&mut self) -> &mut LockModes {
        &mut self.locks
    }

    /// Ordered cursor over the directory, starting at slot 0.
    pub fn cursor(&self) -> SlotCursor<'_, C> {
        SlotCursor { page: self, idx: 0 }
    }

    pub fn cursor_at(&self, idx: u16) -> SlotCursor<'_, C> {
        debug_assert!(idx <= self.num_records());
        SlotCursor { page: self, idx }
    }
}

impl<C: KeyCmp> Default for SlottedPage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: KeyCmp> std::fmt::Debug for SlottedPage<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlottedPage")
            .field("level", &self.level())
            .field("num_records", &self.num_records())
            .field("free_space", &self.free_space())
            .field("total_data_size", &self.total_data_size())
            .field("parent", &self.parent())
            .finish()
    }
}

/// Read cursor stepping through slots in key order.
///
/// The end position is `idx == num_records()`. Erasing through
/// [`SlottedPage::erase_at`] leaves the erased index addressing the next
/// record, so an erase-while-scanning loop re-reads the same index.
pub struct SlotCursor<'a, C> {
    page: &'a SlottedPage<C>,
    idx: u16,
}

impl<'a, C: KeyCmp> SlotCursor<'a, C> {
    pub fn idx(&self) -> u16 {
        self.idx
    }

    pub fn is_begin(&self) -> bool {
        self.idx == 0
    }

    pub fn is_end(&self) -> bool {
        self.idx >= self.page.num_records()
    }

    pub fn advance(&mut self) {
        debug_assert!(!self.is_end());
        self.idx += 1;
    }

    pub fn retreat(&mut self) {
        debug_assert!(!self.is_begin());
        self.idx -= 1;
    }

    pub fn key(&self) -> &'a [u8] {
        debug_assert!(!self.is_end());
        self.page.key_at(self.idx)
    }

    pub fn value(&self) -> &'a [u8] {
        debug_assert!(!self.is_end());
        self.page.value_at(self.idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::compare::{Lexical, NativeOrder};

    type BytePage = SlottedPage<Lexical>;
    type U32Page = SlottedPage<NativeOrder<u32>>;

    #[test]
    fn fresh_page_is_empty() {
        let page = BytePage::new();

        assert!(page.is_empty());
        assert_eq!(page.num_records(), 0);
        assert_eq!(page.total_data_size(), 0);
        assert_eq!(page.free_space(), PAGE_CAPACITY);
        assert_eq!(page.level(), LEVEL_UNSET);
        assert_eq!(page.parent(), NO_PAGE);
        assert!(page.is_valid());
    }

    #[test]
    fn insert_maintains_sorted_order() {
        let mut page = BytePage::new();

        page.insert(b"charlie", b"3").unwrap();
        page.insert(b"alpha", b"1").unwrap();
        page.insert(b"bravo", b"2").unwrap();

        assert_eq!(page.num_records(), 3);
        assert_eq!(page.key_at(0), b"alpha");
        assert_eq!(page.key_at(1), b"bravo");
        assert_eq!(page.key_at(2), b"charlie");
        assert_eq!(page.value_at(1), b"2");
        assert!(page.is_valid());
    }

    #[test]
    fn insert_duplicate_reports_key_exists() {
        let mut page = BytePage::new();
        page.insert(b"key", b"one").unwrap();

        let err = page.insert(b"key", b"two").unwrap_err();
        assert_eq!(err.downcast_ref::<BtreeError>(), Some(&BtreeError::KeyExists));
        assert_eq!(page.num_records(), 1);
        assert_eq!(page.value_at(0), b"one");
    }

    #[test]
    fn insert_without_space_reports_no_space() {
        let mut page = U32Page::new();
        let mut k = 0u32;
        while page.can_insert(8) {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
            k += 1;
        }

        let err = page.insert(k.as_bytes(), k.as_bytes()).unwrap_err();
        assert_eq!(err.downcast_ref::<BtreeError>(), Some(&BtreeError::NoSpace));
        assert!(page.is_valid());
    }

    #[test]
    fn total_data_size_tracks_operations() {
        let mut page = BytePage::new();

        page.insert(b"aa", b"11").unwrap();
        page.insert(b"bb", b"2222").unwrap();
        assert_eq!(page.total_data_size(), page.calc_total_data_size());

        assert!(page.erase_key(b"aa"));
        assert_eq!(page.total_data_size(), page.calc_total_data_size());

        page.update_value(b"bb", b"33").unwrap();
        assert_eq!(page.total_data_size(), page.calc_total_data_size());
        assert!(page.is_valid());
    }

    #[test]
    fn erase_shifts_following_slots() {
        let mut page = U32Page::new();
        for k in [10u32, 20, 30, 40] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        page.erase_at(1);

        assert_eq!(page.num_records(), 3);
        assert_eq!(page.key_at(0), 10u32.as_bytes());
        assert_eq!(page.key_at(1), 30u32.as_bytes());
        assert_eq!(page.key_at(2), 40u32.as_bytes());
    }

    #[test]
    fn erase_key_misses_between_keys() {
        let mut page = U32Page::new();
        page.insert(10u32.as_bytes(), 1u32.as_bytes()).unwrap();
        page.insert(30u32.as_bytes(), 3u32.as_bytes()).unwrap();

        assert!(!page.erase_key(20u32.as_bytes()));
        assert!(!page.erase_key(5u32.as_bytes()));
        assert!(!page.erase_key(99u32.as_bytes()));
        assert_eq!(page.num_records(), 2);
    }

    #[test]
    fn update_value_in_place() {
        let mut page = BytePage::new();
        page.insert(b"key", b"longvalue").unwrap();

        page.update_value(b"key", b"short").unwrap();
        assert_eq!(page.value_at(0), b"short");

        let err = page.update_value(b"key", b"value-too-long").unwrap_err();
        assert_eq!(err.downcast_ref::<BtreeError>(), Some(&BtreeError::NoSpace));

        let err = page.update_value(b"missing", b"x").unwrap_err();
        assert_eq!(
            err.downcast_ref::<BtreeError>(),
            Some(&BtreeError::KeyNotExists)
        );
    }

    #[test]
    fn update_key_checks_neighbor_order() {
        let mut page = U32Page::new();
        for k in [10u32, 20, 30] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        // 20 -> 15 keeps 10 < 15 < 30.
        page.update_key_at(1, 15u32.as_bytes()).unwrap();
        assert_eq!(page.key_at(1), 15u32.as_bytes());
        assert!(page.is_valid());

        // 15 -> 5 would break 10 < key.
        let err = page.update_key_at(1, 5u32.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BtreeError>(),
            Some(&BtreeError::InvalidKey)
        );

        // 15 -> 30 would break key < 30.
        let err = page.update_key_at(1, 30u32.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<BtreeError>(),
            Some(&BtreeError::InvalidKey)
        );
    }

    #[test]
    fn update_key_shrinking_keeps_value_contiguous() {
        let mut page = BytePage::new();
        page.insert(b"longkey", b"value").unwrap();

        page.update_key_at(0, b"key").unwrap();

        assert_eq!(page.key_at(0), b"key");
        assert_eq!(page.value_at(0), b"value");
        assert_eq!(page.total_data_size(), page.calc_total_data_size());
    }

    #[test]
    fn lower_bound_slot_sentinels() {
        let mut page = U32Page::new();
        assert_eq!(page.lower_bound_slot(5u32.as_bytes()), SlotSearch::Empty);

        for k in [10u32, 20, 30, 40, 50] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        assert_eq!(page.lower_bound_slot(5u32.as_bytes()), SlotSearch::At(0));
        assert_eq!(page.lower_bound_slot(10u32.as_bytes()), SlotSearch::At(0));
        assert_eq!(page.lower_bound_slot(25u32.as_bytes()), SlotSearch::At(2));
        assert_eq!(page.lower_bound_slot(30u32.as_bytes()), SlotSearch::At(2));
        assert_eq!(page.lower_bound_slot(50u32.as_bytes()), SlotSearch::At(4));
        assert_eq!(page.lower_bound_slot(51u32.as_bytes()), SlotSearch::Upper);
    }

    #[test]
    fn search_slot_brackets_the_query() {
        let mut page = U32Page::new();
        for k in [10u32, 20, 30] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        assert_eq!(page.search_slot(5u32.as_bytes()), SlotSearch::Lower);
        assert_eq!(page.search_slot(10u32.as_bytes()), SlotSearch::At(0));
        assert_eq!(page.search_slot(15u32.as_bytes()), SlotSearch::At(0));
        assert_eq!(page.search_slot(20u32.as_bytes()), SlotSearch::At(1));
        assert_eq!(page.search_slot(29u32.as_bytes()), SlotSearch::At(1));
        assert_eq!(page.search_slot(30u32.as_bytes()), SlotSearch::At(2));
        assert_eq!(page.search_slot(31u32.as_bytes()), SlotSearch::Upper);
    }

    #[test]
    fn search_clamps_sentinels_for_child_selection() {
        let mut page = U32Page::new();
        for k in [10u32, 20, 30] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        assert_eq!(page.search(5u32.as_bytes(), false, false), 0);
        assert_eq!(page.search(35u32.as_bytes(), false, false), 2);
        assert_eq!(page.search(5u32.as_bytes(), true, false), 3);
        assert_eq!(page.search(35u32.as_bytes(), false, true), 3);
        assert_eq!(page.search(20u32.as_bytes(), true, true), 1);
    }

    #[test]
    fn split_half_and_half_partitions_by_slot_count() {
        let mut page = U32Page::new();
        for k in 0u32..10 {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }
        page.set_level(0);

        let (p0, p1) = page.split(true);

        assert!(page.is_empty());
        assert_eq!(p0.num_records(), 5);
        assert_eq!(p1.num_records(), 5);
        assert_eq!(p0.min_key(), 0u32.as_bytes());
        assert_eq!(p0.max_key(), 4u32.as_bytes());
        assert_eq!(p1.min_key(), 5u32.as_bytes());
        assert_eq!(p1.max_key(), 9u32.as_bytes());
        assert_eq!(p0.level(), 0);
        assert_eq!(p1.level(), 0);
        assert!(p0.is_valid() && p1.is_valid());
    }

    #[test]
    fn split_all_to_first_leaves_second_empty() {
        let mut page = U32Page::new();
        for k in 0u32..4 {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }
        page.set_level(0);

        let (p0, p1) = page.split(false);

        assert_eq!(p0.num_records(), 4);
        assert!(p1.is_empty());
        assert!(page.is_empty());
    }

    #[test]
    fn merge_concatenates_left_then_right() {
        let mut left = U32Page::new();
        let mut right = U32Page::new();
        left.set_level(0);
        right.set_level(0);
        for k in 0u32..5 {
            left.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }
        for k in 5u32..8 {
            right.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        assert!(right.merge_from(&left));

        assert_eq!(right.num_records(), 8);
        for k in 0u32..8 {
            assert_eq!(right.key_at(k as u16), k.as_bytes());
        }
        assert!(right.is_valid());
    }

    #[test]
    fn merge_without_space_is_a_no_op() {
        let mut left = U32Page::new();
        let mut right = U32Page::new();
        left.set_level(0);
        right.set_level(0);
        let mut k = 0u32;
        while right.can_insert(8) {
            right.insert(k.as_bytes(), k.as_bytes()).unwrap();
            k += 1;
        }
        left.insert(1000u32.as_bytes(), 0u32.as_bytes()).unwrap();

        let before = right.num_records();
        assert!(!right.merge_from(&left));
        assert_eq!(right.num_records(), before);
    }

    #[test]
    fn gc_reclaims_orphaned_record_bytes() {
        let mut page = U32Page::new();
        let mut k = 0u32;
        while page.can_insert(8) {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
            k += 1;
        }
        assert!(!page.can_insert(8));

        // Erase every other key; the record bytes stay orphaned.
        let survivors = page.num_records() / 2;
        let mut i = 0u16;
        while i < page.num_records() {
            page.erase_at(i);
            i += 1;
        }
        assert!(!page.can_insert(8) || page.free_space() < page.total_data_size());

        page.set_level(0);
        page.gc();

        assert_eq!(page.num_records(), survivors);
        assert!(page.can_insert(8));
        assert_eq!(page.level(), 0);
        assert!(page.is_valid());
        // The record region is compact again.
        assert_eq!(
            page.rec_end() - PAGE_HEADER_SIZE,
            page.total_data_size() - page.num_records() as usize * SLOT_SIZE
        );
    }

    #[test]
    fn gc_preserves_contents_and_links() {
        let mut page = U32Page::new();
        for k in [3u32, 1, 4, 1u32.wrapping_neg(), 5] {
            let _ = page.insert(k.as_bytes(), k.as_bytes());
        }
        page.set_level(2);
        page.set_parent(7);
        let before: Vec<(Vec<u8>, Vec<u8>)> = (0..page.num_records())
            .map(|i| (page.key_at(i).to_vec(), page.value_at(i).to_vec()))
            .collect();

        page.gc();

        let after: Vec<(Vec<u8>, Vec<u8>)> = (0..page.num_records())
            .map(|i| (page.key_at(i).to_vec(), page.value_at(i).to_vec()))
            .collect();
        assert_eq!(before, after);
        assert_eq!(page.level(), 2);
        assert_eq!(page.parent(), 7);
    }

    #[test]
    fn cursor_walks_in_key_order() {
        let mut page = U32Page::new();
        for k in [30u32, 10, 20] {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        let mut cursor = page.cursor();
        let mut seen = Vec::new();
        while !cursor.is_end() {
            seen.push(u32::read_from_bytes(cursor.key()).unwrap());
            cursor.advance();
        }
        assert_eq!(seen, vec![10, 20, 30]);

        cursor.retreat();
        assert_eq!(cursor.key(), 30u32.as_bytes());
    }

    #[test]
    fn erase_at_leaves_index_on_next_record() {
        let mut page = U32Page::new();
        for k in 0u32..6 {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
        }

        // Drop the even keys by re-reading the same index after each erase.
        let mut i = 0u16;
        while i < page.num_records() {
            let k = u32::read_from_bytes(page.key_at(i)).unwrap();
            if k % 2 == 0 {
                page.erase_at(i);
            } else {
                i += 1;
            }
        }

        assert_eq!(page.num_records(), 3);
        assert_eq!(page.key_at(0), 1u32.as_bytes());
        assert_eq!(page.key_at(1), 3u32.as_bytes());
        assert_eq!(page.key_at(2), 5u32.as_bytes());
    }

    #[test]
    fn should_gc_tracks_live_data_ratio() {
        let mut page = U32Page::new();
        assert!(page.should_gc());

        let mut k = 0u32;
        while page.can_insert(8) {
            page.insert(k.as_bytes(), k.as_bytes()).unwrap();
            k += 1;
        }
        assert!(!page.should_gc());
    }
}
