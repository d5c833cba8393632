//! # Page Arena
//!
//! The arena owns every page of a tree under a stable `u32` page id.
//! Parent and child references between pages are ids into the arena, so
//! bottom-up walks stay O(1) per step without raw back-edges. Id 0 is
//! the root: created with the arena, never released, its contents
//! swapped in place during lift-up and clear.
//!
//! Released ids go on a free list and are handed out again by later
//! allocations, so an id is only meaningful while its page is live.

use crate::btree::compare::KeyCmp;
use crate::btree::page::SlottedPage;
use crate::config::{NO_PAGE, ROOT_PAGE};

pub(crate) struct PageArena<C> {
    pages: Vec<Option<SlottedPage<C>>>,
    free: Vec<u32>,
}

impl<C: KeyCmp> PageArena<C> {
    /// An arena holding just the root: an empty leaf.
    pub fn new() -> Self {
        let mut root = SlottedPage::new();
        root.set_level(0);
        Self {
            pages: vec![Some(root)],
            free: Vec::new(),
        }
    }

    pub fn page(&self, id: u32) -> &SlottedPage<C> {
        // INVARIANT: ids handed out by insert() stay live until release().
        self.pages[id as usize].as_ref().expect("released page id")
    }

    pub fn page_mut(&mut self, id: u32) -> &mut SlottedPage<C> {
        // INVARIANT: ids handed out by insert() stay live until release().
        self.pages[id as usize].as_mut().expect("released page id")
    }

    /// Take ownership of `page` and return its id.
    pub fn insert(&mut self, page: SlottedPage<C>) -> u32 {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.pages[id as usize].is_none());
                self.pages[id as usize] = Some(page);
                id
            }
            None => {
                let id = self.pages.len() as u32;
                debug_assert!(id < NO_PAGE);
                self.pages.push(Some(page));
                id
            }
        }
    }

    /// Detach a non-root page from the tree and hand it back.
    pub fn remove(&mut self, id: u32) -> SlottedPage<C> {
        debug_assert_ne!(id, ROOT_PAGE);
        let page = self.pages[id as usize].take().expect("released page id");
        self.free.push(id);
        page
    }

    pub fn release(&mut self, id: u32) {
        drop(self.remove(id));
    }

    /// Drop every non-root page and reset the root to an empty leaf.
    pub fn reset(&mut self) {
        self.pages.truncate(1);
        self.free.clear();
        let root = self.page_mut(ROOT_PAGE);
        root.clear();
        root.set_level(0);
    }

    /// Number of live pages, root included.
    #[cfg(test)]
    pub fn live_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::btree::compare::Lexical;

    #[test]
    fn new_arena_has_a_leaf_root() {
        let arena: PageArena<Lexical> = PageArena::new();

        assert_eq!(arena.live_pages(), 1);
        assert!(arena.page(ROOT_PAGE).is_leaf());
        assert!(arena.page(ROOT_PAGE).is_empty());
    }

    #[test]
    fn released_ids_are_reused() {
        let mut arena: PageArena<Lexical> = PageArena::new();

        let a = arena.insert(SlottedPage::new());
        let b = arena.insert(SlottedPage::new());
        assert_ne!(a, b);

        arena.release(a);
        let c = arena.insert(SlottedPage::new());
        assert_eq!(c, a);
        assert_eq!(arena.live_pages(), 3);
    }

    #[test]
    fn reset_keeps_only_the_root() {
        let mut arena: PageArena<Lexical> = PageArena::new();
        let id = arena.insert(SlottedPage::new());
        arena.page_mut(id).set_level(1);
        arena.page_mut(ROOT_PAGE).insert(b"k", b"v").unwrap();

        arena.reset();

        assert_eq!(arena.live_pages(), 1);
        assert!(arena.page(ROOT_PAGE).is_empty());
        assert!(arena.page(ROOT_PAGE).is_leaf());
    }
}
