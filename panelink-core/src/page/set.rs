//! The loaded page set and its stateful item index

use alloc::vec::Vec;
use core::cell::Cell;

use super::{Page, PageItem};

/// Location of a stateful item inside the page set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ItemRef {
    page: usize,
    item: usize,
}

/// All pages plus a reverse index over stateful items
///
/// Index 0 is the screensaver when the configuration has one; the
/// navigation cycle starts after it.
#[derive(Debug, Default)]
pub struct PageSet {
    pages: Vec<Page>,
    stateful: Vec<ItemRef>,
    cached: Cell<Option<ItemRef>>,
}

impl PageSet {
    /// Build the set and index its stateful items
    ///
    /// When two stateful items share a uuid, the first one wins.
    pub fn new(pages: Vec<Page>) -> Self {
        let mut stateful: Vec<ItemRef> = Vec::new();
        for (page_index, page) in pages.iter().enumerate() {
            for (item_index, item) in page.items.iter().enumerate() {
                if !item.is_stateful() {
                    continue;
                }
                let duplicate = stateful
                    .iter()
                    .any(|r| pages[r.page].items[r.item].uuid == item.uuid);
                if duplicate {
                    warn!("Duplicate item uuid {=str} ignored", item.uuid.as_str());
                    continue;
                }
                stateful.push(ItemRef {
                    page: page_index,
                    item: item_index,
                });
            }
        }

        Self {
            pages,
            stateful,
            cached: Cell::new(None),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Whether page 0 is a screensaver
    pub fn has_screensaver(&self) -> bool {
        self.pages.first().is_some_and(Page::is_screensaver)
    }

    /// First page of the navigation cycle
    pub fn start_index(&self) -> usize {
        if self.has_screensaver() {
            1
        } else {
            0
        }
    }

    /// Index of the page with `uuid`
    pub fn find_page_index_by_uuid(&self, uuid: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.uuid == uuid)
    }

    /// Number of indexed stateful items
    pub fn stateful_count(&self) -> usize {
        self.stateful.len()
    }

    /// Stateful item anywhere in the set
    pub fn stateful_item(&self, uuid: &str) -> Option<&PageItem> {
        if let Some(cached) = self.cached.get() {
            let item = &self.pages[cached.page].items[cached.item];
            if item.uuid == uuid {
                return Some(item);
            }
        }

        let found = self
            .stateful
            .iter()
            .copied()
            .find(|r| self.pages[r.page].items[r.item].uuid == uuid);
        self.cached.set(found);
        found.map(|r| &self.pages[r.page].items[r.item])
    }
}
