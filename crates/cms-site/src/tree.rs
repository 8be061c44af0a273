//! In-memory page tree
//!
//! Holds pages and their placeholders and answers the structural queries
//! permission inheritance needs: children, descendants and ancestors.

use cms_rbac::{Page, PageId, Placeholder, PlaceholderId};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// A forest of pages across one or more sites.
///
/// # Examples
///
/// ```
/// use cms_rbac::{Page, PageId, SiteId};
/// use cms_site::PageTree;
///
/// let mut tree = PageTree::new();
/// tree.insert_page(Page::draft(PageId(1), SiteId(1)));
/// tree.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1)));
/// tree.insert_page(Page::draft(PageId(3), SiteId(1)).with_parent(PageId(2)));
///
/// assert_eq!(tree.children(PageId(1)), vec![PageId(2)]);
/// assert_eq!(tree.descendants(PageId(1)), vec![PageId(2), PageId(3)]);
/// assert_eq!(tree.ancestors(PageId(3)), vec![PageId(2), PageId(1)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PageTree {
    pages: BTreeMap<PageId, Page>,
    placeholders: BTreeMap<PlaceholderId, Placeholder>,
}

impl PageTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a page.
    pub fn insert_page(&mut self, page: Page) {
        self.pages.insert(page.id, page);
    }

    /// Insert or replace a placeholder.
    pub fn insert_placeholder(&mut self, placeholder: Placeholder) {
        self.placeholders.insert(placeholder.id, placeholder);
    }

    /// Get a page by id.
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    /// Direct children of `id`, in id order.
    pub fn children(&self, id: PageId) -> Vec<PageId> {
        self.pages
            .values()
            .filter(|page| page.parent == Some(id))
            .map(|page| page.id)
            .collect()
    }

    /// All descendants of `id`, breadth first.
    pub fn descendants(&self, id: PageId) -> Vec<PageId> {
        let mut seen = HashSet::from([id]);
        let mut queue = VecDeque::from([id]);
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            for child in self.children(current) {
                if seen.insert(child) {
                    found.push(child);
                    queue.push_back(child);
                }
            }
        }
        found
    }

    /// Ancestors of `id`, nearest first.
    ///
    /// Stops at a missing parent or when a parent chain loops back on itself.
    pub fn ancestors(&self, id: PageId) -> Vec<PageId> {
        let mut seen = HashSet::from([id]);
        let mut found = Vec::new();
        let mut current = self.pages.get(&id).and_then(|page| page.parent);

        while let Some(parent) = current {
            if !seen.insert(parent) {
                break;
            }
            found.push(parent);
            current = self.pages.get(&parent).and_then(|page| page.parent);
        }
        found
    }

    /// Placeholders owned by the page with id `page`.
    pub fn placeholders_of(&self, page: PageId) -> Vec<&Placeholder> {
        self.placeholders
            .values()
            .filter(|placeholder| placeholder.page == page)
            .collect()
    }
}
