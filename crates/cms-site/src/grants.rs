//! Page permission records
//!
//! This module provides the role-assignment records permissions are resolved
//! from: per-page grants that inherit down the page tree, and site-wide
//! global grants.

use chrono::{DateTime, Utc};
use cms_rbac::{PageAction, PageId, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::tree::PageTree;

/// Which pages, relative to its anchor page, a page permission applies to.
///
/// # Examples
///
/// ```
/// use cms_rbac::{Page, PageId, SiteId};
/// use cms_site::{GrantOn, PageTree};
///
/// let mut tree = PageTree::new();
/// tree.insert_page(Page::draft(PageId(1), SiteId(1)));
/// tree.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1)));
///
/// assert_eq!(GrantOn::Page.covers(&tree, PageId(1)), vec![PageId(1)]);
/// assert_eq!(GrantOn::Children.covers(&tree, PageId(1)), vec![PageId(2)]);
/// assert_eq!(GrantOn::PageAndChildren.covers(&tree, PageId(1)), vec![PageId(1), PageId(2)]);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrantOn {
    /// The anchor page only
    Page,

    /// Direct children of the anchor
    Children,

    /// Every descendant of the anchor
    Descendants,

    /// The anchor and its direct children
    PageAndChildren,

    /// The anchor and every descendant
    #[default]
    PageAndDescendants,
}

impl GrantOn {
    /// Check if the grant applies to the anchor page itself.
    pub fn includes_page(&self) -> bool {
        matches!(
            self,
            GrantOn::Page | GrantOn::PageAndChildren | GrantOn::PageAndDescendants
        )
    }

    /// Pages this grant applies to when anchored at `anchor`.
    pub fn covers(&self, tree: &PageTree, anchor: PageId) -> Vec<PageId> {
        let mut pages = Vec::new();
        if self.includes_page() {
            pages.push(anchor);
        }
        match self {
            GrantOn::Page => {}
            GrantOn::Children | GrantOn::PageAndChildren => {
                pages.extend(tree.children(anchor));
            }
            GrantOn::Descendants | GrantOn::PageAndDescendants => {
                pages.extend(tree.descendants(anchor));
            }
        }
        pages
    }

    /// Check if a grant anchored at `anchor` applies to `page`.
    ///
    /// Walks up from `page` rather than expanding the anchor's subtree.
    pub fn applies_to(&self, tree: &PageTree, anchor: PageId, page: PageId) -> bool {
        if page == anchor {
            return self.includes_page();
        }
        let ancestors = tree.ancestors(page);
        match self {
            GrantOn::Page => false,
            GrantOn::Children | GrantOn::PageAndChildren => ancestors.first() == Some(&anchor),
            GrantOn::Descendants | GrantOn::PageAndDescendants => ancestors.contains(&anchor),
        }
    }
}

/// A per-page grant for one principal.
///
/// # Examples
///
/// ```
/// use cms_rbac::{PageAction, PageId};
/// use cms_site::{GrantOn, PagePermission};
/// use uuid::Uuid;
///
/// let user_id = Uuid::now_v7();
/// let grant = PagePermission::new(user_id, PageId(4), GrantOn::PageAndDescendants)
///     .allow(PageAction::ChangePage)
///     .allow(PageAction::PublishPage);
/// assert!(grant.grants(PageAction::ChangePage));
/// assert!(!grant.grants(PageAction::DeletePage));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagePermission {
    /// Unique record ID
    pub id: Uuid,

    /// Principal the grant is for
    pub user_id: Uuid,

    /// Anchor page (draft id)
    pub page: PageId,

    /// Which pages relative to the anchor are covered
    #[serde(default)]
    pub grant_on: GrantOn,

    /// Granted actions
    #[serde(default)]
    pub actions: BTreeSet<PageAction>,

    /// When the grant was made
    pub granted_at: DateTime<Utc>,
}

impl PagePermission {
    /// Creates a grant with no actions.
    pub fn new(user_id: Uuid, page: PageId, grant_on: GrantOn) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            page,
            grant_on,
            actions: BTreeSet::new(),
            granted_at: Utc::now(),
        }
    }

    /// Add an action to the grant.
    pub fn allow(mut self, action: PageAction) -> Self {
        self.actions.insert(action);
        self
    }

    /// Check if the grant includes `action`.
    pub fn grants(&self, action: PageAction) -> bool {
        self.actions.contains(&action)
    }
}

/// A site-wide grant for one principal.
///
/// An empty `sites` set applies to every site.
///
/// # Examples
///
/// ```
/// use cms_rbac::{PageAction, SiteId};
/// use cms_site::GlobalPagePermission;
/// use uuid::Uuid;
///
/// let grant = GlobalPagePermission::new(Uuid::now_v7())
///     .on_site(SiteId(1))
///     .allow(PageAction::ViewPage);
/// assert!(grant.applies_to_site(SiteId(1)));
/// assert!(!grant.applies_to_site(SiteId(2)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalPagePermission {
    /// Unique record ID
    pub id: Uuid,

    /// Principal the grant is for
    pub user_id: Uuid,

    /// Sites the grant applies to (empty = all sites)
    #[serde(default)]
    pub sites: BTreeSet<SiteId>,

    /// Granted actions
    #[serde(default)]
    pub actions: BTreeSet<PageAction>,

    /// When the grant was made
    pub granted_at: DateTime<Utc>,
}

impl GlobalPagePermission {
    /// Creates a grant for every site with no actions.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            sites: BTreeSet::new(),
            actions: BTreeSet::new(),
            granted_at: Utc::now(),
        }
    }

    /// Restrict the grant to `site` (in addition to any sites already listed).
    pub fn on_site(mut self, site: SiteId) -> Self {
        self.sites.insert(site);
        self
    }

    /// Add an action to the grant.
    pub fn allow(mut self, action: PageAction) -> Self {
        self.actions.insert(action);
        self
    }

    /// Check if the grant covers `site`.
    pub fn applies_to_site(&self, site: SiteId) -> bool {
        self.sites.is_empty() || self.sites.contains(&site)
    }

    /// Check if the grant includes `action`.
    pub fn grants(&self, action: PageAction) -> bool {
        self.actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_rbac::Page;

    fn tree() -> PageTree {
        // 1 ── 2 ── 3
        //      └─── 4
        let mut tree = PageTree::new();
        tree.insert_page(Page::draft(PageId(1), SiteId(1)));
        tree.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1)));
        tree.insert_page(Page::draft(PageId(3), SiteId(1)).with_parent(PageId(2)));
        tree.insert_page(Page::draft(PageId(4), SiteId(1)).with_parent(PageId(2)));
        tree
    }

    #[test]
    fn test_covers() {
        let tree = tree();
        assert_eq!(GrantOn::Page.covers(&tree, PageId(2)), vec![PageId(2)]);
        assert_eq!(GrantOn::Children.covers(&tree, PageId(1)), vec![PageId(2)]);
        assert_eq!(
            GrantOn::Descendants.covers(&tree, PageId(1)),
            vec![PageId(2), PageId(3), PageId(4)]
        );
        assert_eq!(
            GrantOn::PageAndChildren.covers(&tree, PageId(2)),
            vec![PageId(2), PageId(3), PageId(4)]
        );
        assert_eq!(
            GrantOn::PageAndDescendants.covers(&tree, PageId(1)),
            vec![PageId(1), PageId(2), PageId(3), PageId(4)]
        );
    }

    #[test]
    fn test_applies_to_matches_covers() {
        let tree = tree();
        let variants = [
            GrantOn::Page,
            GrantOn::Children,
            GrantOn::Descendants,
            GrantOn::PageAndChildren,
            GrantOn::PageAndDescendants,
        ];
        for grant_on in variants {
            for anchor in 1..=4 {
                let covered = grant_on.covers(&tree, PageId(anchor));
                for page in 1..=4 {
                    assert_eq!(
                        grant_on.applies_to(&tree, PageId(anchor), PageId(page)),
                        covered.contains(&PageId(page)),
                        "{grant_on:?} anchor={anchor} page={page}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_grant_on_serde_names() {
        let json = serde_json::to_string(&GrantOn::PageAndDescendants).unwrap();
        assert_eq!(json, "\"page_and_descendants\"");
        assert_eq!(GrantOn::default(), GrantOn::PageAndDescendants);
    }

    #[test]
    fn test_page_permission_actions() {
        let grant = PagePermission::new(Uuid::now_v7(), PageId(1), GrantOn::Page)
            .allow(PageAction::ViewPage);
        assert!(grant.grants(PageAction::ViewPage));
        assert!(!grant.grants(PageAction::ChangePage));
    }

    #[test]
    fn test_global_permission_all_sites() {
        let grant = GlobalPagePermission::new(Uuid::now_v7()).allow(PageAction::ChangePage);
        assert!(grant.applies_to_site(SiteId(1)));
        assert!(grant.applies_to_site(SiteId(42)));
        assert!(grant.grants(PageAction::ChangePage));
        assert!(!grant.grants(PageAction::RecoverPage));
    }

    #[test]
    fn test_page_permission_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "user_id": Uuid::nil(),
            "page": 7,
            "granted_at": "2024-01-01T00:00:00Z"
        });
        let grant: PagePermission = serde_json::from_value(json).unwrap();
        assert_eq!(grant.page, PageId(7));
        assert_eq!(grant.grant_on, GrantOn::PageAndDescendants);
        assert!(grant.actions.is_empty());
    }
}
