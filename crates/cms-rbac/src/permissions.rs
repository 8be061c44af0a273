//! # Permissions
//!
//! Coarse permission codes held by principals, and the grant sets the
//! resolver produces for a fine-grained page action.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::resources::PageId;

/// Coarse, model-level permission codes.
///
/// These are independent of any page. A principal must hold the codes an
/// action requires before its page-level grants are even consulted.
///
/// # Example
///
/// ```
/// use cms_rbac::permissions::PermissionCode;
///
/// assert_eq!(PermissionCode::ChangePage.as_str(), "cms.change_page");
/// assert_eq!(PermissionCode::parse("cms.publish_page"), Some(PermissionCode::PublishPage));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PermissionCode {
    /// `cms.add_page`
    AddPage,
    /// `cms.change_page`
    ChangePage,
    /// `cms.delete_page`
    DeletePage,
    /// `cms.publish_page`
    PublishPage,
    /// `cms.view_page`
    ViewPage,
    /// `cms.delete_cmsplugin`
    DeletePlugin,
}

impl PermissionCode {
    /// Get the dotted codename (`app_label.codename`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionCode::AddPage => "cms.add_page",
            PermissionCode::ChangePage => "cms.change_page",
            PermissionCode::DeletePage => "cms.delete_page",
            PermissionCode::PublishPage => "cms.publish_page",
            PermissionCode::ViewPage => "cms.view_page",
            PermissionCode::DeletePlugin => "cms.delete_cmsplugin",
        }
    }

    /// Parse a codename. The `cms.` app label is optional.
    pub fn parse(s: &str) -> Option<Self> {
        let codename = s.strip_prefix("cms.").unwrap_or(s);
        match codename {
            "add_page" => Some(PermissionCode::AddPage),
            "change_page" => Some(PermissionCode::ChangePage),
            "delete_page" => Some(PermissionCode::DeletePage),
            "publish_page" => Some(PermissionCode::PublishPage),
            "view_page" => Some(PermissionCode::ViewPage),
            "delete_cmsplugin" => Some(PermissionCode::DeletePlugin),
            _ => None,
        }
    }
}

impl fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of coarse permission codes held by a principal.
///
/// # Example
///
/// ```
/// use cms_rbac::permissions::{CodeSet, PermissionCode};
///
/// let mut set = CodeSet::new();
/// set.add(PermissionCode::ChangePage);
/// set.add(PermissionCode::DeletePage);
///
/// assert!(set.has_all(&[PermissionCode::ChangePage, PermissionCode::DeletePage]));
/// assert!(!set.has_all(&[PermissionCode::ChangePage, PermissionCode::PublishPage]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSet {
    codes: HashSet<PermissionCode>,
}

impl CodeSet {
    /// Create a new empty code set.
    pub fn new() -> Self {
        Self {
            codes: HashSet::new(),
        }
    }

    /// Add a code to the set.
    pub fn add(&mut self, code: PermissionCode) {
        self.codes.insert(code);
    }

    /// Check if the set contains a code.
    pub fn has(&self, code: PermissionCode) -> bool {
        self.codes.contains(&code)
    }

    /// Check if the set contains every one of `codes`.
    ///
    /// An empty slice is always satisfied.
    pub fn has_all(&self, codes: &[PermissionCode]) -> bool {
        codes.iter().all(|code| self.codes.contains(code))
    }

    /// Get the count of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<PermissionCode> for CodeSet {
    fn from_iter<T: IntoIterator<Item = PermissionCode>>(iter: T) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}

/// The pages a principal may act on for one action.
///
/// Either every page in the site (`All`) or an explicit set of page ids.
/// The two are never mixed: an explicit set never stands in for "all", and
/// an empty set means "no pages".
///
/// # Example
///
/// ```
/// use cms_rbac::permissions::GrantSet;
/// use cms_rbac::resources::PageId;
///
/// let all = GrantSet::All;
/// assert!(all.contains(PageId(7)));
///
/// let none = GrantSet::empty();
/// assert!(!none.contains(PageId(7)));
///
/// let some: GrantSet = [PageId(1), PageId(2)].into_iter().collect();
/// assert!(some.contains(PageId(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "grant", content = "pages", rename_all = "snake_case")]
pub enum GrantSet {
    /// Every page in the site.
    All,
    /// Exactly these pages.
    Pages(HashSet<PageId>),
}

impl GrantSet {
    /// An explicit set with no pages.
    pub fn empty() -> Self {
        GrantSet::Pages(HashSet::new())
    }

    /// Check if the set grants `page`.
    pub fn contains(&self, page: PageId) -> bool {
        match self {
            GrantSet::All => true,
            GrantSet::Pages(pages) => pages.contains(&page),
        }
    }

    /// Check if this is the grant-all sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, GrantSet::All)
    }

    /// The explicit page ids, or `None` for the sentinel.
    pub fn page_ids(&self) -> Option<&HashSet<PageId>> {
        match self {
            GrantSet::All => None,
            GrantSet::Pages(pages) => Some(pages),
        }
    }

    /// Number of explicit pages, or `None` for the sentinel.
    pub fn len(&self) -> Option<usize> {
        self.page_ids().map(HashSet::len)
    }

    /// Check if this is an explicit set with no pages.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }
}

impl FromIterator<PageId> for GrantSet {
    fn from_iter<T: IntoIterator<Item = PageId>>(iter: T) -> Self {
        GrantSet::Pages(iter.into_iter().collect())
    }
}
