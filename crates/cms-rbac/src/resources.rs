//! # Resources
//!
//! Identity types for the resources permissions are resolved against:
//! sites, pages (with their draft/published duality) and placeholders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a site. Page ids are unique within a site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SiteId(pub u64);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site:{}", self.0)
    }
}

/// Identifier of a page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page:{}", self.0)
    }
}

/// Identifier of a placeholder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PlaceholderId(pub u64);

/// Which materialization of a logical page a [`Page`] is.
///
/// A published page always points back at the draft it was published from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublisherState {
    /// The editable draft.
    Draft,
    /// The published copy of a draft.
    Public {
        /// The draft this page was published from.
        draft_id: PageId,
    },
}

/// A page in a site's page tree.
///
/// # Example
///
/// ```
/// use cms_rbac::resources::{Page, PageId, SiteId};
///
/// let draft = Page::draft(PageId(1), SiteId(1)).with_languages(["en", "de"]);
/// let public = draft.published_as(PageId(2));
///
/// assert_eq!(draft.permission_id(), PageId(1));
/// assert_eq!(public.permission_id(), PageId(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page ID
    pub id: PageId,

    /// Site the page belongs to
    pub site: SiteId,

    /// Parent page (same materialization), `None` for root pages
    pub parent: Option<PageId>,

    /// Draft or published materialization
    pub publisher: PublisherState,

    /// Languages the page has content in
    #[serde(default)]
    pub languages: BTreeSet<String>,
}

impl Page {
    /// Create a root draft page with no languages.
    pub fn draft(id: PageId, site: SiteId) -> Self {
        Self {
            id,
            site,
            parent: None,
            publisher: PublisherState::Draft,
            languages: BTreeSet::new(),
        }
    }

    /// Set the parent page.
    pub fn with_parent(mut self, parent: PageId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the page languages.
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Build the published counterpart of this draft under `public_id`.
    ///
    /// The published page's parent is left as the draft's parent; callers
    /// that keep separate public trees should overwrite it.
    pub fn published_as(&self, public_id: PageId) -> Page {
        Page {
            id: public_id,
            site: self.site,
            parent: self.parent,
            publisher: PublisherState::Public {
                draft_id: self.permission_id(),
            },
            languages: self.languages.clone(),
        }
    }

    /// Check if this is the draft materialization.
    pub fn is_draft(&self) -> bool {
        matches!(self.publisher, PublisherState::Draft)
    }

    /// The identifier grants are tested against.
    ///
    /// A draft answers with its own id; a published page answers with the id
    /// of the draft it was published from.
    pub fn permission_id(&self) -> PageId {
        match self.publisher {
            PublisherState::Draft => self.id,
            PublisherState::Public { draft_id } => draft_id,
        }
    }

    /// Check if the page has content in `language`.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains(language)
    }
}

/// A content placeholder on a draft page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    /// Placeholder ID
    pub id: PlaceholderId,

    /// Draft page owning the placeholder
    pub page: PageId,

    /// Template slot name
    pub slot: String,

    /// Languages this placeholder has plugins in
    #[serde(default)]
    pub plugin_languages: BTreeSet<String>,

    /// Locked placeholders refuse plugin deletion
    #[serde(default)]
    pub locked: bool,
}

impl Placeholder {
    /// Create an empty, unlocked placeholder.
    pub fn new(id: PlaceholderId, page: PageId, slot: impl Into<String>) -> Self {
        Self {
            id,
            page,
            slot: slot.into(),
            plugin_languages: BTreeSet::new(),
            locked: false,
        }
    }

    /// Set the languages this placeholder has plugins in.
    pub fn with_plugins_in<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugin_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the placeholder as locked.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    /// Check if the placeholder has plugins in any of `languages`.
    pub fn has_plugins_in_any<'a, I>(&self, languages: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        languages
            .into_iter()
            .any(|language| self.plugin_languages.contains(language))
    }
}
