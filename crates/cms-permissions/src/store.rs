//! Store traits
//!
//! The engine reads pages, placeholders and permission records through
//! these traits. Failures are propagated to the caller unchanged; retry
//! policy belongs to the store.

use cms_rbac::{PageAction, PageId, Placeholder, SiteId};
use std::collections::{HashMap, HashSet};

use crate::error::PermissionResult;
use crate::principal::Principal;

/// Pages a principal holds each action on, through direct or inherited grants.
pub type PageActions = HashMap<PageAction, HashSet<PageId>>;

/// Page tree and placeholder queries.
pub trait ContentStore: Send + Sync {
    /// Placeholders of the draft page `draft_id`.
    fn draft_placeholders(&self, draft_id: PageId) -> PermissionResult<Vec<Placeholder>>;

    /// Whether `principal` may delete the plugins of `placeholder` in `languages`.
    fn can_delete_plugins(
        &self,
        principal: &dyn Principal,
        placeholder: &Placeholder,
        languages: &[String],
    ) -> PermissionResult<bool>;

    /// Whether any view grant, direct or inherited, covers the draft page `draft_id`.
    fn has_view_restrictions(&self, draft_id: PageId) -> PermissionResult<bool>;
}

/// Permission record queries.
pub trait RoleStore: Send + Sync {
    /// Whether `principal` holds a site-wide grant for `action` on `site`.
    fn has_global_permission(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        action: PageAction,
    ) -> PermissionResult<bool>;

    /// Every page-level grant `principal` holds on `site`, per action.
    ///
    /// Actions with no grants may be absent from the map.
    fn page_actions_for_principal(
        &self,
        principal: &dyn Principal,
        site: SiteId,
    ) -> PermissionResult<PageActions>;
}
