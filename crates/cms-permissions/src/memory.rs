//! In-memory content and role store
//!
//! Backs both store traits with a [`PageTree`] and plain permission records.
//! Suitable for embedding and testing.

use cms_rbac::{Page, PageAction, PageId, PermissionCode, Placeholder, SiteId};
use cms_site::{GlobalPagePermission, PagePermission, PageTree};
use std::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use crate::error::{PermissionError, PermissionResult};
use crate::principal::Principal;
use crate::store::{ContentStore, PageActions, RoleStore};

/// Pages, placeholders and permission records held in process memory.
///
/// Adding or removing records does not touch any permission cache; callers
/// invalidate cached grant sets themselves.
///
/// # Example
///
/// ```
/// use cms_permissions::{MemoryStore, RoleStore, User};
/// use cms_rbac::{Page, PageAction, PageId, SiteId};
/// use cms_site::{GrantOn, PagePermission};
/// use uuid::Uuid;
///
/// let store = MemoryStore::new();
/// store.insert_page(Page::draft(PageId(1), SiteId(1))).unwrap();
/// store.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1))).unwrap();
///
/// let editor = User::new(Uuid::now_v7());
/// store
///     .add_page_permission(
///         PagePermission::new(editor.id, PageId(1), GrantOn::Children)
///             .allow(PageAction::ChangePage),
///     )
///     .unwrap();
///
/// let actions = store.page_actions_for_principal(&editor, SiteId(1)).unwrap();
/// assert!(actions[&PageAction::ChangePage].contains(&PageId(2)));
/// assert!(!actions[&PageAction::ChangePage].contains(&PageId(1)));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: RwLock<PageTree>,
    page_permissions: RwLock<Vec<PagePermission>>,
    global_permissions: RwLock<Vec<GlobalPagePermission>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a page.
    pub fn insert_page(&self, page: Page) -> PermissionResult<()> {
        self.tree.write().map_err(store_poisoned)?.insert_page(page);
        Ok(())
    }

    /// Insert or replace a placeholder.
    pub fn insert_placeholder(&self, placeholder: Placeholder) -> PermissionResult<()> {
        self.tree
            .write()
            .map_err(store_poisoned)?
            .insert_placeholder(placeholder);
        Ok(())
    }

    /// Get a copy of a page.
    pub fn page(&self, id: PageId) -> PermissionResult<Option<Page>> {
        let tree = self.tree.read().map_err(store_poisoned)?;
        Ok(tree.page(id).cloned())
    }

    /// Record a page-level grant.
    pub fn add_page_permission(&self, permission: PagePermission) -> PermissionResult<()> {
        self.page_permissions
            .write()
            .map_err(roles_poisoned)?
            .push(permission);
        Ok(())
    }

    /// Record a global grant.
    pub fn add_global_permission(&self, permission: GlobalPagePermission) -> PermissionResult<()> {
        self.global_permissions
            .write()
            .map_err(roles_poisoned)?
            .push(permission);
        Ok(())
    }

    /// Remove every page-level and global grant held by `user_id`.
    ///
    /// Returns the number of records removed.
    pub fn revoke_user(&self, user_id: Uuid) -> PermissionResult<usize> {
        let mut pages = self.page_permissions.write().map_err(roles_poisoned)?;
        let mut globals = self.global_permissions.write().map_err(roles_poisoned)?;
        let before = pages.len() + globals.len();

        pages.retain(|record| record.user_id != user_id);
        globals.retain(|record| record.user_id != user_id);
        Ok(before - pages.len() - globals.len())
    }
}

impl ContentStore for MemoryStore {
    fn draft_placeholders(&self, draft_id: PageId) -> PermissionResult<Vec<Placeholder>> {
        let tree = self.tree.read().map_err(store_poisoned)?;
        Ok(tree.placeholders_of(draft_id).into_iter().cloned().collect())
    }

    fn can_delete_plugins(
        &self,
        principal: &dyn Principal,
        placeholder: &Placeholder,
        _languages: &[String],
    ) -> PermissionResult<bool> {
        Ok(!placeholder.locked && principal.has_perm(PermissionCode::DeletePlugin))
    }

    fn has_view_restrictions(&self, draft_id: PageId) -> PermissionResult<bool> {
        let tree = self.tree.read().map_err(store_poisoned)?;
        let records = self.page_permissions.read().map_err(roles_poisoned)?;

        Ok(records.iter().any(|record| {
            record.grants(PageAction::ViewPage)
                && record.grant_on.applies_to(&tree, record.page, draft_id)
        }))
    }
}

impl RoleStore for MemoryStore {
    fn has_global_permission(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        action: PageAction,
    ) -> PermissionResult<bool> {
        let user_id = principal.id();
        let records = self.global_permissions.read().map_err(roles_poisoned)?;

        Ok(records.iter().any(|record| {
            record.user_id == user_id && record.applies_to_site(site) && record.grants(action)
        }))
    }

    fn page_actions_for_principal(
        &self,
        principal: &dyn Principal,
        site: SiteId,
    ) -> PermissionResult<PageActions> {
        let user_id = principal.id();
        let tree = self.tree.read().map_err(store_poisoned)?;
        let records = self.page_permissions.read().map_err(roles_poisoned)?;

        let mut actions = PageActions::new();
        for record in records.iter().filter(|record| record.user_id == user_id) {
            let on_site = tree
                .page(record.page)
                .map(|anchor| anchor.site == site)
                .unwrap_or(false);
            if !on_site {
                continue;
            }

            let pages = record.grant_on.covers(&tree, record.page);
            for action in &record.actions {
                actions.entry(*action).or_default().extend(pages.iter().copied());
            }
        }

        trace!(%user_id, %site, actions = actions.len(), "collected page actions");
        Ok(actions)
    }
}

fn store_poisoned<T>(_: T) -> PermissionError {
    PermissionError::Store("page tree lock poisoned".to_string())
}

fn roles_poisoned<T>(_: T) -> PermissionError {
    PermissionError::Roles("permission records lock poisoned".to_string())
}
