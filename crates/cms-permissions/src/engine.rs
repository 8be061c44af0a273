//! Permission engine
//!
//! [`PagePermissions`] wires the action registry, settings, cache and stores
//! together. It is built once and shared; each request opens a
//! [`RequestScope`] on it.

use cms_rbac::{ActionRegistry, SiteId};
use cms_site::CmsSettings;
use std::fmt;
use std::sync::Arc;

use crate::cache::{MemoryPermissionCache, PermissionCache};
use crate::error::{PermissionError, PermissionResult};
use crate::gates::RequestScope;
use crate::memory::MemoryStore;
use crate::principal::Principal;
use crate::store::{ContentStore, RoleStore};

/// Shared page permission engine.
///
/// # Example
///
/// ```
/// use cms_permissions::{MemoryStore, PagePermissions, User};
/// use cms_rbac::{Page, PageId, PermissionCode, SiteId};
/// use cms_site::CmsSettings;
/// use std::sync::Arc;
/// use uuid::Uuid;
///
/// let store = Arc::new(MemoryStore::new());
/// store.insert_page(Page::draft(PageId(1), SiteId(1))).unwrap();
///
/// // Page-level permissions disabled: coarse codes are enough.
/// let engine = PagePermissions::in_memory(CmsSettings::default(), store);
/// let editor = User::new(Uuid::now_v7()).with_codes([PermissionCode::ChangePage]);
///
/// let page = Page::draft(PageId(1), SiteId(1));
/// let scope = engine.scope(&editor);
/// assert!(scope.can_change_page(&page).unwrap());
/// assert!(!scope.can_publish_page(&page).unwrap());
/// ```
pub struct PagePermissions {
    registry: Arc<ActionRegistry>,
    settings: CmsSettings,
    cache: Arc<dyn PermissionCache>,
    content: Arc<dyn ContentStore>,
    roles: Arc<dyn RoleStore>,
}

impl fmt::Debug for PagePermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagePermissions")
            .field("settings", &self.settings)
            .finish()
    }
}

impl PagePermissions {
    /// Create an engine with the standard action registry.
    pub fn new(
        settings: CmsSettings,
        content: Arc<dyn ContentStore>,
        roles: Arc<dyn RoleStore>,
        cache: Arc<dyn PermissionCache>,
    ) -> Self {
        Self {
            registry: Arc::new(ActionRegistry::standard()),
            settings,
            cache,
            content,
            roles,
        }
    }

    /// Create an engine over a [`MemoryStore`] with an in-process cache.
    pub fn in_memory(settings: CmsSettings, store: Arc<MemoryStore>) -> Self {
        Self::new(
            settings,
            store.clone(),
            store,
            Arc::new(MemoryPermissionCache::new()),
        )
    }

    /// Share an existing registry instead of the standard one.
    pub fn with_registry(mut self, registry: Arc<ActionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Open a request scope for `principal`.
    ///
    /// Results memoized in the scope are dropped with it.
    pub fn scope<'a>(&'a self, principal: &'a dyn Principal) -> RequestScope<'a> {
        RequestScope::new(self, principal)
    }

    /// The settings the engine was built with.
    pub fn settings(&self) -> &CmsSettings {
        &self.settings
    }

    /// The action registry.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub(crate) fn cache(&self) -> &dyn PermissionCache {
        self.cache.as_ref()
    }

    pub(crate) fn content(&self) -> &dyn ContentStore {
        self.content.as_ref()
    }

    pub(crate) fn roles(&self) -> &dyn RoleStore {
        self.roles.as_ref()
    }

    /// `site`, or the configured current site.
    pub(crate) fn resolve_site(&self, site: Option<SiteId>) -> PermissionResult<SiteId> {
        site.or(self.settings.site_id)
            .ok_or(PermissionError::MissingSite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(settings: CmsSettings) -> PagePermissions {
        PagePermissions::in_memory(settings, Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_resolve_site_prefers_argument() {
        let engine = engine(CmsSettings::default().site(SiteId(1)));
        assert_eq!(engine.resolve_site(Some(SiteId(2))).unwrap(), SiteId(2));
        assert_eq!(engine.resolve_site(None).unwrap(), SiteId(1));
    }

    #[test]
    fn test_resolve_site_without_current_site() {
        let engine = engine(CmsSettings::default());
        let err = engine.resolve_site(None).unwrap_err();
        assert!(matches!(err, PermissionError::MissingSite));
    }

    #[test]
    fn test_shared_registry() {
        let registry = Arc::new(ActionRegistry::standard());
        let engine = engine(CmsSettings::default()).with_registry(registry.clone());
        assert!(std::ptr::eq(engine.registry(), registry.as_ref()));
    }
}
