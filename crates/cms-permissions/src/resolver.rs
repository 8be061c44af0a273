//! Grant-set resolver
//!
//! Answers "which pages may this principal act on" for one action and site,
//! consulting the cache, global grants and page-level grants in turn.

use cms_rbac::{GrantSet, Page, PageAction, SiteId};
use tracing::{debug, instrument, trace, warn};

use crate::cache::CacheKey;
use crate::engine::PagePermissions;
use crate::error::PermissionResult;
use crate::principal::Principal;

impl PagePermissions {
    /// Resolve the grant set for `action` on `site`.
    ///
    /// 1. Superusers, and every principal while page permissions are
    ///    disabled, get [`GrantSet::All`] without touching the cache.
    /// 2. A cached grant set is returned as is.
    /// 3. With `check_global`, a global grant yields [`GrantSet::All`].
    ///    This result is not cached.
    /// 4. Otherwise the page-level grants are computed, cached and returned.
    #[instrument(skip(self, principal), fields(user_id = %principal.id()))]
    pub fn page_ids_for_action(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        action: PageAction,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        if principal.is_superuser() || !self.settings().permission {
            return Ok(GrantSet::All);
        }

        let key = CacheKey::new(principal.id(), site, action);
        if let Some(cached) = self.cache().get(&key)? {
            trace!("grant set cache hit");
            return Ok(cached);
        }

        if check_global && self.roles().has_global_permission(principal, site, action)? {
            debug!("global grant");
            return Ok(GrantSet::All);
        }

        let mut page_actions = self.roles().page_actions_for_principal(principal, site)?;
        let grants = GrantSet::Pages(page_actions.remove(&action).unwrap_or_default());
        debug!(pages = ?grants.len(), "resolved page grants");

        if let Err(e) = self.cache().set(key, &grants) {
            warn!(error = %e, "failed to cache grant set");
        }
        Ok(grants)
    }

    /// Pages the principal may add children to.
    pub fn add_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::AddPage, check_global)
    }

    /// Pages the principal may change.
    pub fn change_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::ChangePage, check_global)
    }

    /// Pages whose advanced settings the principal may change.
    pub fn change_advanced_settings_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(
            principal,
            site,
            PageAction::ChangePageAdvancedSettings,
            check_global,
        )
    }

    /// Pages whose permissions the principal may change.
    pub fn change_permissions_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(
            principal,
            site,
            PageAction::ChangePagePermissions,
            check_global,
        )
    }

    /// Pages the principal may delete, or delete translations of.
    pub fn delete_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::DeletePage, check_global)
    }

    /// Pages the principal may move.
    pub fn move_page_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::MovePage, check_global)
    }

    /// Pages the principal may publish.
    pub fn publish_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::PublishPage, check_global)
    }

    /// Restricted pages the principal may view.
    pub fn view_id_list(
        &self,
        principal: &dyn Principal,
        site: SiteId,
        check_global: bool,
    ) -> PermissionResult<GrantSet> {
        self.page_ids_for_action(principal, site, PageAction::ViewPage, check_global)
    }

    /// Check `action` on `page` against the principal's grant set.
    ///
    /// The page is tested under its draft id, so a published page answers
    /// exactly like its draft. `site` defaults to the page's site.
    ///
    /// # Errors
    ///
    /// `UnknownAction` when `action` has no page-level grant set
    /// (`recover_page`).
    pub fn has_generic_permission(
        &self,
        principal: &dyn Principal,
        page: &Page,
        action: PageAction,
        site: Option<SiteId>,
        check_global: bool,
    ) -> PermissionResult<bool> {
        let site = site.unwrap_or(page.site);
        let page_id = page.permission_id();
        let grant_action = self.registry().grant_action(action)?;

        let grants = self.page_ids_for_action(principal, site, grant_action, check_global)?;
        Ok(grants.contains(page_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PermissionError;
    use crate::memory::MemoryStore;
    use crate::principal::User;
    use cms_rbac::{PageId, PermissionCode};
    use cms_site::{CmsSettings, GlobalPagePermission, GrantOn, PagePermission};
    use std::sync::Arc;
    use uuid::Uuid;

    struct Fixture {
        store: Arc<MemoryStore>,
        engine: PagePermissions,
        editor: User,
    }

    fn fixture() -> Fixture {
        // 1 ── 2 ── 3
        let store = Arc::new(MemoryStore::new());
        store.insert_page(Page::draft(PageId(1), SiteId(1))).unwrap();
        store
            .insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1)))
            .unwrap();
        store
            .insert_page(Page::draft(PageId(3), SiteId(1)).with_parent(PageId(2)))
            .unwrap();

        let editor = User::new(Uuid::now_v7()).with_codes([PermissionCode::ChangePage]);
        let engine = PagePermissions::in_memory(CmsSettings::with_permissions(), store.clone());
        Fixture {
            store,
            engine,
            editor,
        }
    }

    #[test]
    fn test_superuser_gets_all() {
        let f = fixture();
        let admin = User::superuser(Uuid::now_v7());
        for action in [PageAction::ChangePage, PageAction::ViewPage, PageAction::DeletePage] {
            let grants = f.engine.page_ids_for_action(&admin, SiteId(1), action, true).unwrap();
            assert!(grants.is_all());
        }
    }

    #[test]
    fn test_permissions_disabled_gets_all() {
        let store = Arc::new(MemoryStore::new());
        let engine = PagePermissions::in_memory(CmsSettings::default(), store);
        let user = User::new(Uuid::now_v7());
        let grants = engine.change_id_list(&user, SiteId(1), true).unwrap();
        assert!(grants.is_all());
    }

    #[test]
    fn test_no_grants_is_empty_set() {
        let f = fixture();
        let grants = f.engine.change_id_list(&f.editor, SiteId(1), true).unwrap();
        assert!(grants.is_empty());
        assert!(!grants.is_all());
        for id in 1..=3 {
            assert!(!grants.contains(PageId(id)));
        }
    }

    #[test]
    fn test_inherited_page_grants() {
        let f = fixture();
        f.store
            .add_page_permission(
                PagePermission::new(f.editor.id, PageId(2), GrantOn::PageAndDescendants)
                    .allow(PageAction::ChangePage),
            )
            .unwrap();

        let grants = f.engine.change_id_list(&f.editor, SiteId(1), true).unwrap();
        assert_eq!(grants, GrantSet::from_iter([PageId(2), PageId(3)]));
    }

    #[test]
    fn test_global_grant_gets_all() {
        let f = fixture();
        f.store
            .add_global_permission(
                GlobalPagePermission::new(f.editor.id).allow(PageAction::PublishPage),
            )
            .unwrap();

        let grants = f.engine.publish_id_list(&f.editor, SiteId(1), true).unwrap();
        assert!(grants.is_all());

        let grants = f.engine.publish_id_list(&f.editor, SiteId(1), false).unwrap();
        assert!(grants.is_empty());
    }

    #[test]
    fn test_named_getters_resolve_their_action() {
        let f = fixture();
        let grant = PagePermission::new(f.editor.id, PageId(1), GrantOn::Page)
            .allow(PageAction::AddPage)
            .allow(PageAction::ChangePageAdvancedSettings)
            .allow(PageAction::ChangePagePermissions)
            .allow(PageAction::DeletePage)
            .allow(PageAction::MovePage)
            .allow(PageAction::ViewPage);
        f.store.add_page_permission(grant).unwrap();

        let site = SiteId(1);
        let e = &f.engine;
        let u = &f.editor;
        assert!(e.add_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(e.change_advanced_settings_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(e.change_permissions_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(e.delete_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(e.move_page_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(e.view_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(!e.change_id_list(u, site, true).unwrap().contains(PageId(1)));
        assert!(!e.publish_id_list(u, site, true).unwrap().contains(PageId(1)));
    }

    #[test]
    fn test_has_generic_permission_uses_draft_id() {
        let f = fixture();
        f.store
            .add_page_permission(
                PagePermission::new(f.editor.id, PageId(2), GrantOn::Page)
                    .allow(PageAction::ChangePage),
            )
            .unwrap();

        let draft = f.store.page(PageId(2)).unwrap().unwrap();
        let public = draft.published_as(PageId(20));

        for page in [&draft, &public] {
            let allowed = f
                .engine
                .has_generic_permission(&f.editor, page, PageAction::ChangePage, None, true)
                .unwrap();
            assert!(allowed, "{:?}", page.publisher);
        }
    }

    #[test]
    fn test_delete_translation_uses_delete_grants() {
        let f = fixture();
        f.store
            .add_page_permission(
                PagePermission::new(f.editor.id, PageId(3), GrantOn::Page)
                    .allow(PageAction::DeletePage),
            )
            .unwrap();
        let page = f.store.page(PageId(3)).unwrap().unwrap();

        let allowed = f
            .engine
            .has_generic_permission(&f.editor, &page, PageAction::DeletePageTranslation, None, true)
            .unwrap();
        assert!(allowed);
    }

    #[test]
    fn test_recover_has_no_grant_set() {
        let f = fixture();
        let page = f.store.page(PageId(1)).unwrap().unwrap();
        let err = f
            .engine
            .has_generic_permission(&f.editor, &page, PageAction::RecoverPage, None, true)
            .unwrap_err();
        assert!(matches!(err, PermissionError::UnknownAction(ref name) if name == "recover_page"));
        assert!(err.is_programming_error());
    }
}
