//! Permission gates
//!
//! One decision function per page action. Every gate runs the same
//! pipeline: the coarse pre-checks, then the memoized action body.

use cms_rbac::{Page, PageAction, SiteId};
use std::fmt;
use tracing::debug;

use crate::engine::PagePermissions;
use crate::error::PermissionResult;
use crate::memo::{Gate, MemoKey, MemoScope};
use crate::principal::Principal;

/// Permission checks for one principal during one request.
///
/// Created with [`PagePermissions::scope`]. Gate results are remembered
/// until the scope is dropped, so the scope must not outlive the request
/// it was opened for.
pub struct RequestScope<'a> {
    engine: &'a PagePermissions,
    principal: &'a dyn Principal,
    memo: MemoScope,
}

impl fmt::Debug for RequestScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestScope")
            .field("principal", &self.principal.id())
            .field("memo", &self.memo)
            .finish()
    }
}

impl<'a> RequestScope<'a> {
    pub(crate) fn new(engine: &'a PagePermissions, principal: &'a dyn Principal) -> Self {
        Self {
            engine,
            principal,
            memo: MemoScope::new(),
        }
    }

    /// The engine this scope checks against.
    pub fn engine(&self) -> &'a PagePermissions {
        self.engine
    }

    /// The principal being checked.
    pub fn principal(&self) -> &'a dyn Principal {
        self.principal
    }

    /// Results remembered so far.
    pub fn memo(&self) -> &MemoScope {
        &self.memo
    }

    /// Add a page anywhere on `site` (defaults to the current site).
    pub fn can_add_page(&self, site: Option<SiteId>) -> PermissionResult<bool> {
        self.pre_checks(PageAction::AddPage, || {
            self.memoized(MemoKey::site(Gate::AddPage, site), || {
                let site = self.engine.resolve_site(site)?;
                self.engine
                    .roles()
                    .has_global_permission(self.principal, site, PageAction::AddPage)
            })
        })
    }

    /// Add a page below `target`.
    pub fn can_add_subpage(&self, target: &Page, site: Option<SiteId>) -> PermissionResult<bool> {
        self.pre_checks(PageAction::AddPage, || {
            let key = MemoKey::page(Gate::AddSubpage, site.unwrap_or(target.site), target.id);
            self.memoized(key, || self.generic(target, PageAction::AddPage, site))
        })
    }

    /// Change `page`.
    pub fn can_change_page(&self, page: &Page) -> PermissionResult<bool> {
        self.page_gate(Gate::ChangePage, PageAction::ChangePage, page)
    }

    /// Change the advanced settings of `page`.
    pub fn can_change_page_advanced_settings(&self, page: &Page) -> PermissionResult<bool> {
        self.page_gate(
            Gate::ChangePageAdvancedSettings,
            PageAction::ChangePageAdvancedSettings,
            page,
        )
    }

    /// Change the permissions of `page`.
    pub fn can_change_page_permissions(&self, page: &Page) -> PermissionResult<bool> {
        self.page_gate(
            Gate::ChangePagePermissions,
            PageAction::ChangePagePermissions,
            page,
        )
    }

    /// Move `page`.
    pub fn can_move_page(&self, page: &Page) -> PermissionResult<bool> {
        self.page_gate(Gate::MovePage, PageAction::MovePage, page)
    }

    /// Publish `page`.
    pub fn can_publish_page(&self, page: &Page) -> PermissionResult<bool> {
        self.page_gate(Gate::PublishPage, PageAction::PublishPage, page)
    }

    /// Delete `page`.
    ///
    /// Besides the delete grant, the principal must be allowed to delete the
    /// plugins of every draft placeholder holding content in one of the
    /// page's languages.
    pub fn can_delete_page(&self, page: &Page) -> PermissionResult<bool> {
        self.pre_checks(PageAction::DeletePage, || {
            self.memoized(MemoKey::page(Gate::DeletePage, page.site, page.id), || {
                if !self.generic(page, PageAction::DeletePage, None)? {
                    return Ok(false);
                }
                let languages: Vec<String> = page.languages.iter().cloned().collect();
                self.placeholders_allow_delete(page, &languages)
            })
        })
    }

    /// Delete the `language` translation of `page`.
    pub fn can_delete_page_translation(
        &self,
        page: &Page,
        language: &str,
    ) -> PermissionResult<bool> {
        self.pre_checks(PageAction::DeletePageTranslation, || {
            let key = MemoKey::page(Gate::DeletePageTranslation, page.site, page.id)
                .in_language(language);
            self.memoized(key, || {
                if !self.generic(page, PageAction::DeletePageTranslation, None)? {
                    return Ok(false);
                }
                self.placeholders_allow_delete(page, &[language.to_string()])
            })
        })
    }

    /// Change every page on `site` through a global grant.
    pub fn can_change_all_pages(&self, site: Option<SiteId>) -> PermissionResult<bool> {
        self.global_gate(Gate::ChangeAllPages, PageAction::ChangePage, site)
    }

    /// Recover any deleted page on `site` through a global grant.
    pub fn can_recover_any_page(&self, site: Option<SiteId>) -> PermissionResult<bool> {
        self.global_gate(Gate::RecoverAnyPage, PageAction::RecoverPage, site)
    }

    /// Coarse checks shared by every gate except the view rule.
    ///
    /// The body only runs for authenticated, non-superuser principals that
    /// hold the action's coarse codes while page permissions are enabled.
    fn pre_checks<F>(&self, action: PageAction, body: F) -> PermissionResult<bool>
    where
        F: FnOnce() -> PermissionResult<bool>,
    {
        let principal = self.principal;
        if !principal.is_authenticated() {
            debug!(%action, "denied: not authenticated");
            return Ok(false);
        }
        if principal.is_superuser() {
            return Ok(true);
        }

        let codes = self.engine.registry().required_codes(action)?;
        if !principal.has_perms(codes) {
            debug!(%action, user_id = %principal.id(), "denied: missing coarse permission");
            return Ok(false);
        }

        if !self.engine.settings().permission {
            return Ok(true);
        }
        body()
    }

    pub(crate) fn memoized<F>(&self, key: MemoKey, body: F) -> PermissionResult<bool>
    where
        F: FnOnce() -> PermissionResult<bool>,
    {
        self.memo.get_or_try_insert(key, body)
    }

    fn page_gate(&self, gate: Gate, action: PageAction, page: &Page) -> PermissionResult<bool> {
        self.pre_checks(action, || {
            self.memoized(MemoKey::page(gate, page.site, page.id), || {
                self.generic(page, action, None)
            })
        })
    }

    fn global_gate(
        &self,
        gate: Gate,
        action: PageAction,
        site: Option<SiteId>,
    ) -> PermissionResult<bool> {
        self.pre_checks(action, || {
            self.memoized(MemoKey::site(gate, site), || {
                let site = self.engine.resolve_site(site)?;
                self.engine
                    .roles()
                    .has_global_permission(self.principal, site, action)
            })
        })
    }

    fn generic(
        &self,
        page: &Page,
        action: PageAction,
        site: Option<SiteId>,
    ) -> PermissionResult<bool> {
        let allowed = self
            .engine
            .has_generic_permission(self.principal, page, action, site, true)?;
        if !allowed {
            debug!(%action, page = %page.id, "denied: no page grant");
        }
        Ok(allowed)
    }

    fn placeholders_allow_delete(
        &self,
        page: &Page,
        languages: &[String],
    ) -> PermissionResult<bool> {
        let content = self.engine.content();
        let placeholders = content.draft_placeholders(page.permission_id())?;

        for placeholder in placeholders
            .iter()
            .filter(|placeholder| placeholder.has_plugins_in_any(languages))
        {
            if !content.can_delete_plugins(self.principal, placeholder, languages)? {
                debug!(
                    page = %page.id,
                    placeholder = placeholder.id.0,
                    slot = %placeholder.slot,
                    "denied: plugin deletion refused"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
