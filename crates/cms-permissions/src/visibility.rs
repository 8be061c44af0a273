//! View-visibility rule
//!
//! Viewing has no coarse pre-checks of its own. It merges page view
//! restrictions, the site-wide `public_for` policy and view grants.

use cms_rbac::{Page, PageAction, PermissionCode, SiteId};
use tracing::debug;

use crate::error::PermissionResult;
use crate::gates::RequestScope;
use crate::memo::{Gate, MemoKey};

impl RequestScope<'_> {
    /// View `page`.
    ///
    /// The first matching rule wins:
    ///
    /// 1. superusers may view;
    /// 2. an unrestricted page is visible when `public_for` admits the
    ///    principal;
    /// 3. anonymous visitors may not view;
    /// 4. principals that may view every page on the page's site may view;
    /// 5. an unrestricted page is otherwise hidden;
    /// 6. a restricted page is visible through a page-level view grant only.
    pub fn can_view_page(&self, page: &Page) -> PermissionResult<bool> {
        self.memoized(MemoKey::page(Gate::ViewPage, page.site, page.id), || {
            self.view_page(page)
        })
    }

    /// View every page on `site` (defaults to the current site).
    pub fn can_view_all_pages(&self, site: Option<SiteId>) -> PermissionResult<bool> {
        self.memoized(MemoKey::site(Gate::ViewAllPages, site), || {
            let principal = self.principal();
            let settings = self.engine().settings();

            if principal.is_superuser() {
                return Ok(true);
            }
            if !settings.permission {
                return Ok(settings.public_for.allows(principal.is_staff()));
            }
            if !principal.is_authenticated() {
                return Ok(false);
            }
            if principal.has_perm(PermissionCode::ViewPage) {
                return Ok(true);
            }

            let site = self.engine().resolve_site(site)?;
            self.engine()
                .roles()
                .has_global_permission(principal, site, PageAction::ViewPage)
        })
    }

    fn view_page(&self, page: &Page) -> PermissionResult<bool> {
        let principal = self.principal();
        let engine = self.engine();

        if principal.is_superuser() {
            return Ok(true);
        }

        // View records only restrict while page permissions are enabled.
        let restricted = engine.settings().permission
            && engine.content().has_view_restrictions(page.permission_id())?;

        if !restricted && engine.settings().public_for.allows(principal.is_staff()) {
            return Ok(true);
        }
        if !principal.is_authenticated() {
            debug!(page = %page.id, restricted, "denied view: not authenticated");
            return Ok(false);
        }

        if self.can_view_all_pages(Some(page.site))? {
            return Ok(true);
        }
        if !restricted {
            debug!(page = %page.id, "denied view: public_for excludes principal");
            return Ok(false);
        }

        engine.has_generic_permission(principal, page, PageAction::ViewPage, None, false)
    }
}
