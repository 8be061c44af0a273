//! Per-request memoization
//!
//! Gate results are remembered for the lifetime of one [`MemoScope`], so a
//! request that asks the same question twice only evaluates it once. A
//! scope belongs to exactly one request and is dropped with it.

use cms_rbac::{PageId, SiteId};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::PermissionResult;

/// The decision functions whose results are memoized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Add a page anywhere on a site
    AddPage,
    /// Add a page below a target
    AddSubpage,
    /// Change a page
    ChangePage,
    /// Change advanced settings of a page
    ChangePageAdvancedSettings,
    /// Change permissions of a page
    ChangePagePermissions,
    /// Delete a page
    DeletePage,
    /// Delete one translation of a page
    DeletePageTranslation,
    /// Move a page
    MovePage,
    /// Publish a page
    PublishPage,
    /// View a page
    ViewPage,
    /// View every page on a site
    ViewAllPages,
    /// Change every page on a site
    ChangeAllPages,
    /// Recover any page on a site
    RecoverAnyPage,
}

/// The arguments a gate result depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    gate: Gate,
    page: Option<PageId>,
    site: Option<SiteId>,
    language: Option<String>,
}

impl MemoKey {
    /// Key for a page-level gate.
    ///
    /// Page ids are only unique within a site, so the site is part of the key.
    pub fn page(gate: Gate, site: SiteId, page: PageId) -> Self {
        Self {
            gate,
            page: Some(page),
            site: Some(site),
            language: None,
        }
    }

    /// Key for a site-level gate.
    pub fn site(gate: Gate, site: Option<SiteId>) -> Self {
        Self {
            gate,
            page: None,
            site,
            language: None,
        }
    }

    /// Add the language argument.
    pub fn in_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }
}

/// Results remembered for one request.
///
/// Not `Sync`: a scope is used from the request's own thread only.
#[derive(Debug, Default)]
pub struct MemoScope {
    results: RefCell<HashMap<MemoKey, bool>>,
}

impl MemoScope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the remembered result for `key`, or evaluate `body` and remember it.
    ///
    /// Errors are returned without being remembered. `body` may itself use
    /// the scope.
    pub fn get_or_try_insert<F>(&self, key: MemoKey, body: F) -> PermissionResult<bool>
    where
        F: FnOnce() -> PermissionResult<bool>,
    {
        if let Some(result) = self.get(&key) {
            return Ok(result);
        }
        let result = body()?;
        self.results.borrow_mut().insert(key, result);
        Ok(result)
    }

    /// The remembered result for `key`.
    pub fn get(&self, key: &MemoKey) -> Option<bool> {
        self.results.borrow().get(key).copied()
    }

    /// Number of remembered results.
    pub fn len(&self) -> usize {
        self.results.borrow().len()
    }

    /// Check if nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PermissionError;
    use std::cell::Cell;

    #[test]
    fn test_body_runs_once_per_key() {
        let scope = MemoScope::new();
        let calls = Cell::new(0);
        let key = MemoKey::page(Gate::ChangePage, SiteId(1), PageId(1));

        for _ in 0..3 {
            let result = scope
                .get_or_try_insert(key.clone(), || {
                    calls.set(calls.get() + 1);
                    Ok(true)
                })
                .unwrap();
            assert!(result);
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(scope.len(), 1);
    }

    fn change(page: u64) -> MemoKey {
        MemoKey::page(Gate::ChangePage, SiteId(1), PageId(page))
    }

    #[test]
    fn test_keys_differ_by_argument() {
        let scope = MemoScope::new();
        let translation = MemoKey::page(Gate::DeletePageTranslation, SiteId(1), PageId(1));
        scope.get_or_try_insert(change(1), || Ok(true)).unwrap();
        scope.get_or_try_insert(change(2), || Ok(false)).unwrap();
        scope
            .get_or_try_insert(MemoKey::page(Gate::MovePage, SiteId(1), PageId(1)), || Ok(false))
            .unwrap();
        scope
            .get_or_try_insert(translation.clone().in_language("en"), || Ok(true))
            .unwrap();

        assert_eq!(scope.len(), 4);
        assert_eq!(scope.get(&change(2)), Some(false));
        assert_eq!(scope.get(&translation.in_language("de")), None);
    }

    #[test]
    fn test_same_page_id_on_two_sites() {
        let scope = MemoScope::new();
        let site_one = MemoKey::page(Gate::ChangePage, SiteId(1), PageId(5));
        scope.get_or_try_insert(site_one, || Ok(true)).unwrap();

        let other_site = MemoKey::page(Gate::ChangePage, SiteId(2), PageId(5));
        assert_eq!(scope.get(&other_site), None);
        assert!(!scope.get_or_try_insert(other_site, || Ok(false)).unwrap());
        assert_eq!(scope.len(), 2);
    }

    #[test]
    fn test_errors_are_not_remembered() {
        let scope = MemoScope::new();
        let key = MemoKey::site(Gate::AddPage, None);

        let err = scope
            .get_or_try_insert(key.clone(), || Err(PermissionError::MissingSite))
            .unwrap_err();
        assert!(matches!(err, PermissionError::MissingSite));
        assert!(scope.is_empty());

        assert!(scope.get_or_try_insert(key, || Ok(true)).unwrap());
    }

    #[test]
    fn test_nested_use_of_scope() {
        let scope = MemoScope::new();
        let outer = MemoKey::page(Gate::ViewPage, SiteId(1), PageId(1));
        let inner = MemoKey::site(Gate::ViewAllPages, Some(SiteId(1)));

        let result = scope
            .get_or_try_insert(outer, || scope.get_or_try_insert(inner.clone(), || Ok(true)))
            .unwrap();
        assert!(result);
        assert_eq!(scope.get(&inner), Some(true));
        assert_eq!(scope.len(), 2);
    }
}
