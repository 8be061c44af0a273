//! # Action Registry
//!
//! The fixed table mapping each page action to the coarse permission codes
//! it requires and to the grant set it is resolved against.
//! The table is built once and only ever read afterwards.

use std::collections::HashMap;

use crate::actions::{PageAction, UnknownAction};
use crate::permissions::PermissionCode;

/// Registry entry for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    /// Coarse codes required before page grants are consulted (ordered).
    pub required_codes: Vec<PermissionCode>,

    /// Action whose grant set answers for this action, if it has one.
    pub grant_action: Option<PageAction>,
}

/// Immutable action table.
///
/// # Example
///
/// ```
/// use cms_rbac::{ActionRegistry, PageAction, PermissionCode};
///
/// let registry = ActionRegistry::standard();
/// assert_eq!(
///     registry.required_codes(PageAction::PublishPage).unwrap(),
///     &[PermissionCode::ChangePage, PermissionCode::PublishPage]
/// );
/// assert_eq!(
///     registry.grant_action(PageAction::DeletePageTranslation).unwrap(),
///     PageAction::DeletePage
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    entries: HashMap<PageAction, ActionEntry>,
}

impl ActionRegistry {
    /// Build the standard page action table.
    pub fn standard() -> Self {
        use PageAction::*;
        use crate::permissions::PermissionCode as Code;

        let table: [(PageAction, &[PermissionCode], Option<PageAction>); 10] = [
            (AddPage, &[Code::AddPage, Code::ChangePage], Some(AddPage)),
            (ChangePage, &[Code::ChangePage], Some(ChangePage)),
            (
                ChangePageAdvancedSettings,
                &[Code::ChangePage],
                Some(ChangePageAdvancedSettings),
            ),
            (
                ChangePagePermissions,
                &[Code::ChangePage],
                Some(ChangePagePermissions),
            ),
            (DeletePage, &[Code::ChangePage, Code::DeletePage], Some(DeletePage)),
            (
                DeletePageTranslation,
                &[Code::ChangePage, Code::DeletePage],
                Some(DeletePage),
            ),
            (MovePage, &[Code::ChangePage], Some(MovePage)),
            (PublishPage, &[Code::ChangePage, Code::PublishPage], Some(PublishPage)),
            (RecoverPage, &[Code::AddPage, Code::ChangePage], None),
            // View is gated by the visibility rule, not by coarse codes.
            (ViewPage, &[], Some(ViewPage)),
        ];

        let entries = table
            .into_iter()
            .map(|(action, codes, grant_action)| {
                (
                    action,
                    ActionEntry {
                        required_codes: codes.to_vec(),
                        grant_action,
                    },
                )
            })
            .collect();

        Self { entries }
    }

    /// Get the full entry for an action.
    pub fn entry(&self, action: PageAction) -> Option<&ActionEntry> {
        self.entries.get(&action)
    }

    /// Coarse codes required for `action`.
    ///
    /// # Errors
    ///
    /// `UnknownAction` when the action has no coarse requirements in the
    /// table; gating such an action is a caller defect.
    pub fn required_codes(&self, action: PageAction) -> Result<&[PermissionCode], UnknownAction> {
        match self.entries.get(&action) {
            Some(entry) if !entry.required_codes.is_empty() => Ok(&entry.required_codes),
            _ => Err(UnknownAction(action.as_str().to_string())),
        }
    }

    /// Action whose grant set answers for `action`.
    ///
    /// # Errors
    ///
    /// `UnknownAction` when the action is only ever granted globally.
    pub fn grant_action(&self, action: PageAction) -> Result<PageAction, UnknownAction> {
        self.entries
            .get(&action)
            .and_then(|entry| entry.grant_action)
            .ok_or_else(|| UnknownAction(action.as_str().to_string()))
    }

    /// Actions present in the table.
    pub fn actions(&self) -> impl Iterator<Item = PageAction> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::PermissionCode as Code;

    #[test]
    fn test_required_codes_table() {
        let registry = ActionRegistry::standard();
        let expected: [(PageAction, &[PermissionCode]); 9] = [
            (PageAction::AddPage, &[Code::AddPage, Code::ChangePage]),
            (PageAction::ChangePage, &[Code::ChangePage]),
            (PageAction::ChangePageAdvancedSettings, &[Code::ChangePage]),
            (PageAction::ChangePagePermissions, &[Code::ChangePage]),
            (PageAction::DeletePage, &[Code::ChangePage, Code::DeletePage]),
            (PageAction::DeletePageTranslation, &[Code::ChangePage, Code::DeletePage]),
            (PageAction::MovePage, &[Code::ChangePage]),
            (PageAction::PublishPage, &[Code::ChangePage, Code::PublishPage]),
            (PageAction::RecoverPage, &[Code::AddPage, Code::ChangePage]),
        ];

        for (action, codes) in expected {
            assert_eq!(registry.required_codes(action).unwrap(), codes, "{action}");
        }
    }

    #[test]
    fn test_view_has_no_coarse_codes() {
        let registry = ActionRegistry::standard();
        let err = registry.required_codes(PageAction::ViewPage).unwrap_err();
        assert_eq!(err, UnknownAction("view_page".to_string()));
    }

    #[test]
    fn test_grant_actions() {
        let registry = ActionRegistry::standard();
        for action in PageAction::all() {
            match action {
                PageAction::RecoverPage => {
                    assert!(registry.grant_action(action).is_err());
                }
                PageAction::DeletePageTranslation => {
                    assert_eq!(registry.grant_action(action).unwrap(), PageAction::DeletePage);
                }
                other => assert_eq!(registry.grant_action(other).unwrap(), other),
            }
        }
    }

    #[test]
    fn test_every_action_has_an_entry() {
        let registry = ActionRegistry::standard();
        assert_eq!(registry.actions().count(), PageAction::all().len());
        for action in PageAction::all() {
            assert!(registry.entry(action).is_some(), "{action}");
        }
    }
}
