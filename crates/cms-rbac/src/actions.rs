//! # Actions
//!
//! Defines the page actions that permissions are resolved for.
//! Each action names one column of the page permission table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions that can be performed on pages.
///
/// Actions map onto the fine-grained page permission records:
/// - **AddPage**: Create pages below a page
/// - **ChangePage**: Edit page content and basic settings
/// - **ChangePageAdvancedSettings**: Edit template, reverse id and other advanced fields
/// - **ChangePagePermissions**: Edit the permission records attached to a page
/// - **DeletePage**: Remove a page with all its translations
/// - **DeletePageTranslation**: Remove a single translation of a page
/// - **MovePage**: Move a page within the tree
/// - **PublishPage**: Publish the draft of a page
/// - **RecoverPage**: Restore a deleted page
/// - **ViewPage**: See a page that has view restrictions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PageAction {
    /// Add pages below a page.
    AddPage,

    /// Change page content.
    ChangePage,

    /// Change advanced page settings.
    ChangePageAdvancedSettings,

    /// Change the permission records of a page.
    ChangePagePermissions,

    /// Delete a page.
    DeletePage,

    /// Delete one translation of a page.
    ///
    /// Resolved against the `DeletePage` grant set.
    DeletePageTranslation,

    /// Move a page within the tree.
    MovePage,

    /// Publish a page.
    PublishPage,

    /// Recover a deleted page.
    ///
    /// Only ever granted globally; there is no per-page grant set for it.
    RecoverPage,

    /// View a restricted page.
    ViewPage,
}

impl PageAction {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// The snake_case name used in settings, cache keys and permission records.
    pub fn as_str(&self) -> &'static str {
        match self {
            PageAction::AddPage => "add_page",
            PageAction::ChangePage => "change_page",
            PageAction::ChangePageAdvancedSettings => "change_page_advanced_settings",
            PageAction::ChangePagePermissions => "change_page_permissions",
            PageAction::DeletePage => "delete_page",
            PageAction::DeletePageTranslation => "delete_page_translation",
            PageAction::MovePage => "move_page",
            PageAction::PublishPage => "publish_page",
            PageAction::RecoverPage => "recover_page",
            PageAction::ViewPage => "view_page",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, `-` and `_` are interchangeable)
    ///
    /// # Returns
    ///
    /// `Some(PageAction)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use cms_rbac::actions::PageAction;
    ///
    /// assert_eq!(PageAction::parse("change_page"), Some(PageAction::ChangePage));
    /// assert_eq!(PageAction::parse("delete-page-translation"), Some(PageAction::DeletePageTranslation));
    /// assert_eq!(PageAction::parse("archive_page"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "add_page" => Some(PageAction::AddPage),
            "change_page" => Some(PageAction::ChangePage),
            "change_page_advanced_settings" => Some(PageAction::ChangePageAdvancedSettings),
            "change_page_permissions" => Some(PageAction::ChangePagePermissions),
            "delete_page" => Some(PageAction::DeletePage),
            "delete_page_translation" => Some(PageAction::DeletePageTranslation),
            "move_page" => Some(PageAction::MovePage),
            "publish_page" => Some(PageAction::PublishPage),
            "recover_page" => Some(PageAction::RecoverPage),
            "view_page" => Some(PageAction::ViewPage),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            PageAction::AddPage,
            PageAction::ChangePage,
            PageAction::ChangePageAdvancedSettings,
            PageAction::ChangePagePermissions,
            PageAction::DeletePage,
            PageAction::DeletePageTranslation,
            PageAction::MovePage,
            PageAction::PublishPage,
            PageAction::RecoverPage,
            PageAction::ViewPage,
        ]
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an action name is not part of the action vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown page action: {}", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for PageAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageAction::parse(s).ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(PageAction::parse("add_page"), Some(PageAction::AddPage));
        assert_eq!(PageAction::parse("ADD_PAGE"), Some(PageAction::AddPage));
        assert_eq!(PageAction::parse("view-page"), Some(PageAction::ViewPage));
        assert_eq!(
            PageAction::parse("change_page_advanced_settings"),
            Some(PageAction::ChangePageAdvancedSettings)
        );
        assert_eq!(PageAction::parse("invalid"), None);
        assert_eq!(PageAction::parse(""), None);
    }

    #[test]
    fn test_as_str_parses_back() {
        for action in PageAction::all() {
            assert_eq!(PageAction::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_from_str_reports_unknown_name() {
        let err = "publish_everything".parse::<PageAction>().unwrap_err();
        assert_eq!(err, UnknownAction("publish_everything".to_string()));
        assert_eq!(err.to_string(), "unknown page action: publish_everything");
    }

    #[test]
    fn test_display() {
        assert_eq!(PageAction::MovePage.to_string(), "move_page");
        assert_eq!(PageAction::DeletePageTranslation.to_string(), "delete_page_translation");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PageAction::ChangePagePermissions).unwrap();
        assert_eq!(json, "\"change_page_permissions\"");
        let action: PageAction = serde_json::from_str("\"recover_page\"").unwrap();
        assert_eq!(action, PageAction::RecoverPage);
    }

    #[test]
    fn test_all_actions_count() {
        assert_eq!(PageAction::all().len(), 10);
    }
}
