//! Settings for page permission resolution
//!
//! This module provides the read-only configuration the permission engine
//! consults: whether page-level permissions are enabled, who may see
//! unrestricted pages, and which site is the current one.

use cms_rbac::SiteId;
use serde::{Deserialize, Serialize};

/// Who may see pages that carry no view restrictions.
///
/// Any configured value other than `all` or `staff` lets nobody through on
/// the strength of the policy alone.
///
/// # Examples
///
/// ```
/// use cms_site::settings::PublicFor;
///
/// assert!(PublicFor::All.allows(false));
/// assert!(PublicFor::Staff.allows(true));
/// assert!(!PublicFor::Staff.allows(false));
/// assert_eq!(PublicFor::from("members".to_string()), PublicFor::Nobody);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PublicFor {
    /// Everyone, including anonymous visitors
    #[default]
    All,

    /// Staff principals only
    Staff,

    /// Nobody; visibility always comes from grants
    Nobody,
}

impl PublicFor {
    /// Check if a principal with the given staff flag may see unrestricted pages.
    pub fn allows(&self, is_staff: bool) -> bool {
        match self {
            PublicFor::All => true,
            PublicFor::Staff => is_staff,
            PublicFor::Nobody => false,
        }
    }

    /// Get the configuration value for this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicFor::All => "all",
            PublicFor::Staff => "staff",
            PublicFor::Nobody => "nobody",
        }
    }
}

impl From<String> for PublicFor {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "all" => PublicFor::All,
            "staff" => PublicFor::Staff,
            _ => PublicFor::Nobody,
        }
    }
}

impl From<PublicFor> for String {
    fn from(value: PublicFor) -> Self {
        value.as_str().to_string()
    }
}

/// Page permission settings.
///
/// # Examples
///
/// ```
/// use cms_site::settings::{CmsSettings, PublicFor};
///
/// let settings = CmsSettings::from_json(r#"{ "permission": true, "public_for": "staff" }"#).unwrap();
/// assert!(settings.permission);
/// assert_eq!(settings.public_for, PublicFor::Staff);
/// assert!(settings.site_id.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmsSettings {
    /// Enable page-level permissions.
    ///
    /// When disabled, holding the coarse codes for an action is enough.
    #[serde(default)]
    pub permission: bool,

    /// Who may see pages without view restrictions
    #[serde(default)]
    pub public_for: PublicFor,

    /// Current site, used when a check is made without one
    #[serde(default)]
    pub site_id: Option<SiteId>,
}

impl CmsSettings {
    /// Settings with page-level permissions enabled and default visibility.
    pub fn with_permissions() -> Self {
        Self {
            permission: true,
            ..Self::default()
        }
    }

    /// Set the visibility policy for unrestricted pages.
    pub fn public_for(mut self, public_for: PublicFor) -> Self {
        self.public_for = public_for;
        self
    }

    /// Set the current site.
    pub fn site(mut self, site_id: SiteId) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Parse settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CmsSettings::default();
        assert!(!settings.permission);
        assert_eq!(settings.public_for, PublicFor::All);
        assert_eq!(settings.site_id, None);
    }

    #[test]
    fn test_from_empty_json() {
        let settings = CmsSettings::from_json("{}").unwrap();
        assert_eq!(settings, CmsSettings::default());
    }

    #[test]
    fn test_from_json_with_site() {
        let settings =
            CmsSettings::from_json(r#"{ "permission": true, "public_for": "all", "site_id": 3 }"#)
                .unwrap();
        assert!(settings.permission);
        assert_eq!(settings.site_id, Some(SiteId(3)));
    }

    #[test]
    fn test_unrecognised_public_for_means_nobody() {
        let settings = CmsSettings::from_json(r#"{ "public_for": "members" }"#).unwrap();
        assert_eq!(settings.public_for, PublicFor::Nobody);
        assert!(!settings.public_for.allows(true));
    }

    #[test]
    fn test_public_for_is_case_insensitive() {
        assert_eq!(PublicFor::from("STAFF".to_string()), PublicFor::Staff);
        assert_eq!(PublicFor::from("All".to_string()), PublicFor::All);
    }

    #[test]
    fn test_public_for_serializes_as_string() {
        let json = serde_json::to_value(CmsSettings::with_permissions().public_for(PublicFor::Staff))
            .unwrap();
        assert_eq!(json["public_for"], "staff");
        assert_eq!(json["permission"], true);
    }

    #[test]
    fn test_builder() {
        let settings = CmsSettings::with_permissions()
            .public_for(PublicFor::Nobody)
            .site(SiteId(9));
        assert!(settings.permission);
        assert_eq!(settings.public_for, PublicFor::Nobody);
        assert_eq!(settings.site_id, Some(SiteId(9)));
    }
}
