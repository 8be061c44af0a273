//! Principals
//!
//! The engine never authenticates anyone. It reads a handful of flags and a
//! coarse permission check from whatever the caller's session layer
//! produced, through the [`Principal`] trait.

use cms_rbac::{CodeSet, PermissionCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity a permission check is made for.
pub trait Principal {
    /// Stable identifier, used as the cache key.
    fn id(&self) -> Uuid;

    /// Superusers bypass every check.
    fn is_superuser(&self) -> bool;

    /// Staff flag, consulted by the `staff` visibility policy.
    fn is_staff(&self) -> bool;

    /// Whether the session is authenticated.
    fn is_authenticated(&self) -> bool;

    /// Check that the principal holds every one of `codes`.
    fn has_perms(&self, codes: &[PermissionCode]) -> bool;

    /// Check a single coarse code.
    fn has_perm(&self, code: PermissionCode) -> bool {
        self.has_perms(&[code])
    }
}

/// A concrete principal carrying its flags and coarse codes.
///
/// # Example
///
/// ```
/// use cms_permissions::{Principal, User};
/// use cms_rbac::PermissionCode;
/// use uuid::Uuid;
///
/// let editor = User::new(Uuid::now_v7())
///     .staff()
///     .with_codes([PermissionCode::ChangePage]);
/// assert!(editor.is_authenticated());
/// assert!(editor.has_perm(PermissionCode::ChangePage));
/// assert!(!editor.has_perm(PermissionCode::DeletePage));
///
/// let visitor = User::anonymous();
/// assert!(!visitor.is_authenticated());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID (nil for anonymous visitors)
    pub id: Uuid,

    /// Superuser flag
    #[serde(default)]
    pub is_superuser: bool,

    /// Staff flag
    #[serde(default)]
    pub is_staff: bool,

    /// Inactive users hold no coarse codes
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Authenticated session flag
    #[serde(default = "default_true")]
    pub authenticated: bool,

    /// Coarse codes held directly or through groups
    #[serde(default)]
    pub codes: CodeSet,
}

fn default_true() -> bool {
    true
}

impl User {
    /// An authenticated, active user with no codes.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            is_superuser: false,
            is_staff: false,
            is_active: true,
            authenticated: true,
            codes: CodeSet::new(),
        }
    }

    /// An anonymous visitor.
    pub fn anonymous() -> Self {
        Self {
            id: Uuid::nil(),
            is_superuser: false,
            is_staff: false,
            is_active: false,
            authenticated: false,
            codes: CodeSet::new(),
        }
    }

    /// An authenticated superuser.
    pub fn superuser(id: Uuid) -> Self {
        Self {
            is_superuser: true,
            is_staff: true,
            ..Self::new(id)
        }
    }

    /// Set the staff flag.
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Mark the user inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Add coarse codes.
    pub fn with_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = PermissionCode>,
    {
        for code in codes {
            self.codes.add(code);
        }
        self
    }
}

impl Principal for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    fn is_staff(&self) -> bool {
        self.is_staff
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn has_perms(&self, codes: &[PermissionCode]) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_superuser {
            return true;
        }
        self.codes.has_all(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_user() {
        let user = User::anonymous();
        assert_eq!(user.id(), Uuid::nil());
        assert!(!user.is_authenticated());
        assert!(!user.is_superuser());
        assert!(!user.has_perms(&[]));
    }

    #[test]
    fn test_superuser_has_every_code() {
        let user = User::superuser(Uuid::now_v7());
        assert!(user.is_staff());
        assert!(user.has_perms(&[PermissionCode::ChangePage, PermissionCode::DeletePlugin]));
    }

    #[test]
    fn test_inactive_user_has_no_codes() {
        let user = User::new(Uuid::now_v7())
            .with_codes([PermissionCode::ChangePage])
            .inactive();
        assert!(!user.has_perm(PermissionCode::ChangePage));
    }

    #[test]
    fn test_has_perms_requires_all_codes() {
        let user = User::new(Uuid::now_v7())
            .with_codes([PermissionCode::ChangePage, PermissionCode::DeletePage]);
        assert!(user.has_perms(&[PermissionCode::ChangePage, PermissionCode::DeletePage]));
        assert!(!user.has_perms(&[PermissionCode::ChangePage, PermissionCode::PublishPage]));
    }

    #[test]
    fn test_user_deserializes_with_defaults() {
        let user: User = serde_json::from_value(serde_json::json!({ "id": Uuid::nil() })).unwrap();
        assert!(user.is_authenticated());
        assert!(user.is_active);
        assert!(!user.is_staff());
        assert!(user.codes.is_empty());
    }
}
