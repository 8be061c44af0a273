//! Error types for permission resolution
//!
//! Denials are not errors: every gate answers `Ok(false)` when access is
//! refused. Errors are reserved for caller defects and for failures of the
//! stores the engine reads from.

use cms_rbac::UnknownAction;
use thiserror::Error;

/// Permission resolution error types.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The action has no entry for the requested lookup
    #[error("Unknown page action: {0}")]
    UnknownAction(String),

    /// No site was given and no current site is configured
    #[error("No site given and no current site configured")]
    MissingSite,

    /// The permission cache failed
    #[error("Permission cache error: {0}")]
    Cache(String),

    /// The page/placeholder store failed
    #[error("Content store error: {0}")]
    Store(String),

    /// The role/grant store failed
    #[error("Role store error: {0}")]
    Roles(String),
}

/// Result type for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

impl PermissionError {
    /// Check if this error points at a defect in the calling code.
    ///
    /// Programming errors should abort the request; collaborator errors may
    /// be retried by whoever owns the collaborator.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            PermissionError::UnknownAction(_) | PermissionError::MissingSite
        )
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PermissionError::UnknownAction(_) => "UNKNOWN_ACTION",
            PermissionError::MissingSite => "MISSING_SITE",
            PermissionError::Cache(_) => "CACHE_ERROR",
            PermissionError::Store(_) => "STORE_ERROR",
            PermissionError::Roles(_) => "ROLES_ERROR",
        }
    }
}

impl From<UnknownAction> for PermissionError {
    fn from(err: UnknownAction) -> Self {
        PermissionError::UnknownAction(err.0)
    }
}
