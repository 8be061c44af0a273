//! # CMS RBAC
//!
//! This crate provides the permission vocabulary for CMS page permissions.
//!
//! ## Overview
//!
//! The cms-rbac crate handles:
//! - **Actions**: The page actions permissions are resolved for
//! - **Permission Codes**: Coarse, page-independent codes held by principals
//! - **Grant Sets**: The pages a principal may act on, or the grant-all sentinel
//! - **Action Registry**: Which codes and which grant set each action needs
//! - **Resources**: Site, page and placeholder identities
//!
//! ## Architecture
//!
//! ```text
//! PageAction ──registry──→ [PermissionCode]   (coarse pre-check)
//!            └────────────→ PageAction         (grant set to test)
//!
//! GrantSet = All | Pages({PageId})
//! Page.permission_id() = draft id for both materializations
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cms_rbac::{ActionRegistry, GrantSet, Page, PageAction, PageId, SiteId};
//!
//! let registry = ActionRegistry::standard();
//! let grant_action = registry.grant_action(PageAction::DeletePageTranslation).unwrap();
//! assert_eq!(grant_action, PageAction::DeletePage);
//!
//! let draft = Page::draft(PageId(1), SiteId(1));
//! let public = draft.published_as(PageId(2));
//! let grants: GrantSet = [PageId(1)].into_iter().collect();
//! assert!(grants.contains(public.permission_id()));
//! ```

pub mod actions;
pub mod permissions;
pub mod registry;
pub mod resources;

// Re-export main types for convenience
pub use actions::{PageAction, UnknownAction};
pub use permissions::{CodeSet, GrantSet, PermissionCode};
pub use registry::{ActionEntry, ActionRegistry};
pub use resources::{Page, PageId, Placeholder, PlaceholderId, PublisherState, SiteId};
