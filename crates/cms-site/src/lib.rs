//! # CMS Site
//!
//! This crate provides the site-side data page permissions are resolved
//! from.
//!
//! ## Overview
//!
//! The cms-site crate handles:
//! - **Settings**: Whether page permissions are enabled, who sees unrestricted pages
//! - **Page Tree**: Pages and placeholders with parent/child structure
//! - **Grants**: Per-page permission records that inherit down the tree, and
//!   site-wide global permission records
//!
//! ## Architecture
//!
//! ```text
//! Site
//!   ├─ CmsSettings (permission, public_for, site_id)
//!   ├─ PageTree
//!   │     └─ Page ── Placeholder
//!   ├─ PagePermission ─→ anchor Page + GrantOn (page, children, descendants, ...)
//!   └─ GlobalPagePermission ─→ sites
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cms_rbac::{Page, PageAction, PageId, SiteId};
//! use cms_site::{GrantOn, PagePermission, PageTree};
//! use uuid::Uuid;
//!
//! let mut tree = PageTree::new();
//! tree.insert_page(Page::draft(PageId(1), SiteId(1)));
//! tree.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1)));
//!
//! let editor = Uuid::now_v7();
//! let grant = PagePermission::new(editor, PageId(1), GrantOn::Descendants)
//!     .allow(PageAction::ChangePage);
//! assert_eq!(grant.grant_on.covers(&tree, grant.page), vec![PageId(2)]);
//! ```

pub mod grants;
pub mod settings;
pub mod tree;

// Re-export main types for convenience
pub use grants::{GlobalPagePermission, GrantOn, PagePermission};
pub use settings::{CmsSettings, PublicFor};
pub use tree::PageTree;
