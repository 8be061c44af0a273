//! # CMS Permissions
//!
//! This crate resolves whether a principal may act on a CMS page.
//!
//! ## Overview
//!
//! The cms-permissions crate handles:
//! - **Gates**: One decision function per page action, on a [`RequestScope`]
//! - **Grant-Set Resolver**: The pages a principal holds an action on, or all of them
//! - **View Visibility**: Page view restrictions merged with the `public_for` policy
//! - **Caching**: Grant sets cached per principal, site and action
//! - **Memoization**: Gate results remembered for one request
//! - **Stores**: Traits for the page and permission-record backends, with an
//!   in-memory implementation
//!
//! ## Architecture
//!
//! ```text
//! gate ──→ pre-checks ──→ memo ──→ has_generic_permission
//!   (authenticated,         │             │
//!    superuser,             │             └──→ page_ids_for_action
//!    coarse codes,          │                    ├── cache
//!    enabled?)              │                    ├── global grant ──→ All
//!                           │                    └── page grants ──→ Pages({..})
//!                           └──→ action body (placeholders, global checks)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cms_permissions::{MemoryStore, PagePermissions, User};
//! use cms_rbac::{Page, PageAction, PageId, PermissionCode, SiteId};
//! use cms_site::{CmsSettings, GrantOn, PagePermission};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert_page(Page::draft(PageId(1), SiteId(1))).unwrap();
//! store.insert_page(Page::draft(PageId(2), SiteId(1)).with_parent(PageId(1))).unwrap();
//!
//! let editor = User::new(Uuid::now_v7())
//!     .with_codes([PermissionCode::ChangePage, PermissionCode::PublishPage]);
//! store
//!     .add_page_permission(
//!         PagePermission::new(editor.id, PageId(1), GrantOn::Descendants)
//!             .allow(PageAction::PublishPage),
//!     )
//!     .unwrap();
//!
//! let engine = PagePermissions::in_memory(CmsSettings::with_permissions(), store.clone());
//! let scope = engine.scope(&editor);
//!
//! let parent = store.page(PageId(1)).unwrap().unwrap();
//! let child = store.page(PageId(2)).unwrap().unwrap();
//! assert!(!scope.can_publish_page(&parent).unwrap());
//! assert!(scope.can_publish_page(&child).unwrap());
//! ```

pub mod cache;
pub mod engine;
pub mod error;
pub mod gates;
pub mod memo;
pub mod memory;
pub mod principal;
pub mod resolver;
pub mod store;
pub mod visibility;

// Re-export main types for convenience
pub use cache::{CacheEntry, CacheKey, MemoryPermissionCache, PermissionCache};
pub use engine::PagePermissions;
pub use error::{PermissionError, PermissionResult};
pub use gates::RequestScope;
pub use memo::{Gate, MemoKey, MemoScope};
pub use memory::MemoryStore;
pub use principal::{Principal, User};
pub use store::{ContentStore, PageActions, RoleStore};
