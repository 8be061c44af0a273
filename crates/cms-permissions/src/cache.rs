//! Permission cache
//!
//! Resolved grant sets are stored per (principal, site, action) and read
//! back on later requests. The engine only reads and writes entries;
//! whoever changes permission records is responsible for invalidation.

use chrono::{DateTime, Utc};
use cms_rbac::{GrantSet, PageAction, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::{PermissionError, PermissionResult};

/// Key of one cached grant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Principal the grant set was resolved for
    pub user_id: Uuid,
    /// Site the grant set is scoped to
    pub site: SiteId,
    /// Action the grant set answers
    pub action: PageAction,
}

impl CacheKey {
    /// Create a key.
    pub fn new(user_id: Uuid, site: SiteId, action: PageAction) -> Self {
        Self {
            user_id,
            site,
            action,
        }
    }
}

/// Renders the key the way string-keyed backends store it:
/// `permission:{user}:{site}:{action}`.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "permission:{}:{}:{}",
            self.user_id, self.site.0, self.action
        )
    }
}

/// Key-value store for resolved grant sets.
///
/// Implementations must be safe to share between request threads. Two
/// requests racing to fill the same key may both write; either value is
/// correct.
pub trait PermissionCache: Send + Sync {
    /// Read a cached grant set.
    fn get(&self, key: &CacheKey) -> PermissionResult<Option<GrantSet>>;

    /// Store a grant set, replacing any previous value.
    fn set(&self, key: CacheKey, grants: &GrantSet) -> PermissionResult<()>;
}

/// A cached grant set with the time it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The grant set
    pub grants: GrantSet,
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
}

/// In-process permission cache.
///
/// Suitable for single-process deployments and testing. Entries never
/// expire; call [`MemoryPermissionCache::invalidate_user`] or
/// [`MemoryPermissionCache::clear`] when permission records change.
///
/// # Example
///
/// ```
/// use cms_permissions::cache::{CacheKey, MemoryPermissionCache, PermissionCache};
/// use cms_rbac::{GrantSet, PageAction, PageId, SiteId};
/// use uuid::Uuid;
///
/// let cache = MemoryPermissionCache::new();
/// let key = CacheKey::new(Uuid::now_v7(), SiteId(1), PageAction::ChangePage);
///
/// assert_eq!(cache.get(&key).unwrap(), None);
/// cache.set(key, &[PageId(3)].into_iter().collect()).unwrap();
/// assert!(cache.get(&key).unwrap().unwrap().contains(PageId(3)));
/// ```
#[derive(Debug, Default)]
pub struct MemoryPermissionCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl MemoryPermissionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an entry with its timestamp.
    pub fn entry(&self, key: &CacheKey) -> PermissionResult<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    /// Drop every entry for one principal.
    pub fn invalidate_user(&self, user_id: Uuid) -> PermissionResult<usize> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|key, _| key.user_id != user_id);
        Ok(before - entries.len())
    }

    /// Drop every entry.
    pub fn clear(&self) -> PermissionResult<()> {
        self.entries.write().map_err(poisoned)?.clear();
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> PermissionResult<usize> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> PermissionResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl PermissionCache for MemoryPermissionCache {
    fn get(&self, key: &CacheKey) -> PermissionResult<Option<GrantSet>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).map(|entry| entry.grants.clone()))
    }

    fn set(&self, key: CacheKey, grants: &GrantSet) -> PermissionResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(
            key,
            CacheEntry {
                grants: grants.clone(),
                cached_at: Utc::now(),
            },
        );
        Ok(())
    }
}

fn poisoned<T>(_: T) -> PermissionError {
    PermissionError::Cache("cache lock poisoned".to_string())
}
