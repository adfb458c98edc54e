use crate::{CachedLookup, ExternalCache};
use moka::sync::Cache;
use std::time::Duration;
use tracing::trace;

/// Default upper bound on cached lookups.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Bounded, thread-safe [`ExternalCache`] backed by `moka::sync::Cache`.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone)]
pub struct MokaCache {
    inner: Cache<String, CachedLookup>,
}

impl MokaCache {
    #[must_use = "builders do nothing unless you call .build()"]
    pub fn builder() -> MokaCacheBuilder {
        MokaCacheBuilder::default()
    }

    /// Approximate number of entries; pending maintenance is run first.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    /// Drops every cached outcome.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExternalCache for MokaCache {
    fn get(&self, key: &str) -> Option<CachedLookup> {
        let hit = self.inner.get(key);
        trace!(key, hit = hit.is_some(), "External cache lookup");
        hit
    }

    fn put(&self, key: &str, value: CachedLookup) {
        trace!(key, found = value.path().is_some(), "External cache store");
        self.inner.insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) {
        trace!(key, "External cache remove");
        self.inner.invalidate(key);
    }
}

/// Fluent configuration for [`MokaCache`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug)]
pub struct MokaCacheBuilder {
    max_capacity: u64,
    time_to_live: Option<Duration>,
}

impl Default for MokaCacheBuilder {
    fn default() -> Self {
        Self { max_capacity: DEFAULT_MAX_CAPACITY, time_to_live: None }
    }
}

impl MokaCacheBuilder {
    pub const fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Expires entries after `ttl`; entries never expire by default.
    pub const fn time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = Some(ttl);
        self
    }

    #[must_use]
    pub fn build(self) -> MokaCache {
        let mut builder = Cache::builder().max_capacity(self.max_capacity);
        if let Some(ttl) = self.time_to_live {
            builder = builder.time_to_live(ttl);
        }
        MokaCache { inner: builder.build() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_outcome_is_a_hit() {
        let cache = MokaCache::default();
        cache.put("p:Gone", CachedLookup::Missing);

        assert_eq!(cache.get("p:Gone"), Some(CachedLookup::Missing));
        assert_eq!(cache.get("p:Other"), None);
    }

    #[test]
    fn test_put_overwrites_previous_outcome() {
        let cache = MokaCache::default();
        cache.put("p:Foo", CachedLookup::Missing);
        cache.put("p:Foo", CachedLookup::found("/src/Foo.php"));

        assert_eq!(
            cache.get("p:Foo").and_then(CachedLookup::into_path),
            Some(PathBuf::from("/src/Foo.php"))
        );
    }

    #[test]
    fn test_remove_drops_single_entry() {
        let cache = MokaCache::default();
        cache.put("p:Foo", CachedLookup::Missing);
        cache.put("p:Bar", CachedLookup::found("/src/Bar.php"));

        cache.remove("p:Foo");
        cache.remove("p:Absent");

        assert_eq!(cache.get("p:Foo"), None);
        assert!(cache.get("p:Bar").is_some());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = MokaCache::builder().max_capacity(16).build();
        let other = cache.clone();
        other.put("p:Foo", CachedLookup::found("/src/Foo.php"));

        assert!(cache.get("p:Foo").is_some());
        assert_eq!(cache.entry_count(), 1);

        cache.clear();
        assert_eq!(other.get("p:Foo"), None);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CachedLookup::from(None), CachedLookup::Missing);
        assert_eq!(
            CachedLookup::from(Some(PathBuf::from("/a.php"))).path(),
            Some(std::path::Path::new("/a.php"))
        );
    }
}
