//! # External lookup cache
//!
//! The registry can consult a process-wide key/value cache before it probes the filesystem.
//! This crate defines that boundary ([`ExternalCache`]) and ships a bounded in-memory
//! implementation on top of `moka` ([`MokaCache`]).
//!
//! Both hits and confirmed misses are cached: a [`CachedLookup::Missing`] entry answers
//! "not found" just as authoritatively as a [`CachedLookup::Found`] entry answers with a path.
//!
//! ## Example
//!
//! ```rust
//! use symloc_cache::{CachedLookup, ExternalCache, MokaCache};
//!
//! let cache = MokaCache::builder().max_capacity(1_000).build();
//! cache.put("app:Vendor\\Foo", CachedLookup::found("/srv/vendor/Foo.php"));
//!
//! assert_eq!(cache.get("app:Vendor\\Foo"), Some(CachedLookup::found("/srv/vendor/Foo.php")));
//! assert_eq!(cache.get("app:Vendor\\Bar"), None);
//! ```

mod moka_cache;

pub use moka_cache::{MokaCache, MokaCacheBuilder};

use std::fmt::Debug;
use std::path::{Path, PathBuf};

/// A cached resolution outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CachedLookup {
    /// The symbol resolved to this file.
    Found(PathBuf),
    /// The symbol was looked up and confirmed unresolvable.
    Missing,
}

impl CachedLookup {
    pub fn found(path: impl Into<PathBuf>) -> Self {
        Self::Found(path.into())
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Found(path) => Some(path),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Self::Found(path) => Some(path),
            Self::Missing => None,
        }
    }
}

impl From<Option<PathBuf>> for CachedLookup {
    fn from(value: Option<PathBuf>) -> Self {
        value.map_or(Self::Missing, Self::Found)
    }
}

/// Boundary to a cache shared by every worker of the process.
///
/// Implementations must be cheap to call concurrently; the registry never holds its own lock
/// while talking to the cache.
pub trait ExternalCache: Debug + Send + Sync {
    /// Returns the cached outcome for `key`, or `None` on a cache miss.
    fn get(&self, key: &str) -> Option<CachedLookup>;

    /// Stores the outcome for `key`.
    fn put(&self, key: &str, value: CachedLookup);

    /// Drops whatever is stored for `key`.
    fn remove(&self, key: &str);
}
