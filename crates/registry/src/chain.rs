//! The host's ordered list of symbol loaders.

use crate::error::RegistryError;
use parking_lot::RwLock;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_LOADER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an installed loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoaderId(u64);

impl LoaderId {
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_LOADER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Anything the host can ask to load a symbol on a failed lookup.
pub trait SymbolLoader: Debug + Send + Sync {
    fn loader_id(&self) -> LoaderId;

    /// Returns `Ok(true)` when the symbol was found and materialized.
    fn load_symbol(&self, symbol: &str) -> Result<bool, RegistryError>;
}

/// Host-owned, shareable chain of loaders consulted in order.
#[derive(Debug, Clone, Default)]
pub struct ResolverChain {
    loaders: Arc<RwLock<Vec<Arc<dyn SymbolLoader>>>>,
}

impl ResolverChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `loader` at the front or back. Returns `false` if it was already installed.
    pub fn install(&self, loader: Arc<dyn SymbolLoader>, prepend: bool) -> bool {
        let id = loader.loader_id();
        let mut loaders = self.loaders.write();
        if loaders.iter().any(|l| l.loader_id() == id) {
            debug!(loader = ?id, "Loader already installed");
            return false;
        }
        if prepend {
            loaders.insert(0, loader);
        } else {
            loaders.push(loader);
        }
        true
    }

    /// Removes the loader with `id`. Returns `false` if it was not installed.
    pub fn remove(&self, id: LoaderId) -> bool {
        let mut loaders = self.loaders.write();
        let before = loaders.len();
        loaders.retain(|l| l.loader_id() != id);
        loaders.len() != before
    }

    #[must_use]
    pub fn contains(&self, id: LoaderId) -> bool {
        self.loaders.read().iter().any(|l| l.loader_id() == id)
    }

    /// Installed loader ids, in consultation order.
    #[must_use]
    pub fn ids(&self) -> Vec<LoaderId> {
        self.loaders.read().iter().map(|l| l.loader_id()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.read().is_empty()
    }

    /// Asks every installed loader in order until one loads `symbol`.
    ///
    /// The chain lock is released before any loader runs, so loaders may install or remove
    /// entries themselves.
    pub fn load(&self, symbol: &str) -> Result<bool, RegistryError> {
        let loaders = self.loaders.read().clone();
        for loader in loaders {
            if loader.load_symbol(symbol)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
