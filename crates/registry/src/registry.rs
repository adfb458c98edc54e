//! The shared registry handle and its single concurrency boundary.
//!
//! All mutable state of a [`Registry`] lives in one [`RegistryState`] behind one
//! `parking_lot::RwLock`. The lock is only held while state is read or written in memory:
//! filesystem probing, external cache calls and materialization always happen after it has
//! been released.

use crate::builder::RegistryBuilder;
use crate::chain::{LoaderId, ResolverChain, SymbolLoader};
use crate::class_map::ClassMap;
use crate::error::{RegistryError, Result};
use crate::files::FileRegistry;
use crate::host::Materializer;
use crate::prefix::{PrefixTable, Scheme};
use crate::resolver::Resolver;
use crate::symbol;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use symloc_cache::{CachedLookup, ExternalCache};
use symloc_domain::constants::NAMESPACE_SEPARATOR;
use symloc_domain::snapshot::{IncludedFile, LoaderSnapshot, PrefixDirs};
use tracing::{debug, trace, warn};

#[derive(Debug)]
pub(crate) struct RegistryState {
    pub(crate) hierarchical: PrefixTable,
    pub(crate) legacy: PrefixTable,
    pub(crate) class_map: ClassMap,
    pub(crate) files: FileRegistry,
    pub(crate) use_include_path: bool,
    pub(crate) cache_key_prefix: Option<String>,
    /// Bumped by every mutation that can change a lookup result. A miss is only recorded in
    /// the negative cache if no such mutation happened while it was being probed.
    pub(crate) generation: u64,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self {
            hierarchical: PrefixTable::new(Scheme::Hierarchical),
            legacy: PrefixTable::new(Scheme::Legacy),
            class_map: ClassMap::default(),
            files: FileRegistry::default(),
            use_include_path: false,
            cache_key_prefix: None,
            generation: 0,
        }
    }
}

impl RegistryState {
    const fn table_mut(&mut self, scheme: Scheme) -> &mut PrefixTable {
        match scheme {
            Scheme::Hierarchical => &mut self.hierarchical,
            Scheme::Legacy => &mut self.legacy,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RegistryInner {
    pub(crate) id: LoaderId,
    pub(crate) state: RwLock<RegistryState>,
    pub(crate) resolver: Resolver,
    pub(crate) materializer: Arc<dyn Materializer>,
    pub(crate) cache: Option<Arc<dyn ExternalCache>>,
}

/// A shared symbol → file registry.
///
/// `Registry` is a cheap handle around an `Arc`; every clone, on any thread, observes and
/// mutates the same state. A mutation is visible to another thread after any synchronization
/// point between the two (spawn, join, channel, barrier). A lookup racing with a mutation sees
/// either the old or the new configuration, never a mix.
///
/// # Example
///
/// ```rust
/// use symloc_registry::Registry;
///
/// # fn main() -> symloc_registry::Result<()> {
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("Foo.php"), "<?php").unwrap();
///
/// let registry = Registry::new();
/// registry.add_hierarchical("Namespaced\\", [dir.path()], false)?;
///
/// assert_eq!(registry.find_file("Namespaced\\Foo"), Some(dir.path().join("Foo.php")));
/// assert!(registry.load_class("Namespaced\\Foo")?);
/// assert!(!registry.load_class("Namespaced\\Bar")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    pub(crate) inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry probing the real filesystem with the default extension and no cache.
    #[must_use]
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        resolver: Resolver,
        materializer: Arc<dyn Materializer>,
        cache: Option<Arc<dyn ExternalCache>>,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                id: LoaderId::next(),
                state: RwLock::new(RegistryState::default()),
                resolver,
                materializer,
                cache,
            }),
        }
    }

    /// Identity of this registry inside a [`ResolverChain`].
    #[must_use]
    pub fn id(&self) -> LoaderId {
        self.inner.id
    }

    // --- Mutation ---

    /// Registers legacy directories for `prefix`, appending to (or with `prepend`, placing
    /// before) any already registered. An empty prefix targets the legacy fallback list.
    ///
    /// # Errors
    /// Legacy prefixes are always accepted; the result mirrors [`Self::add_hierarchical`].
    pub fn add<I, P>(&self, prefix: &str, paths: I, prepend: bool) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.add_to(Scheme::Legacy, prefix, collect_paths(paths), prepend)
    }

    /// Registers hierarchical directories for `prefix`. An empty prefix targets the
    /// hierarchical fallback list.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidPrefix`] when a non-empty prefix does not end with the
    /// namespace separator. Nothing is changed in that case.
    pub fn add_hierarchical<I, P>(&self, prefix: &str, paths: I, prepend: bool) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.add_to(Scheme::Hierarchical, prefix, collect_paths(paths), prepend)
    }

    /// Replaces the legacy directories of exactly `prefix` in one step.
    ///
    /// # Errors
    /// Legacy prefixes are always accepted; the result mirrors [`Self::set_hierarchical`].
    pub fn set<I, P>(&self, prefix: &str, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.replace_in(Scheme::Legacy, prefix, collect_paths(paths))
    }

    /// Replaces the hierarchical directories of exactly `prefix` in one step.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidPrefix`] for an invalid prefix, leaving state unchanged.
    pub fn set_hierarchical<I, P>(&self, prefix: &str, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.replace_in(Scheme::Hierarchical, prefix, collect_paths(paths))
    }

    fn add_to(&self, scheme: Scheme, prefix: &str, paths: Vec<PathBuf>, prepend: bool) -> Result<()> {
        scheme.validate(prefix)?;
        let count = paths.len();
        self.mutate(|state| state.table_mut(scheme).register_or_append(prefix, paths, prepend))?;
        debug!(?scheme, prefix, count, prepend, "Added directories");
        Ok(())
    }

    fn replace_in(&self, scheme: Scheme, prefix: &str, paths: Vec<PathBuf>) -> Result<()> {
        scheme.validate(prefix)?;
        let count = paths.len();
        self.mutate(|state| state.table_mut(scheme).replace(prefix, paths))?;
        debug!(?scheme, prefix, count, "Replaced directories");
        Ok(())
    }

    /// Merges exact symbol → file entries; later entries win.
    pub fn add_class_map<I, S, P>(&self, mapping: I)
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<PathBuf>,
    {
        let mapping: Vec<_> = mapping.into_iter().map(|(s, p)| (s.into(), p.into())).collect();
        let count = mapping.len();
        let added = self.mutate(|state| state.class_map.merge(mapping));
        debug!(count, added, "Merged class map");
    }

    /// Registers an auxiliary file under `id`. A new file is materialized right away when
    /// `include` is set, otherwise when the registry is next [registered](Self::register).
    /// A duplicate `id` is ignored.
    ///
    /// # Errors
    /// Propagates the host's materialization failure. The file stays pending in that case.
    pub fn add_file(&self, id: &str, path: impl Into<PathBuf>, include: bool) -> Result<()> {
        let path = path.into();
        let claimed = {
            let mut state = self.inner.state.write();
            if !state.files.insert(id, path.clone(), false) {
                debug!(id, path = %path.display(), "File already registered");
                return Ok(());
            }
            if include { state.files.claim(id) } else { None }
        };

        debug!(id, path = %path.display(), include, "Registered file");
        match claimed {
            Some(path) => self.materialize_file(id, &path),
            None => Ok(()),
        }
    }

    pub fn set_use_include_path(&self, enabled: bool) {
        self.mutate(|state| state.use_include_path = enabled);
        debug!(enabled, "Include path lookup toggled");
    }

    /// When enabled, a symbol absent from the class map is reported missing without any
    /// prefix search or filesystem probe.
    pub fn set_class_map_authoritative(&self, authoritative: bool) {
        self.mutate(|state| state.class_map.set_authoritative(authoritative));
        debug!(authoritative, "Class map authority toggled");
    }

    /// Sets the key prefix under which lookups are stored in the external cache. Ignored when
    /// the registry was built without one.
    pub fn set_external_cache_key_prefix(&self, prefix: Option<String>) {
        if self.inner.cache.is_none() && prefix.is_some() {
            warn!(prefix = ?prefix, "No external cache attached, key prefix ignored");
            return;
        }
        debug!(prefix = ?prefix, "External cache key prefix set");
        self.inner.state.write().cache_key_prefix = prefix;
    }

    /// Installs this registry into `chain` and materializes every pending file.
    ///
    /// # Errors
    /// Propagates the first materialization failure. The failing file and those after it
    /// stay pending and are retried on the next call.
    pub fn register(&self, chain: &ResolverChain, prepend: bool) -> Result<()> {
        if chain.install(Arc::new(self.clone()), prepend) {
            debug!(loader = ?self.id(), prepend, "Registered in resolver chain");
        }

        let pending = self.inner.state.write().files.claim_pending();
        for (idx, (id, path)) in pending.iter().enumerate() {
            if let Err(err) = self.inner.materializer.materialize(path) {
                let mut state = self.inner.state.write();
                for (id, _) in &pending[idx..] {
                    state.files.release(id);
                }
                return Err(err);
            }
            self.inner.state.write().files.mark_materialized(id);
            trace!(id, path = %path.display(), "Materialized file");
        }
        Ok(())
    }

    /// Removes this registry from `chain`. Returns `false` if it was not installed.
    pub fn unregister(&self, chain: &ResolverChain) -> bool {
        let removed = chain.remove(self.id());
        debug!(loader = ?self.id(), removed, "Unregistered from resolver chain");
        removed
    }

    #[must_use]
    pub fn is_registered_in(&self, chain: &ResolverChain) -> bool {
        chain.contains(self.id())
    }

    // --- Query ---

    /// Resolves `symbol` to the file that defines it.
    ///
    /// Order: class map, authority and negative cache, external cache, then the prefix tables
    /// for the primary and alternate extension. A miss is remembered in the negative cache
    /// (unless the class map is authoritative) and in the external cache when one is active.
    #[must_use]
    pub fn find_file(&self, symbol: &str) -> Option<PathBuf> {
        let symbol = symbol.strip_prefix(NAMESPACE_SEPARATOR).unwrap_or(symbol);

        let (plan, generation, cache_key) = {
            let state = self.inner.state.read();
            if let Some(path) = state.class_map.get(symbol) {
                trace!(symbol, "Class map hit");
                return Some(path.to_path_buf());
            }
            if state.class_map.is_authoritative() || state.class_map.is_missing(symbol) {
                trace!(symbol, "Known missing");
                return None;
            }
            if !symbol::is_valid(symbol) {
                debug!(symbol, "Rejected malformed symbol");
                return None;
            }

            let cache_key = self
                .inner
                .cache
                .as_ref()
                .and(state.cache_key_prefix.as_ref())
                .map(|prefix| format!("{prefix}{symbol}"));
            let plan = self.inner.resolver.plan(
                symbol,
                &state.hierarchical,
                &state.legacy,
                state.use_include_path,
            );
            (plan, state.generation, cache_key)
        };

        let cache = self.inner.cache.as_ref().zip(cache_key.as_deref());
        if let Some((cache, key)) = cache
            && let Some(hit) = cache.get(key)
        {
            trace!(symbol = plan.symbol(), key, "External cache hit");
            return hit.into_path();
        }

        let found = self.inner.resolver.probe(&plan);

        if let Some((cache, key)) = cache {
            self.write_back(&**cache, key, CachedLookup::from(found.clone()), generation);
        }
        if found.is_none() {
            self.remember_missing(plan.symbol(), generation);
        }
        found
    }

    /// Resolves `symbol` and materializes the file through the host.
    ///
    /// # Errors
    /// A miss is `Ok(false)`. Only a materialization failure is an error.
    pub fn load_class(&self, symbol: &str) -> Result<bool> {
        let Some(path) = self.find_file(symbol) else {
            return Ok(false);
        };
        self.inner.materializer.materialize(&path)?;
        trace!(symbol, path = %path.display(), "Loaded");
        Ok(true)
    }

    // --- Getters ---

    /// Legacy prefixes in registration order.
    #[must_use]
    pub fn prefixes(&self) -> Vec<PrefixDirs> {
        self.inner.state.read().legacy.snapshot()
    }

    /// Hierarchical prefixes in registration order.
    #[must_use]
    pub fn prefixes_hierarchical(&self) -> Vec<PrefixDirs> {
        self.inner.state.read().hierarchical.snapshot()
    }

    #[must_use]
    pub fn fallback_dirs(&self) -> Vec<PathBuf> {
        self.inner.state.read().legacy.fallback().to_vec()
    }

    #[must_use]
    pub fn fallback_dirs_hierarchical(&self) -> Vec<PathBuf> {
        self.inner.state.read().hierarchical.fallback().to_vec()
    }

    #[must_use]
    pub fn class_map(&self) -> BTreeMap<String, PathBuf> {
        self.inner.state.read().class_map.snapshot()
    }

    /// Symbols recorded in the negative cache, sorted.
    #[must_use]
    pub fn missing_symbols(&self) -> Vec<String> {
        self.inner.state.read().class_map.missing_snapshot()
    }

    #[must_use]
    pub fn files(&self) -> Vec<IncludedFile> {
        self.inner.state.read().files.snapshot()
    }

    #[must_use]
    pub fn use_include_path(&self) -> bool {
        self.inner.state.read().use_include_path
    }

    #[must_use]
    pub fn is_class_map_authoritative(&self) -> bool {
        self.inner.state.read().class_map.is_authoritative()
    }

    #[must_use]
    pub fn external_cache_key_prefix(&self) -> Option<String> {
        self.inner.state.read().cache_key_prefix.clone()
    }

    /// Full configuration, taken under a single read lock.
    #[must_use]
    pub fn snapshot(&self) -> LoaderSnapshot {
        let state = self.inner.state.read();
        LoaderSnapshot {
            hierarchical: state.hierarchical.snapshot(),
            legacy: state.legacy.snapshot(),
            fallback_hierarchical: state.hierarchical.fallback().to_vec(),
            fallback_legacy: state.legacy.fallback().to_vec(),
            class_map: state.class_map.snapshot(),
            missing: state.class_map.missing_snapshot(),
            files: state.files.snapshot(),
            use_include_path: state.use_include_path,
            authoritative: state.class_map.is_authoritative(),
            cache_key_prefix: state.cache_key_prefix.clone(),
        }
    }

    // --- Internals ---

    /// Runs `f` under the write lock as a lookup-affecting mutation.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut RegistryState) -> R) -> R {
        let mut state = self.inner.state.write();
        state.generation = state.generation.wrapping_add(1);
        f(&mut state)
    }

    /// Stores a lookup outcome in the external cache unless the configuration it was computed
    /// from changed meanwhile. A mutation that lands during the `put` takes the entry back out.
    fn write_back(
        &self,
        cache: &dyn ExternalCache,
        key: &str,
        outcome: CachedLookup,
        generation: u64,
    ) {
        if self.inner.state.read().generation != generation {
            trace!(key, "Configuration changed during lookup, outcome not cached");
            return;
        }
        cache.put(key, outcome);
        if self.inner.state.read().generation != generation {
            trace!(key, "Configuration changed during write-back, entry removed");
            cache.remove(key);
        }
    }

    fn remember_missing(&self, symbol: &str, generation: u64) {
        let mut state = self.inner.state.write();
        if state.generation != generation {
            trace!(symbol, "Configuration changed during lookup, miss not cached");
            return;
        }
        if !state.class_map.is_authoritative() {
            state.class_map.mark_missing(symbol);
        }
    }

    fn materialize_file(&self, id: &str, path: &Path) -> Result<()> {
        match self.inner.materializer.materialize(path) {
            Ok(()) => {
                self.inner.state.write().files.mark_materialized(id);
                trace!(id, path = %path.display(), "Materialized file");
                Ok(())
            },
            Err(err) => {
                self.inner.state.write().files.release(id);
                Err(err)
            },
        }
    }
}

impl SymbolLoader for Registry {
    fn loader_id(&self) -> LoaderId {
        self.id()
    }

    fn load_symbol(&self, symbol: &str) -> Result<bool, RegistryError> {
        self.load_class(symbol)
    }
}

fn collect_paths<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths.into_iter().map(Into::into).collect()
}
