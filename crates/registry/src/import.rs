//! One-shot import of a foreign loader's configuration into a shared registry.

use crate::builder::RegistryBuilder;
use crate::chain::{LoaderId, ResolverChain};
use crate::error::Result;
use crate::prefix::Scheme;
use crate::registry::Registry;
use symloc_domain::snapshot::LoaderSnapshot;
use tracing::{debug, info, warn};

/// A loader whose configuration can be copied into a [`Registry`].
pub trait ForeignLoader {
    fn snapshot(&self) -> LoaderSnapshot;

    /// Identity of the loader inside a [`ResolverChain`], if it is installed in one.
    fn chain_id(&self) -> Option<LoaderId> {
        None
    }
}

impl ForeignLoader for LoaderSnapshot {
    fn snapshot(&self) -> LoaderSnapshot {
        self.clone()
    }
}

impl ForeignLoader for Registry {
    fn snapshot(&self) -> LoaderSnapshot {
        Self::snapshot(self)
    }

    fn chain_id(&self) -> Option<LoaderId> {
        Some(self.id())
    }
}

/// Controls how [`import_from`] hands over from the foreign loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Copy the foreign loader's auxiliary files. Pending ones are materialized on register.
    pub include_files: bool,
    /// Install the new registry into the chain.
    pub register: bool,
    /// Install it in front of the existing loaders.
    pub prepend: bool,
    /// Remove the foreign loader from the chain once the new registry is installed.
    pub unregister_foreign: bool,
    /// Let the foreign flags win even when the target already changed them.
    pub overwrite: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            include_files: true,
            register: true,
            prepend: false,
            unregister_foreign: true,
            overwrite: false,
        }
    }
}

impl Registry {
    /// Merges `snapshot` into this registry under one write lock.
    ///
    /// Directory lists are appended, the class map is union-merged and missing symbols and
    /// files are added. Scalar flags are copied when `overwrite` is set or the target still
    /// holds the default value. Files the foreign loader already included are not
    /// materialized again.
    ///
    /// # Errors
    /// Returns [`crate::RegistryError::InvalidPrefix`] if any hierarchical prefix is invalid.
    /// All prefixes are checked before anything is changed.
    pub fn merge_snapshot(&self, snapshot: &LoaderSnapshot, overwrite: bool) -> Result<()> {
        for entry in &snapshot.hierarchical {
            Scheme::Hierarchical.validate(&entry.prefix)?;
        }

        let cache_key_prefix = match &snapshot.cache_key_prefix {
            Some(prefix) if self.inner.cache.is_none() => {
                warn!(prefix = %prefix, "No external cache attached, imported key prefix ignored");
                None
            },
            other => other.clone(),
        };

        self.mutate(|state| -> Result<()> {
            for entry in &snapshot.hierarchical {
                state.hierarchical.register_or_append(&entry.prefix, entry.paths.clone(), false)?;
            }
            for entry in &snapshot.legacy {
                state.legacy.register_or_append(&entry.prefix, entry.paths.clone(), false)?;
            }
            let fallback = snapshot.fallback_hierarchical.clone();
            state.hierarchical.register_or_append("", fallback, false)?;
            state.legacy.register_or_append("", snapshot.fallback_legacy.clone(), false)?;

            state.class_map.merge(snapshot.class_map.iter().map(|(s, p)| (s.clone(), p.clone())));
            for symbol in &snapshot.missing {
                state.class_map.mark_missing(symbol);
            }
            for file in &snapshot.files {
                state.files.insert(&file.id, file.path.clone(), file.included);
            }

            if overwrite || !state.use_include_path {
                state.use_include_path = snapshot.use_include_path;
            }
            if overwrite || !state.class_map.is_authoritative() {
                state.class_map.set_authoritative(snapshot.authoritative);
            }
            if cache_key_prefix.is_some() && (overwrite || state.cache_key_prefix.is_none()) {
                state.cache_key_prefix = cache_key_prefix;
            }
            Ok(())
        })?;

        debug!(
            hierarchical = snapshot.hierarchical.len(),
            legacy = snapshot.legacy.len(),
            classes = snapshot.class_map.len(),
            files = snapshot.files.len(),
            overwrite,
            "Merged loader snapshot"
        );
        Ok(())
    }
}

/// Builds a fresh registry from `builder`, seeds it with `foreign`'s configuration and hands
/// the chain over to it.
///
/// The new registry is installed before the foreign loader is removed, so a lookup through
/// `chain` always finds one of the two.
///
/// # Errors
/// Fails on an invalid imported prefix or when materializing a pending file fails during
/// registration.
pub fn import_from<F>(
    foreign: &F,
    builder: RegistryBuilder,
    chain: &ResolverChain,
    options: ImportOptions,
) -> Result<Registry>
where
    F: ForeignLoader + ?Sized,
{
    let mut snapshot = foreign.snapshot();
    if !options.include_files {
        debug!(skipped = snapshot.files.len(), "Foreign files left behind");
        snapshot.files.clear();
    }

    let registry = builder.build();
    registry.merge_snapshot(&snapshot, options.overwrite)?;

    if options.register {
        registry.register(chain, options.prepend)?;
    }
    if options.unregister_foreign
        && let Some(id) = foreign.chain_id()
    {
        chain.remove(id);
    }

    info!(loader = ?registry.id(), "Imported foreign loader configuration");
    Ok(registry)
}
