//! Building a [`Registry`] from a [`LoaderConfig`].

use crate::config::{ConfigError, ConfigErrorExt};
use std::sync::Arc;
use std::time::Duration;
use symloc_cache::MokaCache;
use symloc_domain::config::{CacheConfig, LoaderConfig};
use symloc_registry::Registry;
use tracing::info;

/// Builds a registry with the configured resolver settings and applies the autoload section.
///
/// A bounded in-memory cache is attached when `autoload.cache_key_prefix` is set. Configured
/// files are registered without being included; they are materialized when the registry is
/// first registered in a resolver chain.
///
/// # Errors
/// Returns [`ConfigError::Registry`] when a hierarchical prefix is invalid. No registry is
/// returned in that case.
pub fn registry_from_config(cfg: &LoaderConfig) -> Result<Registry, ConfigError> {
    let resolver = &cfg.resolver;

    let mut builder = Registry::builder()
        .extension(resolver.extension.as_str())
        .include_path(resolver.include_path.iter().cloned());
    if let Some(alternate) = &resolver.alternate_extension {
        builder = builder.alternate_extension(alternate.as_str());
    }
    if cfg.autoload.cache_key_prefix.is_some() {
        builder = builder.external_cache(Arc::new(build_cache(&resolver.cache)));
    }

    let registry = builder.build();
    registry.merge_snapshot(&cfg.autoload, true).context("Applying autoload section")?;

    info!(
        hierarchical = cfg.autoload.hierarchical.len(),
        legacy = cfg.autoload.legacy.len(),
        classes = cfg.autoload.class_map.len(),
        files = cfg.autoload.files.len(),
        "Registry bootstrapped from config"
    );
    Ok(registry)
}

fn build_cache(cfg: &CacheConfig) -> MokaCache {
    let builder = MokaCache::builder().max_capacity(cfg.capacity);
    match cfg.ttl_seconds {
        Some(ttl) => builder.time_to_live(Duration::from_secs(ttl)).build(),
        None => builder.build(),
    }
}
