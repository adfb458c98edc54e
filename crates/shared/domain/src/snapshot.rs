//! Plain-data picture of a loader's configuration.
//!
//! A [`LoaderSnapshot`] is what a foreign loader hands over when its configuration is imported
//! into a shared registry, and what a registry returns when asked to describe itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Directories registered for one prefix, in search order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixDirs {
    pub prefix: String,
    pub paths: Vec<PathBuf>,
}

impl PrefixDirs {
    pub fn new<I, P>(prefix: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { prefix: prefix.into(), paths: paths.into_iter().map(Into::into).collect() }
    }
}

/// An eagerly-loaded auxiliary file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedFile {
    pub id: String,
    pub path: PathBuf,
    /// Whether the owning loader already materialized the file.
    #[serde(default)]
    pub included: bool,
}

/// Full configuration of a loader, detached from any locking or lookup structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSnapshot {
    /// Hierarchical (namespace-separator terminated) prefixes, in registration order.
    pub hierarchical: Vec<PrefixDirs>,
    /// Legacy (underscore style) prefixes, in registration order.
    pub legacy: Vec<PrefixDirs>,
    pub fallback_hierarchical: Vec<PathBuf>,
    pub fallback_legacy: Vec<PathBuf>,
    pub class_map: BTreeMap<String, PathBuf>,
    /// Symbols confirmed unresolvable.
    pub missing: Vec<String>,
    pub files: Vec<IncludedFile>,
    pub use_include_path: bool,
    pub authoritative: bool,
    pub cache_key_prefix: Option<String>,
}

impl LoaderSnapshot {
    /// `true` when nothing at all is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hierarchical.is_empty()
            && self.legacy.is_empty()
            && self.fallback_hierarchical.is_empty()
            && self.fallback_legacy.is_empty()
            && self.class_map.is_empty()
            && self.missing.is_empty()
            && self.files.is_empty()
    }
}
