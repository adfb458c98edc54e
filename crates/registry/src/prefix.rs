//! Prefix → directory tables for both lookup schemes.

use crate::directory::DirectoryList;
use crate::error::RegistryError;
use fxhash::FxHashMap;
use std::path::PathBuf;
use symloc_domain::constants::NAMESPACE_SEPARATOR;
use symloc_domain::snapshot::PrefixDirs;

/// How prefixes of a table are validated and matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// Namespace prefixes ending in the separator, matched segment by segment.
    Hierarchical,
    /// Arbitrary string prefixes, matched with a plain `starts_with`.
    Legacy,
}

impl Scheme {
    /// Checks that `prefix` may be registered under this scheme. The empty prefix (fallback)
    /// is always accepted.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidPrefix`] for a non-empty hierarchical prefix that does
    /// not end with the namespace separator.
    pub fn validate(self, prefix: &str) -> Result<(), RegistryError> {
        if self == Self::Hierarchical && !prefix.is_empty() && !prefix.ends_with(NAMESPACE_SEPARATOR)
        {
            return Err(RegistryError::InvalidPrefix {
                message: prefix.to_owned().into(),
                context: Some("A non-empty hierarchical prefix must end with '\\'".into()),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PrefixEntry {
    prefix: String,
    dirs: DirectoryList,
}

/// One scheme's prefixes plus its fallback directories.
///
/// Entries are kept in registration order; `buckets` indexes them by first character so a
/// lookup only looks at prefixes that can possibly match.
#[derive(Debug, Clone)]
pub(crate) struct PrefixTable {
    scheme: Scheme,
    entries: Vec<PrefixEntry>,
    buckets: FxHashMap<char, Vec<usize>>,
    fallback: DirectoryList,
}

impl PrefixTable {
    pub(crate) fn new(scheme: Scheme) -> Self {
        Self {
            scheme,
            entries: Vec::new(),
            buckets: FxHashMap::default(),
            fallback: DirectoryList::new(),
        }
    }

    /// Creates the entry for `prefix` on first use, otherwise appends or prepends `paths`.
    /// An empty prefix targets the fallback list.
    ///
    /// # Errors
    /// Fails without touching the table when the prefix is invalid for its scheme.
    pub(crate) fn register_or_append(
        &mut self,
        prefix: &str,
        paths: Vec<PathBuf>,
        prepend: bool,
    ) -> Result<(), RegistryError> {
        self.scheme.validate(prefix)?;
        if paths.is_empty() {
            return Ok(());
        }

        let Some(dirs) = self.slot_mut(prefix) else {
            self.insert(prefix, DirectoryList::from_paths(paths));
            return Ok(());
        };

        if prepend {
            dirs.prepend_all(paths);
        } else {
            dirs.append(paths);
        }
        Ok(())
    }

    /// Replaces the directories of exactly `prefix` (or the fallback list).
    ///
    /// # Errors
    /// Fails without touching the table when the prefix is invalid for its scheme.
    pub(crate) fn replace(&mut self, prefix: &str, paths: Vec<PathBuf>) -> Result<(), RegistryError> {
        self.scheme.validate(prefix)?;

        match self.slot_mut(prefix) {
            Some(dirs) => dirs.replace_all(paths),
            None => self.insert(prefix, DirectoryList::from_paths(paths)),
        }
        Ok(())
    }

    /// Exact lookup of a registered prefix.
    pub(crate) fn get(&self, prefix: &str) -> Option<&DirectoryList> {
        let first = prefix.chars().next()?;
        self.buckets
            .get(&first)?
            .iter()
            .map(|&idx| &self.entries[idx])
            .find(|entry| entry.prefix == prefix)
            .map(|entry| &entry.dirs)
    }

    /// Registered prefixes that `symbol` starts with, in registration order.
    pub(crate) fn matching<'a>(&'a self, symbol: &'a str) -> impl Iterator<Item = &'a DirectoryList> {
        symbol
            .chars()
            .next()
            .and_then(|first| self.buckets.get(&first))
            .into_iter()
            .flatten()
            .map(|&idx| &self.entries[idx])
            .filter(move |entry| symbol.starts_with(entry.prefix.as_str()))
            .map(|entry| &entry.dirs)
    }

    pub(crate) const fn fallback(&self) -> &DirectoryList {
        &self.fallback
    }

    pub(crate) fn snapshot(&self) -> Vec<PrefixDirs> {
        self.entries
            .iter()
            .map(|entry| PrefixDirs { prefix: entry.prefix.clone(), paths: entry.dirs.to_vec() })
            .collect()
    }

    fn slot_mut(&mut self, prefix: &str) -> Option<&mut DirectoryList> {
        let Some(first) = prefix.chars().next() else {
            return Some(&mut self.fallback);
        };
        let idx = *self
            .buckets
            .get(&first)?
            .iter()
            .find(|&&idx| self.entries[idx].prefix == prefix)?;
        Some(&mut self.entries[idx].dirs)
    }

    fn insert(&mut self, prefix: &str, dirs: DirectoryList) {
        let Some(first) = prefix.chars().next() else {
            self.fallback = dirs;
            return;
        };
        self.buckets.entry(first).or_default().push(self.entries.len());
        self.entries.push(PrefixEntry { prefix: prefix.to_owned(), dirs });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_hierarchical_prefix_must_end_with_separator() {
        let mut table = PrefixTable::new(Scheme::Hierarchical);

        let err = table.register_or_append("Vendor", paths(&["src"]), false).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPrefix { .. }));
        assert!(table.snapshot().is_empty(), "rejected prefix must not be stored");

        table.register_or_append("Vendor\\", paths(&["src"]), false).unwrap();
        assert_eq!(table.get("Vendor\\").map(DirectoryList::len), Some(1));
    }

    #[test]
    fn test_legacy_prefix_accepts_anything() {
        let mut table = PrefixTable::new(Scheme::Legacy);
        table.register_or_append("Pear_", paths(&["pear"]), false).unwrap();
        table.register_or_append("Twig", paths(&["twig"]), false).unwrap();
        assert_eq!(table.snapshot().len(), 2);
    }

    #[test]
    fn test_append_and_prepend_on_existing_prefix() {
        let mut table = PrefixTable::new(Scheme::Hierarchical);
        table.register_or_append("A\\", paths(&["a"]), false).unwrap();
        table.register_or_append("A\\", paths(&["b"]), false).unwrap();
        table.register_or_append("A\\", paths(&["c"]), true).unwrap();

        assert_eq!(table.get("A\\").unwrap().as_slice(), paths(&["c", "a", "b"]).as_slice());
    }

    #[test]
    fn test_empty_prefix_targets_fallback() {
        let mut table = PrefixTable::new(Scheme::Hierarchical);
        table.register_or_append("", paths(&["one"]), false).unwrap();
        table.register_or_append("", paths(&["zero"]), true).unwrap();
        assert_eq!(table.fallback().as_slice(), paths(&["zero", "one"]).as_slice());

        table.replace("", paths(&["only"])).unwrap();
        assert_eq!(table.fallback().as_slice(), paths(&["only"]).as_slice());
        assert!(table.snapshot().is_empty());
    }

    #[test]
    fn test_replace_touches_only_the_exact_prefix() {
        let mut table = PrefixTable::new(Scheme::Legacy);
        table.register_or_append("Foo_", paths(&["a", "b"]), false).unwrap();
        table.register_or_append("Foo_Bar_", paths(&["c"]), false).unwrap();

        table.replace("Foo_", paths(&["z"])).unwrap();

        assert_eq!(table.get("Foo_").unwrap().as_slice(), paths(&["z"]).as_slice());
        assert_eq!(table.get("Foo_Bar_").unwrap().as_slice(), paths(&["c"]).as_slice());
    }

    #[test]
    fn test_matching_scans_bucket_in_registration_order() {
        let mut table = PrefixTable::new(Scheme::Legacy);
        table.register_or_append("Foo", paths(&["first"]), false).unwrap();
        table.register_or_append("Bar", paths(&["other"]), false).unwrap();
        table.register_or_append("Foo_Bar", paths(&["second"]), false).unwrap();

        let matched: Vec<_> =
            table.matching("Foo_Bar_Baz").map(|dirs| dirs.to_vec()).collect();
        assert_eq!(matched, vec![paths(&["first"]), paths(&["second"])]);
        assert_eq!(table.matching("Qux").count(), 0);
        assert_eq!(table.matching("").count(), 0);
    }

    #[test]
    fn test_snapshot_preserves_registration_order_across_buckets() {
        let mut table = PrefixTable::new(Scheme::Hierarchical);
        table.register_or_append("Zed\\", paths(&["z"]), false).unwrap();
        table.register_or_append("Alpha\\", paths(&["a"]), false).unwrap();

        let prefixes: Vec<_> = table.snapshot().into_iter().map(|p| p.prefix).collect();
        assert_eq!(prefixes, vec!["Zed\\".to_owned(), "Alpha\\".to_owned()]);
    }
}
