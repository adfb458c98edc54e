use fxhash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Exact symbol → file mapping together with the negative cache and the authoritative flag.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassMap {
    map: FxHashMap<String, PathBuf>,
    missing: FxHashSet<String>,
    authoritative: bool,
}

impl ClassMap {
    /// Union-merges `mapping` into the map; later entries win.
    pub(crate) fn merge<I>(&mut self, mapping: I) -> usize
    where
        I: IntoIterator<Item = (String, PathBuf)>,
    {
        let before = self.map.len();
        for (symbol, path) in mapping {
            self.map.insert(symbol, path);
        }
        self.map.len() - before
    }

    pub(crate) fn get(&self, symbol: &str) -> Option<&Path> {
        self.map.get(symbol).map(PathBuf::as_path)
    }

    pub(crate) fn mark_missing(&mut self, symbol: &str) {
        if !self.missing.contains(symbol) {
            self.missing.insert(symbol.to_owned());
        }
    }

    pub(crate) fn is_missing(&self, symbol: &str) -> bool {
        self.missing.contains(symbol)
    }

    pub(crate) const fn is_authoritative(&self) -> bool {
        self.authoritative
    }

    pub(crate) const fn set_authoritative(&mut self, authoritative: bool) {
        self.authoritative = authoritative;
    }

    pub(crate) fn snapshot(&self) -> BTreeMap<String, PathBuf> {
        self.map.iter().map(|(symbol, path)| (symbol.clone(), path.clone())).collect()
    }

    /// Negative cache content, sorted for stable output.
    pub(crate) fn missing_snapshot(&self) -> Vec<String> {
        let mut missing: Vec<_> = self.missing.iter().cloned().collect();
        missing.sort_unstable();
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_last_write_wins() {
        let mut map = ClassMap::default();
        let added = map.merge([
            ("A".to_owned(), PathBuf::from("a.php")),
            ("B".to_owned(), PathBuf::from("b.php")),
        ]);
        assert_eq!(added, 2);

        let added = map.merge([("A".to_owned(), PathBuf::from("a2.php"))]);
        assert_eq!(added, 0);
        assert_eq!(map.get("A"), Some(Path::new("a2.php")));
        assert_eq!(map.get("B"), Some(Path::new("b.php")));
        assert_eq!(map.get("C"), None);
    }

    #[test]
    fn test_mark_missing_is_idempotent() {
        let mut map = ClassMap::default();
        map.mark_missing("Gone");
        map.mark_missing("Gone");
        map.mark_missing("Also\\Gone");

        assert!(map.is_missing("Gone"));
        assert_eq!(map.missing_snapshot(), vec!["Also\\Gone".to_owned(), "Gone".to_owned()]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut map = ClassMap::default();
        map.merge([("A".to_owned(), PathBuf::from("a.php"))]);

        let snapshot = map.snapshot();
        map.merge([("B".to_owned(), PathBuf::from("b.php"))]);

        assert_eq!(snapshot.len(), 1);
        assert!(!map.is_authoritative());
    }
}
