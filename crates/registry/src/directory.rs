use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Ordered search directories of a single prefix (or of a fallback slot).
///
/// The list is copy-on-write: a clone taken by a reader keeps its exact view while a writer
/// publishes the next version, so no reader can observe a list that is half appended,
/// momentarily empty during a replace, or partially prepended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryList {
    dirs: Arc<Vec<PathBuf>>,
}

impl DirectoryList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self { dirs: Arc::new(paths.into_iter().map(Into::into).collect()) }
    }

    /// Adds `paths` after the existing entries. Empty input is a no-op.
    pub fn append(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        Arc::make_mut(&mut self.dirs).extend(paths);
    }

    /// Places `paths` before the existing entries, keeping both groups in their own order.
    /// Empty input is a no-op.
    pub fn prepend_all(&mut self, mut paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        paths.extend(self.dirs.iter().cloned());
        self.dirs = Arc::new(paths);
    }

    /// Discards the current entries and publishes `paths` in one step.
    pub fn replace_all(&mut self, paths: Vec<PathBuf>) {
        self.dirs = Arc::new(paths);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<PathBuf> {
        self.dirs.as_ref().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for DirectoryList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_append_keeps_registration_order() {
        let mut list = DirectoryList::from_paths(["a"]);
        list.append(paths(&["b", "c"]));
        assert_eq!(list.as_slice(), paths(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_prepend_places_new_group_first() {
        let mut list = DirectoryList::from_paths(["a", "b"]);
        list.prepend_all(paths(&["x", "y"]));
        assert_eq!(list.as_slice(), paths(&["x", "y", "a", "b"]).as_slice());
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut list = DirectoryList::from_paths(["a"]);
        list.append(Vec::new());
        list.prepend_all(Vec::new());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_reader_clone_survives_mutation() {
        let mut list = DirectoryList::from_paths(["a", "b"]);
        let reader = list.clone();

        list.replace_all(paths(&["c"]));
        list.prepend_all(paths(&["z"]));

        assert_eq!(reader.as_slice(), paths(&["a", "b"]).as_slice());
        assert_eq!(list.as_slice(), paths(&["z", "c"]).as_slice());
    }
}
