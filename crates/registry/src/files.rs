use fxhash::FxHashMap;
use std::path::{Path, PathBuf};
use symloc_domain::snapshot::IncludedFile;

#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    state: FileState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileState {
    Pending,
    /// Claimed by exactly one caller that is materializing the file right now.
    InFlight,
    Materialized,
}

/// Eagerly-loaded auxiliary files, keyed by identifier in registration order.
///
/// A file moves `Pending → InFlight → Materialized`. Only the caller that wins the claim
/// materializes it, which gives at-most-once inclusion without holding any lock during I/O.
#[derive(Debug, Clone, Default)]
pub(crate) struct FileRegistry {
    order: Vec<String>,
    entries: FxHashMap<String, FileEntry>,
}

impl FileRegistry {
    /// Registers `id` unless it is already known. Returns `false` for a duplicate.
    pub(crate) fn insert(&mut self, id: &str, path: PathBuf, materialized: bool) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        let state = if materialized { FileState::Materialized } else { FileState::Pending };
        self.order.push(id.to_owned());
        self.entries.insert(id.to_owned(), FileEntry { path, state });
        true
    }

    /// Claims a pending file for materialization.
    pub(crate) fn claim(&mut self, id: &str) -> Option<PathBuf> {
        let entry = self.entries.get_mut(id)?;
        if entry.state != FileState::Pending {
            return None;
        }
        entry.state = FileState::InFlight;
        Some(entry.path.clone())
    }

    /// Claims every pending file, in registration order.
    pub(crate) fn claim_pending(&mut self) -> Vec<(String, PathBuf)> {
        let mut claimed = Vec::new();
        for id in &self.order {
            if let Some(entry) = self.entries.get_mut(id)
                && entry.state == FileState::Pending
            {
                entry.state = FileState::InFlight;
                claimed.push((id.clone(), entry.path.clone()));
            }
        }
        claimed
    }

    pub(crate) fn mark_materialized(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.state = FileState::Materialized;
        }
    }

    /// Returns a claimed file to `Pending` after its materialization failed.
    pub(crate) fn release(&mut self, id: &str) {
        if let Some(entry) = self.entries.get_mut(id)
            && entry.state == FileState::InFlight
        {
            entry.state = FileState::Pending;
        }
    }

    pub(crate) fn path(&self, id: &str) -> Option<&Path> {
        self.entries.get(id).map(|entry| entry.path.as_path())
    }

    pub(crate) fn snapshot(&self) -> Vec<IncludedFile> {
        self.order
            .iter()
            .filter_map(|id| {
                self.entries.get(id).map(|entry| IncludedFile {
                    id: id.clone(),
                    path: entry.path.clone(),
                    included: entry.state == FileState::Materialized,
                })
            })
            .collect()
    }
}
