//! Turning a symbol into candidate files and probing them.
//!
//! Resolution is split in two phases. [`Resolver::plan`] runs under the registry's read lock
//! and only copies out the directory lists that apply (cheap `Arc` clones). [`Resolver::probe`]
//! runs after the lock is released and touches the filesystem.

use crate::directory::DirectoryList;
use crate::host::Filesystem;
use crate::prefix::PrefixTable;
use crate::symbol;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

/// How the file name below a search directory is derived from the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// The symbol starting at byte `offset`, namespace separators turned into directories.
    Hierarchical { offset: usize },
    /// Legacy shape of the whole symbol.
    Legacy,
}

#[derive(Debug, Clone)]
struct Candidate {
    dirs: DirectoryList,
    shape: Shape,
}

/// Every directory group that may hold `symbol`, in search order.
#[derive(Debug, Clone)]
pub(crate) struct LookupPlan {
    symbol: String,
    candidates: Vec<Candidate>,
}

impl LookupPlan {
    pub(crate) fn symbol(&self) -> &str {
        &self.symbol
    }
}

/// The resolution algorithm plus the host collaborators it probes with.
#[derive(Debug, Clone)]
pub(crate) struct Resolver {
    filesystem: Arc<dyn Filesystem>,
    /// Primary extension first, then the alternate one when configured.
    extensions: Vec<String>,
    include_path: DirectoryList,
}

impl Resolver {
    pub(crate) fn new(
        filesystem: Arc<dyn Filesystem>,
        extension: String,
        alternate_extension: Option<String>,
        include_path: DirectoryList,
    ) -> Self {
        let mut extensions = vec![extension];
        extensions.extend(alternate_extension);
        Self { filesystem, extensions, include_path }
    }

    /// Collects the directory groups for `symbol`: hierarchical prefixes most specific first,
    /// hierarchical fallback, matching legacy prefixes in registration order, legacy fallback
    /// and finally the include path when enabled.
    pub(crate) fn plan(
        &self,
        symbol: &str,
        hierarchical: &PrefixTable,
        legacy: &PrefixTable,
        use_include_path: bool,
    ) -> LookupPlan {
        let mut candidates = Vec::new();
        let mut push = |dirs: &DirectoryList, shape| {
            if !dirs.is_empty() {
                candidates.push(Candidate { dirs: dirs.clone(), shape });
            }
        };

        for (prefix, _) in symbol::namespace_prefixes(symbol) {
            if let Some(dirs) = hierarchical.get(prefix) {
                push(dirs, Shape::Hierarchical { offset: prefix.len() });
            }
        }
        push(hierarchical.fallback(), Shape::Hierarchical { offset: 0 });

        for dirs in legacy.matching(symbol) {
            push(dirs, Shape::Legacy);
        }
        push(legacy.fallback(), Shape::Legacy);

        if use_include_path {
            push(&self.include_path, Shape::Legacy);
        }

        LookupPlan { symbol: symbol.to_owned(), candidates }
    }

    /// Probes the planned candidates, once per extension. The first existing file wins.
    pub(crate) fn probe(&self, plan: &LookupPlan) -> Option<PathBuf> {
        for extension in &self.extensions {
            for candidate in &plan.candidates {
                let relative = match candidate.shape {
                    Shape::Hierarchical { offset } => {
                        symbol::hierarchical_path(&plan.symbol[offset..], extension)
                    },
                    Shape::Legacy => symbol::legacy_path(&plan.symbol, extension),
                };

                for dir in candidate.dirs.iter() {
                    let path = dir.join(&relative);
                    if self.filesystem.exists(&path) {
                        trace!(symbol = %plan.symbol, path = %path.display(), "Resolved");
                        return Some(path);
                    }
                }
            }
        }

        trace!(symbol = %plan.symbol, "No candidate file exists");
        None
    }
}
