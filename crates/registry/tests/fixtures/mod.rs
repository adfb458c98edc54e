#![allow(dead_code)]

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use symloc_cache::{CachedLookup, ExternalCache, MokaCache};
use symloc_registry::{Filesystem, Materializer, OsFilesystem, Registry, RegistryError};
use tempfile::TempDir;

/// Creates `relative` (with `/` separators) below `root`, including parent directories.
/// # Panics
/// * If the file cannot be written.
pub fn touch(root: &Path, relative: &str) -> PathBuf {
    let path: PathBuf = std::iter::once(root.to_path_buf())
        .chain(relative.split('/').map(PathBuf::from))
        .collect();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent directories");
    }
    std::fs::write(&path, "<?php\n").expect("write source unit");
    path
}

/// A temporary source tree populated with `files`.
/// # Panics
/// * If the tree cannot be created.
#[must_use]
pub fn source_tree(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for file in files {
        touch(dir.path(), file);
    }
    dir
}

/// Real filesystem that counts every existence probe.
#[derive(Debug, Default)]
pub struct CountingFilesystem {
    probes: AtomicUsize,
}

impl CountingFilesystem {
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl Filesystem for CountingFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        OsFilesystem.exists(path)
    }
}

/// One-shot rendezvous: the first caller of [`Gate::pass`] announces itself and waits until
/// the test opens the gate. Later callers pass straight through.
#[derive(Debug)]
pub struct Gate {
    entered: Mutex<Option<mpsc::Sender<()>>>,
    release: Mutex<Option<mpsc::Receiver<()>>>,
}

/// Test-side handle of a [`Gate`].
#[derive(Debug)]
pub struct GateControl {
    entered: mpsc::Receiver<()>,
    release: mpsc::Sender<()>,
}

impl Gate {
    #[must_use]
    pub fn new() -> (Self, GateControl) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gate = Self {
            entered: Mutex::new(Some(entered_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        (gate, GateControl { entered: entered_rx, release: release_tx })
    }

    /// # Panics
    /// * If the test side hung up.
    pub fn pass(&self) {
        let Some(entered) = self.entered.lock().take() else {
            return;
        };
        entered.send(()).expect("announce arrival");
        if let Some(release) = self.release.lock().take() {
            release.recv().expect("wait for release");
        }
    }
}

impl GateControl {
    /// # Panics
    /// * If the gated side hung up.
    pub fn wait_entered(&self) {
        self.entered.recv().expect("gated call entered");
    }

    /// # Panics
    /// * If the gated side hung up.
    pub fn open(&self) {
        self.release.send(()).expect("open gate");
    }
}

/// Real filesystem whose first existence check parks at a [`Gate`].
#[derive(Debug)]
pub struct GatedFilesystem(pub Gate);

impl Filesystem for GatedFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.0.pass();
        OsFilesystem.exists(path)
    }
}

/// Moka cache whose first store parks at a [`Gate`] after the entry is written.
#[derive(Debug)]
pub struct GatedCache {
    pub inner: MokaCache,
    pub gate: Gate,
}

impl ExternalCache for GatedCache {
    fn get(&self, key: &str) -> Option<CachedLookup> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: CachedLookup) {
        self.inner.put(key, value);
        self.gate.pass();
    }

    fn remove(&self, key: &str) {
        self.inner.remove(key);
    }
}

/// Records every materialized path; optionally refuses paths containing `fail_on`.
#[derive(Debug, Default)]
pub struct RecordingMaterializer {
    loaded: Mutex<Vec<PathBuf>>,
    fail_on: Option<&'static str>,
}

impl RecordingMaterializer {
    #[must_use]
    pub fn failing_on(fragment: &'static str) -> Self {
        Self { loaded: Mutex::default(), fail_on: Some(fragment) }
    }

    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded.lock().clone()
    }
}

impl Materializer for RecordingMaterializer {
    fn materialize(&self, path: &Path) -> Result<(), RegistryError> {
        if let Some(fragment) = self.fail_on
            && path.to_string_lossy().contains(fragment)
        {
            return Err(RegistryError::Host {
                message: format!("refused {}", path.display()).into(),
                context: None,
            });
        }
        self.loaded.lock().push(path.to_path_buf());
        Ok(())
    }
}

/// Registry wired to a probe-counting filesystem and a recording materializer.
#[must_use]
pub fn instrumented_registry() -> (Registry, Arc<CountingFilesystem>, Arc<RecordingMaterializer>) {
    let filesystem = Arc::new(CountingFilesystem::default());
    let materializer = Arc::new(RecordingMaterializer::default());
    let registry = Registry::builder()
        .filesystem(filesystem.clone())
        .materializer(materializer.clone())
        .build();
    (registry, filesystem, materializer)
}
