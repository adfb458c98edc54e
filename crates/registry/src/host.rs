//! Seams to the host environment: filesystem probing and code loading.

use crate::error::{RegistryError, RegistryErrorExt};
use std::fmt::Debug;
use std::fs::File;
use std::path::Path;

/// Existence check used while probing candidate files.
pub trait Filesystem: Debug + Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Host code-loading primitive. Called at most once per registered auxiliary file and once
/// per successful `load_class`.
pub trait Materializer: Debug + Send + Sync {
    fn materialize(&self, path: &Path) -> Result<(), RegistryError>;
}

/// Probes the real filesystem; only regular files count.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Materializer that only checks the file can be opened for reading.
///
/// Hosts that actually execute source units plug in their own [`Materializer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadCheck;

impl Materializer for ReadCheck {
    fn materialize(&self, path: &Path) -> Result<(), RegistryError> {
        File::open(path).map(drop).context(format!("Opening {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_filesystem_only_accepts_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Foo.php");
        std::fs::write(&file, "<?php").unwrap();

        assert!(OsFilesystem.exists(&file));
        assert!(!OsFilesystem.exists(dir.path()));
        assert!(!OsFilesystem.exists(&dir.path().join("Bar.php")));
    }

    #[test]
    fn test_read_check_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Missing.php");

        let err = ReadCheck.materialize(&missing).unwrap_err();
        assert!(matches!(err, RegistryError::Materialize { .. }));
        assert!(err.to_string().contains("Missing.php"));
    }
}
