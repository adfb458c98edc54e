use crate::directory::DirectoryList;
use crate::host::{Filesystem, Materializer, OsFilesystem, ReadCheck};
use crate::registry::Registry;
use crate::resolver::Resolver;
use std::path::PathBuf;
use std::sync::Arc;
use symloc_cache::ExternalCache;
use symloc_domain::constants::DEFAULT_EXTENSION;
use tracing::debug;

/// Configures the host collaborators of a [`Registry`].
///
/// Everything here is fixed for the lifetime of the registry; prefixes, class maps and flags
/// are mutated afterwards through the registry handle itself.
#[derive(Debug)]
pub struct RegistryBuilder {
    filesystem: Arc<dyn Filesystem>,
    materializer: Arc<dyn Materializer>,
    external_cache: Option<Arc<dyn ExternalCache>>,
    extension: String,
    alternate_extension: Option<String>,
    include_path: Vec<PathBuf>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            filesystem: Arc::new(OsFilesystem),
            materializer: Arc::new(ReadCheck),
            external_cache: None,
            extension: DEFAULT_EXTENSION.to_owned(),
            alternate_extension: None,
            include_path: Vec::new(),
        }
    }
}

impl RegistryBuilder {
    #[must_use = "Creates a new registry builder with default collaborators"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the filesystem used to probe candidate files"]
    pub fn filesystem(mut self, filesystem: Arc<dyn Filesystem>) -> Self {
        self.filesystem = filesystem;
        self
    }

    #[must_use = "Sets the host code-loading primitive"]
    pub fn materializer(mut self, materializer: Arc<dyn Materializer>) -> Self {
        self.materializer = materializer;
        self
    }

    #[must_use = "Attaches an external lookup cache"]
    pub fn external_cache(mut self, cache: Arc<dyn ExternalCache>) -> Self {
        self.external_cache = Some(cache);
        self
    }

    #[must_use = "Sets the primary source extension"]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    #[must_use = "Sets the extension tried after the primary one"]
    pub fn alternate_extension(mut self, extension: impl Into<String>) -> Self {
        self.alternate_extension = Some(extension.into());
        self
    }

    #[must_use = "Sets the host include path"]
    pub fn include_path<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_path = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "Builds the registry"]
    pub fn build(self) -> Registry {
        debug!(
            extension = %self.extension,
            alternate = ?self.alternate_extension,
            cache = self.external_cache.is_some(),
            "Building registry"
        );

        let resolver = Resolver::new(
            self.filesystem,
            self.extension,
            self.alternate_extension,
            DirectoryList::from_paths(self.include_path),
        );
        Registry::from_parts(resolver, self.materializer, self.external_cache)
    }
}
