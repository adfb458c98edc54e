use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_EXTENSION, DEFAULT_LOG_LEVEL, DEFAULT_LOG_NAME,
    DEFAULT_MAX_LOG_FILES,
};
use crate::snapshot::LoaderSnapshot;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of a shared loader.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderConfigInner {
    pub resolver: ResolverConfig,
    pub autoload: LoaderSnapshot,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into workers.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    #[serde(flatten, default)]
    inner: Arc<LoaderConfigInner>,
}

impl Deref for LoaderConfig {
    type Target = LoaderConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for LoaderConfig {
    fn deref_mut(&mut self) -> &mut LoaderConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// How candidate files are shaped and where the host searches on its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Primary source extension, including the leading dot.
    pub extension: String,
    /// Secondary extension tried after the primary one fails.
    pub alternate_extension: Option<String>,
    /// Host include path, consulted only when `use_include_path` is enabled.
    pub include_path: Vec<PathBuf>,
    pub cache: CacheConfig,
}

/// Sizing of the in-process external cache, attached only when a key prefix is configured.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: u64,
    pub ttl_seconds: Option<u64>,
}

/// Subscriber settings for hosts that let symloc install logging.
///
/// Levels are `tracing` level names (`"trace"` .. `"error"`, `"off"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also the prefix of rolling log files.
    pub name: String,
    pub level: String,
    /// Level for the registry's own events only.
    pub registry_level: Option<String>,
    /// Extra `EnvFilter` directives; replaces `RUST_LOG` when set.
    pub filter: Option<String>,
    pub console: bool,
    /// Directory of rolling log files; file output is off when absent.
    pub path: Option<PathBuf>,
    pub max_files: usize,
    pub json: bool,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOG_NAME.to_owned(),
            level: DEFAULT_LOG_LEVEL.to_owned(),
            registry_level: None,
            filter: None,
            console: true,
            path: None,
            max_files: DEFAULT_MAX_LOG_FILES,
            json: false,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_owned(),
            alternate_extension: None,
            include_path: Vec::new(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CACHE_CAPACITY, ttl_seconds: None }
    }
}
