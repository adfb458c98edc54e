use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use symloc_domain::constants::ENV_PREFIX;
use symloc_registry::RegistryError;
use tracing::info;

/// Default configuration file stem, resolved against the working directory.
const DEFAULT_CONFIG_FILE: &str = "symloc";

/// Custom error type for config loading.
#[symloc_derive::symloc_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Invalid loader configuration{}: {source}", format_context(.context))]
    Registry { source: RegistryError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `symloc.toml`). If no path is provided, it defaults to `"symloc"`.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `SYMLOC__`.
///    Nested structures are accessed using double underscores (e.g., `SYMLOC__RESOLVER__EXTENSION` maps to `resolver.extension`).
///
/// # Type Parameters
/// * `T`: The target configuration structure. Must implement [`serde::Deserialize`].
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
///
/// # Example
/// ```rust
/// use symloc_kernel::config::load_config;
/// use symloc_kernel::domain::config::LoaderConfig;
///
/// let cfg: LoaderConfig = load_config(Some("config/local")).unwrap_or_default();
/// assert_eq!(cfg.resolver.extension, ".php");
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
