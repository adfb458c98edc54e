//! Facade crate for the shared symbol resolver.
//! Re-exports the registry, cache, domain and kernel crates and wires them together.
//! Keep this crate thin: it should compose other crates, not implement resolution logic.
//!
//! ## Usage
//! - Describe prefixes, class map and files in a `symloc.toml` (see [`domain::config`]).
//! - Call [`init`] once per process and share the returned [`Registry`] with every worker.
//! - Enable the `logger` feature for [`logger`] (console and rolling-file tracing output).

use std::path::Path;
use tracing::info;

pub use symloc_cache as cache;
pub use symloc_domain as domain;
pub use symloc_kernel as kernel;
#[cfg(feature = "logger")]
pub use symloc_logger as logger;
pub use symloc_registry as registry;

pub use symloc_registry::{Registry, ResolverChain};

/// Loads the configuration at `path`, builds the registry and installs it into `chain`.
///
/// Pending auxiliary files are materialized during installation.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or is invalid, or if a configured
/// file fails to materialize.
pub fn init(
    path: impl AsRef<Path>,
    chain: &ResolverChain,
) -> Result<Registry, Box<dyn std::error::Error + Send + Sync>> {
    let cfg: domain::config::LoaderConfig = kernel::config::load_config(Some(path.as_ref()))?;
    let registry = kernel::bootstrap::registry_from_config(&cfg)?;
    registry.register(chain, false)?;

    info!(loader = ?registry.id(), chain = chain.len(), "Symbol registry initialized");
    Ok(registry)
}
