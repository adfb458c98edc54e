//! Kernel utilities shared by symloc hosts.
//! Keep this crate lightweight; it turns configuration into a ready [`Registry`].
//!
//! ## Config loading
//! ```rust,no_run
//! use symloc_kernel::bootstrap::registry_from_config;
//! use symloc_kernel::config::load_config;
//! use symloc_kernel::domain::config::LoaderConfig;
//!
//! # fn main() -> Result<(), symloc_kernel::config::ConfigError> {
//! let cfg: LoaderConfig = load_config(Some("symloc"))?;
//! let registry = registry_from_config(&cfg)?;
//! # let _ = registry;
//! # Ok(())
//! # }
//! ```
//!
//! [`Registry`]: symloc_registry::Registry

pub mod bootstrap;
pub mod config;

pub use symloc_domain as domain;
pub use symloc_registry as registry;
