//! # Symloc Registry
//!
//! A shared, concurrently mutable registry that resolves fully-qualified symbol names to the
//! file defining them.
//!
//! Lookup is layered:
//! 1. **Class map**: exact symbol → file entries, optionally authoritative.
//! 2. **Negative cache** and an optional **external cache** ([`symloc_cache::ExternalCache`]).
//! 3. **Hierarchical prefixes** (`Vendor\Package\` → directories, most specific first) and
//!    their fallback directories.
//! 4. **Legacy prefixes** (plain string prefixes, underscores as directories) and their
//!    fallback directories, then the host include path when enabled.
//!
//! A [`Registry`] is a cheap `Arc` handle. Clones can be moved to any number of worker
//! threads; every mutation goes through one lock that is never held during filesystem or
//! cache I/O.
//!
//! ## Example
//!
//! ```rust
//! use symloc_registry::{Registry, ResolverChain};
//!
//! # fn main() -> symloc_registry::Result<()> {
//! let vendor = tempfile::tempdir().unwrap();
//! std::fs::create_dir_all(vendor.path().join("Pearlike")).unwrap();
//! std::fs::write(vendor.path().join("Pearlike/Foo.php"), "<?php").unwrap();
//!
//! let chain = ResolverChain::new();
//! let registry = Registry::new();
//! registry.add("Pearlike_", [vendor.path()], false)?;
//! registry.register(&chain, false)?;
//!
//! let worker = {
//!     let chain = chain.clone();
//!     std::thread::spawn(move || chain.load("Pearlike_Foo"))
//! };
//! assert!(worker.join().unwrap()?);
//! # Ok(())
//! # }
//! ```

mod builder;
mod chain;
mod class_map;
mod directory;
mod error;
mod files;
mod host;
mod import;
mod prefix;
mod registry;
mod resolver;
mod symbol;

pub use builder::RegistryBuilder;
pub use chain::{LoaderId, ResolverChain, SymbolLoader};
pub use directory::DirectoryList;
pub use error::{RegistryError, RegistryErrorExt, Result};
pub use host::{Filesystem, Materializer, OsFilesystem, ReadCheck};
pub use import::{ForeignLoader, ImportOptions, import_from};
pub use prefix::Scheme;
pub use registry::Registry;
