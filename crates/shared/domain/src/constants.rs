//! Lexical constants of symbol names and source units.

/// Separates namespace segments of a hierarchical symbol (`Vendor\Package\Class`).
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separates pseudo-namespace segments of a legacy symbol (`Vendor_Package_Class`).
pub const LEGACY_SEPARATOR: char = '_';

/// Extension of source units unless configured otherwise.
pub const DEFAULT_EXTENSION: &str = ".php";

/// Prefix of environment variables overriding file configuration (`SYMLOC__RESOLVER__...`).
pub const ENV_PREFIX: &str = "SYMLOC";

/// Default capacity of the in-process external cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Logger name and log file prefix unless configured otherwise.
pub const DEFAULT_LOG_NAME: &str = "symloc";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Rotated log files kept by default.
pub const DEFAULT_MAX_LOG_FILES: usize = 10;
