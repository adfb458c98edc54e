//! Shaping symbol names into relative file paths.

use std::path::{MAIN_SEPARATOR_STR, PathBuf};
use symloc_domain::constants::{LEGACY_SEPARATOR, NAMESPACE_SEPARATOR};

/// Rejects names that cannot denote a source unit.
///
/// Accepted characters are ASCII alphanumerics, `_`, the namespace separator and any
/// non-ASCII character. Anything else (`/`, `.`, NUL, ...) could escape a search directory
/// once turned into a path. A name may not start with the namespace separator; callers strip
/// the single optional leading one before asking.
pub(crate) fn is_valid(symbol: &str) -> bool {
    !symbol.is_empty()
        && !symbol.starts_with(NAMESPACE_SEPARATOR)
        && symbol.chars().all(is_symbol_char)
}

const fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == LEGACY_SEPARATOR || c == NAMESPACE_SEPARATOR || !c.is_ascii()
}

/// `Vendor\Pkg\Foo` → `Vendor/Pkg/Foo<ext>`.
pub(crate) fn hierarchical_path(symbol: &str, extension: &str) -> PathBuf {
    let mut path = symbol.replace(NAMESPACE_SEPARATOR, MAIN_SEPARATOR_STR);
    path.push_str(extension);
    PathBuf::from(path)
}

/// Legacy shape: namespace segments become directories unchanged and underscores turn into
/// directories in the final segment only.
///
/// `Vendor\Pkg_Sub\Foo_Bar` → `Vendor/Pkg_Sub/Foo/Bar<ext>`, `Pear_Foo` → `Pear/Foo<ext>`.
pub(crate) fn legacy_path(symbol: &str, extension: &str) -> PathBuf {
    let mut path = match symbol.rfind(NAMESPACE_SEPARATOR) {
        Some(pos) => {
            let namespace = symbol[..=pos].replace(NAMESPACE_SEPARATOR, MAIN_SEPARATOR_STR);
            let name = symbol[pos + 1..].replace(LEGACY_SEPARATOR, MAIN_SEPARATOR_STR);
            namespace + &name
        },
        None => symbol.replace(LEGACY_SEPARATOR, MAIN_SEPARATOR_STR),
    };
    path.push_str(extension);
    PathBuf::from(path)
}

/// Every registered-prefix candidate of a hierarchical symbol, most specific first, paired
/// with the remainder of the symbol after that prefix.
///
/// `A\B\C` yields `("A\B\", "C")` then `("A\", "B\C")`.
pub(crate) fn namespace_prefixes(symbol: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut end = symbol.len();
    std::iter::from_fn(move || {
        let pos = symbol[..end].rfind(NAMESPACE_SEPARATOR)?;
        end = pos;
        Some((&symbol[..=pos], &symbol[pos + 1..]))
    })
}
