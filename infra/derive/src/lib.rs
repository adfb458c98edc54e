#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the symloc crates.
//!
//! ## Usage
//! Add the crate as a regular dependency; the generated code refers to `thiserror`, so the
//! consuming crate must depend on it as well:
//! ```toml
//! [dependencies]
//! symloc-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod error;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring the error enum of a crate.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Type Aliasing**: Emits `Result<T, E = ErrorName>` next to the enum.
/// * **Context Support**: Generates a companion `<ErrorName>Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants carrying a `source` field,
///   so `?` works on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a `source` field (or a field marked `#[source]`/`#[from]`) must also
///    carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[symloc_derive::symloc_error]
/// pub enum RegistryError {
///     #[error("Invalid prefix{}: {message}", format_context(.context))]
///     InvalidPrefix { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Materialization failed{}: {source}", format_context(.context))]
///     Materialize { source: std::io::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn open(path: &std::path::Path) -> Result<std::fs::File> {
///     std::fs::File::open(path).context("Opening source unit")
/// }
/// ```
#[proc_macro_attribute]
pub fn symloc_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    error::expand(input).into()
}
